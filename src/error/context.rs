use crate::error::AppError;
use thiserror::Error;

/// 用于提供错误上下文和用户友好建议
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: String,
    pub suggestions: Vec<String>,
}

/// 带有上下文的错误
#[derive(Error, Debug)]
pub struct ContextualError {
    #[source]
    pub error: AppError,
    pub context: ErrorContext,
}

impl std::fmt::Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "操作失败: {}\n错误: {}", self.context.operation, self.error)
    }
}

impl ContextualError {
    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        let mut msg = format!("❌ {}\n", self.context.operation);
        msg.push_str(&format!("原因: {}\n", self.error));

        if !self.context.suggestions.is_empty() {
            msg.push_str("💡 建议:\n");
            for suggestion in &self.context.suggestions {
                msg.push_str(&format!("  • {}\n", suggestion));
            }
        }

        msg
    }
}

impl AppError {
    /// 为错误添加上下文信息，建议取自错误本身
    pub fn with_context(self, operation: &str) -> ContextualError {
        let suggestions = self.suggestions();
        ContextualError {
            error: self,
            context: ErrorContext {
                operation: operation.to_string(),
                suggestions,
            },
        }
    }
}

impl From<AppError> for ContextualError {
    fn from(error: AppError) -> Self {
        error.with_context("未知操作")
    }
}

/// 为Result添加上下文信息的辅助函数
pub fn with_context<T, E: Into<AppError>>(
    result: Result<T, E>,
    operation: &str,
) -> Result<T, ContextualError> {
    result.map_err(|e| e.into().with_context(operation))
}

/// 提供安全的路径转换，避免 unwrap()
pub fn safe_path_to_str(path: &std::path::Path) -> Result<&str, AppError> {
    path.to_str()
        .ok_or_else(|| AppError::path_conversion_failed(path))
}
