use std::io;
use std::path::Path;
use thiserror::Error;

use crate::core::constants::sdk;
use crate::core::platform::HostOs;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("不支持的压缩包格式: {path} (仅支持 .7z 与 .zip)")]
    ArchiveFormat { path: String },

    #[error("未找到 7z 解压工具 (尝试过: {tried})")]
    ToolMissing { tried: String },

    #[error("解压工具 {tool} 执行失败 (退出码 {code}): {stderr}")]
    ToolFailed {
        tool: String,
        code: String,
        stderr: String,
    },

    #[error("解压失败: {message}")]
    Extraction { message: String },

    #[error("压缩包中未找到 SDK 结构, 期望文件: {marker}")]
    SdkRootNotFound { marker: String },

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    #[error("路径错误: {path} - {reason}")]
    Path { path: String, reason: String },

    #[error("读取用户输入失败: {message}")]
    Prompt { message: String },

    #[error("未找到任何 SDK 压缩包")]
    NoArchives,
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 是否为致命错误
    ///
    /// 只有移动/删除阶段的文件系统错误会终止整个运行，其余错误只影响当前平台。
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Io(_))
    }

    /// 针对错误给出的修复建议
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AppError::ToolMissing { .. } => sevenzip_install_hints(HostOs::current()),
            AppError::ArchiveFormat { .. } => {
                vec!["请使用官方发布的 .7z 或 .zip 压缩包".to_string()]
            }
            AppError::SdkRootNotFound { .. } => vec![
                "确认压缩包是否为完整的 Ultralight SDK".to_string(),
                "重新下载后再试".to_string(),
            ],
            AppError::NoArchives => vec![
                format!("从 {} 下载 Ultralight SDK", sdk::DOWNLOAD_URL),
                "然后运行: ulsdk --archives-dir /path/to/downloads".to_string(),
            ],
            _ => Vec::new(),
        }
    }

    pub fn unsupported_format(path: &Path) -> Self {
        Self::ArchiveFormat {
            path: path.display().to_string(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn path_conversion_failed(path: &Path) -> Self {
        Self::Path {
            path: format!("{:?}", path),
            reason: "路径包含无效字符".to_string(),
        }
    }
}

/// 各宿主平台安装 7z 的命令，当前平台排在最前
fn sevenzip_install_hints(host: HostOs) -> Vec<String> {
    let mut hints = vec![
        (HostOs::MacOs, "macOS: brew install p7zip"),
        (HostOs::Linux, "Linux: apt install p7zip-full"),
        (HostOs::Windows, "Windows: choco install 7zip"),
    ];
    hints.sort_by_key(|(os, _)| *os != host);
    hints.into_iter().map(|(_, hint)| hint.to_string()).collect()
}
