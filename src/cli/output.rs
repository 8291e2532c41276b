use std::path::Path;

use crate::core::platform::PlatformSpec;
use crate::error::{AppError, AppResult};
use crate::sdk::status::PlatformStatus;
use crate::utils::PathUtils;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 状态报告所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPhase {
    /// 安装前
    Current,
    /// 安装后汇总
    Final,
}

const WIDE_RULE: usize = 60;
const SECTION_RULE: usize = 50;

/// 输出格式化器
pub struct OutputFormatter;

impl OutputFormatter {
    /// 标题横幅
    pub fn banner(&self, title: &str) -> String {
        let rule = "=".repeat(WIDE_RULE);
        format!("{rule}\n{title}\n{rule}\n")
    }

    /// 单个平台的分节标题
    pub fn section(&self, platform: &str) -> String {
        let rule = "=".repeat(SECTION_RULE);
        format!("\n{rule}\n安装 {platform}\n{rule}\n")
    }

    /// 格式化平台状态
    pub fn format_status(
        &self,
        statuses: &[PlatformStatus],
        phase: StatusPhase,
        format: OutputFormat,
    ) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                let (title, ok, missing) = match phase {
                    StatusPhase::Current => ("当前 SDK 状态:", "✓ 已安装", "✗ 未找到"),
                    StatusPhase::Final => ("SDK 状态:", "✓ 就绪", "✗ 缺失"),
                };
                let mut output = format!("\n{}\n", title);
                for status in statuses {
                    let state = if status.installed { ok } else { missing };
                    if status.installed && status.libraries > 0 {
                        output.push_str(&format!(
                            "  {}: {} ({} 个动态库)\n",
                            status.platform, state, status.libraries
                        ));
                    } else {
                        output.push_str(&format!("  {}: {}\n", status.platform, state));
                    }
                }
                Ok(output)
            }
            OutputFormat::Json => {
                let json_output = serde_json::json!({
                    "platforms": statuses,
                    "all_installed": statuses.iter().all(|s| s.installed),
                });
                Ok(format!("{}\n", serde_json::to_string_pretty(&json_output)?))
            }
        }
    }

    /// 列出找到的压缩包
    pub fn format_assignment(&self, assigned: &[(&PlatformSpec, &Path)]) -> String {
        let mut output = String::from("\n找到的压缩包:\n");
        for (spec, path) in assigned {
            match PathUtils::size(path) {
                Some(size) => output.push_str(&format!(
                    "  {}: {} ({})\n",
                    spec.name,
                    path.display(),
                    PathUtils::format_size(size)
                )),
                None => output.push_str(&format!("  {}: {}\n", spec.name, path.display())),
            }
        }
        output
    }

    /// 格式化单个平台的失败信息
    pub fn format_error(&self, platform: &str, error: &AppError) -> String {
        let mut output = format!("  ✗ {} 安装失败: {}\n", platform, error);
        let suggestions = error.suggestions();
        if !suggestions.is_empty() {
            output.push_str("  💡 建议:\n");
            for suggestion in suggestions {
                output.push_str(&format!("    • {}\n", suggestion));
            }
        }
        output
    }

    /// 没有任何压缩包时的指引
    pub fn format_no_archives(&self, search_dirs: &[std::path::PathBuf]) -> String {
        let error = AppError::NoArchives;
        let mut output = format!("\n{}!\n", error);
        if !search_dirs.is_empty() {
            output.push_str("已搜索:\n");
            for dir in search_dirs {
                output.push_str(&format!("  {}\n", dir.display()));
            }
        }
        output.push_str("💡 建议:\n");
        for suggestion in error.suggestions() {
            output.push_str(&format!("  • {}\n", suggestion));
        }
        output
    }

    /// 安装完成后的下一步提示
    pub fn next_steps(&self) -> String {
        [
            "\n下一步:",
            "  1. 构建指定平台:",
            "     ./build.sh mac      # macOS",
            "     ./build.sh linux    # Linux",
            "     ./build.sh win      # Windows (需要交叉编译器或原生构建)",
            "  2. 或构建全部平台:",
            "     ./build.sh all",
            "",
        ]
        .join("\n")
    }
}

/// 默认输出格式化器实例
pub static FORMATTER: OutputFormatter = OutputFormatter;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn statuses() -> Vec<PlatformStatus> {
        vec![
            PlatformStatus {
                platform: "win-x64".to_string(),
                target_dir: PathBuf::from("/p/sdk/win-x64"),
                installed: true,
                libraries: 4,
            },
            PlatformStatus {
                platform: "linux-x64".to_string(),
                target_dir: PathBuf::from("/p/sdk/linux-x64"),
                installed: false,
                libraries: 0,
            },
        ]
    }

    #[test]
    fn test_text_status_phases() {
        let current = FORMATTER
            .format_status(&statuses(), StatusPhase::Current, OutputFormat::Text)
            .unwrap();
        assert!(current.contains("win-x64: ✓ 已安装 (4 个动态库)"));
        assert!(current.contains("linux-x64: ✗ 未找到"));

        let summary = FORMATTER
            .format_status(&statuses(), StatusPhase::Final, OutputFormat::Text)
            .unwrap();
        assert!(summary.contains("linux-x64: ✗ 缺失"));
    }

    #[test]
    fn test_json_status() {
        let output = FORMATTER
            .format_status(&statuses(), StatusPhase::Current, OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["all_installed"], false);
        assert_eq!(value["platforms"][0]["platform"], "win-x64");
        assert_eq!(value["platforms"][0]["libraries"], 4);
    }

    #[test]
    fn test_format_error_includes_suggestions() {
        let output = FORMATTER.format_error(
            "linux-x64",
            &AppError::ToolMissing {
                tried: "7z".to_string(),
            },
        );
        assert!(output.contains("linux-x64 安装失败"));
        assert!(output.contains("p7zip"));
    }

    #[test]
    fn test_no_archives_guidance() {
        let output = FORMATTER.format_no_archives(&[PathBuf::from("/dl")]);
        assert!(output.contains("https://ultralig.ht/"));
        assert!(output.contains("--archives-dir"));
        assert!(output.contains("/dl"));
    }
}
