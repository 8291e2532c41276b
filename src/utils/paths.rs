use std::path::{Path, PathBuf};

/// 路径工具
pub struct PathUtils;

impl PathUtils {
    /// 展开开头的 `~` 为用户主目录
    pub fn expand_home(path: &str) -> PathBuf {
        if path == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        } else if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// 相对路径按 base 解析，绝对路径和 `~` 路径原样展开
    pub fn resolve(base: &Path, path: &str) -> PathBuf {
        let expanded = Self::expand_home(path);
        if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        }
    }

    /// 获取路径的文件名部分
    pub fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// 格式化文件大小
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// 获取路径的文件大小（如果是文件）
    pub fn size(path: &Path) -> Option<u64> {
        if path.is_file() {
            path.metadata().ok().map(|m| m.len())
        } else {
            None
        }
    }
}
