use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::constants::{platforms, sdk};
use crate::error::{AppError, AppResult};

/// 单个目标平台的描述：如何识别压缩包、如何判定安装有效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub name: String,
    /// 按优先级排列的文件名 glob，不含扩展名
    pub archive_patterns: Vec<String>,
    /// 相对于 SDK 根目录的标记文件
    #[serde(default = "default_marker")]
    pub marker: String,
    /// 相对于 SDK 根目录的动态库 glob
    #[serde(default)]
    pub libs: Vec<String>,
}

fn default_marker() -> String {
    sdk::MARKER_FILE.to_string()
}

impl PlatformSpec {
    pub fn new(name: &str, patterns: &[&str], libs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            archive_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            marker: default_marker(),
            libs: libs.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// 标记文件在给定目录下的完整路径
    pub fn marker_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.marker)
    }

    /// 给定目录是否包含标记文件
    pub fn is_sdk_root(&self, dir: &Path) -> bool {
        self.marker_path(dir).is_file()
    }
}

impl fmt::Display for PlatformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 启动时构建一次、之后只读的平台表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTable {
    platforms: Vec<PlatformSpec>,
}

impl PlatformTable {
    /// 内置的四个平台
    pub fn builtin() -> Self {
        Self {
            platforms: vec![
                PlatformSpec::new(
                    platforms::WIN_X64,
                    platforms::WIN_X64_PATTERNS,
                    platforms::WIN_LIBS,
                ),
                PlatformSpec::new(
                    platforms::LINUX_X64,
                    platforms::LINUX_X64_PATTERNS,
                    platforms::LINUX_LIBS,
                ),
                PlatformSpec::new(
                    platforms::MAC_X64,
                    platforms::MAC_X64_PATTERNS,
                    platforms::MAC_LIBS,
                ),
                PlatformSpec::new(
                    platforms::MAC_ARM64,
                    platforms::MAC_ARM64_PATTERNS,
                    platforms::MAC_LIBS,
                ),
            ],
        }
    }

    /// 从自定义列表构建，校验名称唯一且规则非空
    pub fn new(platforms: Vec<PlatformSpec>) -> AppResult<Self> {
        if platforms.is_empty() {
            return Err(AppError::config("平台列表不能为空"));
        }

        let mut seen = HashSet::new();
        for spec in &platforms {
            if spec.name.trim().is_empty() {
                return Err(AppError::config("平台名称不能为空"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(AppError::config(format!("平台名称重复: {}", spec.name)));
            }
            if spec.archive_patterns.is_empty() {
                return Err(AppError::config(format!(
                    "平台 {} 缺少 archive_patterns",
                    spec.name
                )));
            }
            if spec.marker.trim().is_empty() || Path::new(&spec.marker).is_absolute() {
                return Err(AppError::config(format!(
                    "平台 {} 的 marker 必须是相对路径",
                    spec.name
                )));
            }
        }

        Ok(Self { platforms })
    }

    pub fn get(&self, name: &str) -> Option<&PlatformSpec> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformSpec> {
        self.platforms.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.platforms.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl Default for PlatformTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// 当前运行的宿主系统
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl HostOs {
    /// 检测当前运行平台。
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostOs::Windows
        } else if cfg!(target_os = "macos") {
            HostOs::MacOs
        } else if cfg!(target_os = "linux") {
            HostOs::Linux
        } else {
            HostOs::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = PlatformTable::builtin();
        assert_eq!(
            table.names(),
            vec!["win-x64", "linux-x64", "mac-x64", "mac-arm64"]
        );
        let linux = table.get("linux-x64").unwrap();
        assert_eq!(linux.marker, "include/Ultralight/Ultralight.h");
        assert_eq!(linux.archive_patterns[0], "*linux*x64*");
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let spec = PlatformSpec::new("linux-x64", &["*linux*"], &[]);
        let err = PlatformTable::new(vec![spec.clone(), spec]).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_rejects_empty_patterns() {
        let spec = PlatformSpec::new("linux-x64", &[], &[]);
        assert!(PlatformTable::new(vec![spec]).is_err());
    }

    #[test]
    fn test_is_sdk_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let spec = PlatformSpec::new("linux-x64", &["*linux*"], &[]);
        assert!(!spec.is_sdk_root(temp.path()));

        let marker = spec.marker_path(temp.path());
        std::fs::create_dir_all(marker.parent().unwrap()).unwrap();
        std::fs::write(&marker, "// header").unwrap();
        assert!(spec.is_sdk_root(temp.path()));
    }
}
