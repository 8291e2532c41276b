use glob::Pattern;
use std::path::{Path, PathBuf};

use crate::core::platform::PlatformSpec;

/// SDK 安装目录验证器
pub struct SdkValidator;

impl SdkValidator {
    /// 安装是否有效：仅以标记文件存在为准
    pub fn is_installed(spec: &PlatformSpec, target_dir: &Path) -> bool {
        spec.is_sdk_root(target_dir)
    }

    /// 目标目录存在但不是有效安装
    pub fn is_stale(spec: &PlatformSpec, target_dir: &Path) -> bool {
        target_dir.exists() && !Self::is_installed(spec, target_dir)
    }

    /// 列出平台声明的动态库文件，仅用于展示
    pub fn library_artifacts(spec: &PlatformSpec, target_dir: &Path) -> Vec<PathBuf> {
        if !target_dir.is_dir() {
            return Vec::new();
        }

        let escaped = Pattern::escape(&target_dir.to_string_lossy());
        let mut artifacts: Vec<PathBuf> = spec
            .libs
            .iter()
            .filter_map(|lib| match glob::glob(&format!("{}/{}", escaped, lib)) {
                Ok(paths) => Some(paths),
                Err(e) => {
                    tracing::warn!(platform = %spec.name, pattern = %lib, error = %e, "invalid library pattern");
                    None
                }
            })
            .flatten()
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        artifacts.sort();
        artifacts.dedup();
        artifacts
    }
}
