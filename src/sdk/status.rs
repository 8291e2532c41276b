use serde::Serialize;
use std::path::PathBuf;

use crate::infrastructure::config::SetupConfig;
use crate::sdk::validator::SdkValidator;

/// 单个平台在磁盘上的安装状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformStatus {
    pub platform: String,
    pub target_dir: PathBuf,
    pub installed: bool,
    pub libraries: usize,
}

/// 状态报告器，只读
pub struct StatusReporter<'a> {
    config: &'a SetupConfig,
}

impl<'a> StatusReporter<'a> {
    pub fn new(config: &'a SetupConfig) -> Self {
        Self { config }
    }

    /// 检查平台表中每个平台的安装目录
    pub fn inspect(&self) -> Vec<PlatformStatus> {
        self.config
            .platforms
            .iter()
            .map(|spec| {
                let target_dir = self.config.target_dir(&spec.name);
                let installed = SdkValidator::is_installed(spec, &target_dir);
                let libraries = if installed {
                    SdkValidator::library_artifacts(spec, &target_dir).len()
                } else {
                    0
                };
                PlatformStatus {
                    platform: spec.name.clone(),
                    target_dir,
                    installed,
                    libraries,
                }
            })
            .collect()
    }
}
