use std::path::{Path, PathBuf};

use crate::core::constants::archive;
use crate::core::platform::PlatformSpec;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::SetupConfig;
use crate::infrastructure::extractor::Extractor;
use crate::infrastructure::prompt::Confirm;
use crate::sdk::root_finder::SdkRootFinder;
use crate::sdk::validator::SdkValidator;
use crate::utils::{FileSystemUtils, MoveStrategy, PathUtils};

/// 单个平台安装的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// 已解压并移动到目标目录
    Installed {
        target: PathBuf,
        strategy: MoveStrategy,
    },
    /// 操作者拒绝覆盖，原有安装保持不变
    Skipped { target: PathBuf },
}

/// 平台安装器：解压、定位根目录、确认覆盖并移动到最终目录
pub struct PlatformInstaller<'a> {
    config: &'a SetupConfig,
    extractor: &'a dyn Extractor,
    confirm: &'a mut dyn Confirm,
}

impl<'a> PlatformInstaller<'a> {
    pub fn new(
        config: &'a SetupConfig,
        extractor: &'a dyn Extractor,
        confirm: &'a mut dyn Confirm,
    ) -> Self {
        Self {
            config,
            extractor,
            confirm,
        }
    }

    /// 安装一个平台
    ///
    /// 临时解压目录建在 SDK 根目录下，所有返回路径上都会被删除。
    /// 返回 `AppError::Io` 时表示移动/删除阶段失败，调用方应终止整个运行。
    pub fn install(&mut self, spec: &PlatformSpec, archive_path: &Path) -> AppResult<InstallOutcome> {
        let target = self.config.target_dir(&spec.name);
        println!("  压缩包: {}", PathUtils::file_name(archive_path));

        self.extractor.preflight(archive_path)?;

        if SdkValidator::is_installed(spec, &target) {
            println!("  SDK 已存在: {}", target.display());
            if !self.confirm.confirm("是否覆盖?")? {
                println!("  已跳过。");
                return Ok(InstallOutcome::Skipped { target });
            }
            tracing::info!(target = %target.display(), "removing existing install");
            FileSystemUtils::remove_dir_all(&target)?;
        } else if SdkValidator::is_stale(spec, &target) {
            println!("  目标目录已存在但不是有效的 SDK: {}", target.display());
            if !self.confirm.confirm("是否替换?")? {
                return Err(AppError::Path {
                    path: target.display().to_string(),
                    reason: "目标目录已存在且未被替换".to_string(),
                });
            }
            FileSystemUtils::remove_dir_all(&target)?;
        }

        FileSystemUtils::create_dir_all(&self.config.sdk_dir)?;
        let scratch = tempfile::Builder::new()
            .prefix(archive::SCRATCH_PREFIX)
            .tempdir_in(&self.config.sdk_dir)?;
        tracing::debug!(scratch = %scratch.path().display(), "created scratch directory");

        println!("  正在解压: {}", PathUtils::file_name(archive_path));
        self.extractor.extract(archive_path, scratch.path())?;

        let sdk_root = SdkRootFinder::new(&spec.marker)
            .find(scratch.path())
            .ok_or_else(|| AppError::SdkRootNotFound {
                marker: spec.marker.clone(),
            })?;
        println!("  找到 SDK 根目录: {}", sdk_root.display());

        let strategy = FileSystemUtils::move_dir(&sdk_root, &target)?;
        tracing::info!(?strategy, target = %target.display(), "SDK moved into place");

        // 根目录可能就是临时目录本身，此时它已被移走，drop 时忽略不存在的路径
        drop(scratch);

        Ok(InstallOutcome::Installed { target, strategy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::PlatformTable;
    use crate::infrastructure::extractor::test_support::write_zip;
    use crate::infrastructure::extractor::{ArchiveFormat, SystemExtractor};
    use crate::infrastructure::prompt::FixedAnswer;
    use std::fs;
    use tempfile::TempDir;

    const MARKER: &str = "include/Ultralight/Ultralight.h";

    /// 按给定前缀在解压目录中布置 SDK 结构
    struct FakeExtractor {
        prefix: Option<&'static str>,
        fail: bool,
    }

    impl Extractor for FakeExtractor {
        fn preflight(&self, archive: &Path) -> AppResult<ArchiveFormat> {
            ArchiveFormat::from_path(archive)
        }

        fn extract(&self, _archive: &Path, dest: &Path) -> AppResult<()> {
            if self.fail {
                return Err(AppError::ToolFailed {
                    tool: "7z".to_string(),
                    code: "2".to_string(),
                    stderr: "Data Error".to_string(),
                });
            }
            if let Some(prefix) = self.prefix {
                let root = dest.join(prefix);
                fs::create_dir_all(root.join("include/Ultralight")).unwrap();
                fs::write(root.join(MARKER), "// new").unwrap();
                fs::create_dir_all(root.join("bin")).unwrap();
                fs::write(root.join("bin/libUltralight.so"), "elf").unwrap();
            } else {
                fs::write(dest.join("README.txt"), "not an sdk").unwrap();
            }
            Ok(())
        }
    }

    fn setup() -> (TempDir, SetupConfig) {
        let temp = TempDir::new().unwrap();
        let config = SetupConfig::new(temp.path().to_path_buf());
        (temp, config)
    }

    fn linux() -> PlatformSpec {
        PlatformTable::builtin().get("linux-x64").unwrap().clone()
    }

    fn plant_existing(config: &SetupConfig, content: &str) -> PathBuf {
        let target = config.target_dir("linux-x64");
        fs::create_dir_all(target.join("include/Ultralight")).unwrap();
        fs::write(target.join(MARKER), content).unwrap();
        target
    }

    fn scratch_dirs(config: &SetupConfig) -> Vec<PathBuf> {
        if !config.sdk_dir.exists() {
            return Vec::new();
        }
        fs::read_dir(&config.sdk_dir)
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| PathUtils::file_name(p).starts_with(archive::SCRATCH_PREFIX))
            .collect()
    }

    #[test]
    fn test_install_nested_root() {
        let (_temp, config) = setup();
        let extractor = FakeExtractor {
            prefix: Some("ultralight-sdk-1.4.0-linux-x64"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(false);

        let outcome = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap();

        let target = config.target_dir("linux-x64");
        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                target: target.clone(),
                strategy: MoveStrategy::Rename
            }
        );
        assert!(target.join(MARKER).is_file());
        assert!(target.join("bin/libUltralight.so").is_file());
        assert!(confirm.asked.is_empty());
        assert!(scratch_dirs(&config).is_empty());
    }

    #[test]
    fn test_install_root_at_top_level() {
        let (_temp, config) = setup();
        let extractor = FakeExtractor {
            prefix: Some(""),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(false);

        PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.zip"))
            .unwrap();

        assert!(config.target_dir("linux-x64").join(MARKER).is_file());
        assert!(scratch_dirs(&config).is_empty());
    }

    #[test]
    fn test_declining_overwrite_keeps_existing() {
        let (_temp, config) = setup();
        let target = plant_existing(&config, "// old");
        let extractor = FakeExtractor {
            prefix: Some("sdk"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(false);

        let outcome = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap();

        assert_eq!(outcome, InstallOutcome::Skipped { target: target.clone() });
        assert_eq!(fs::read_to_string(target.join(MARKER)).unwrap(), "// old");
        assert_eq!(confirm.asked.len(), 1);
    }

    #[test]
    fn test_confirmed_overwrite_replaces_existing() {
        let (_temp, config) = setup();
        let target = plant_existing(&config, "// old");
        fs::write(target.join("stale.txt"), "left over").unwrap();
        let extractor = FakeExtractor {
            prefix: Some("sdk"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(true);

        PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap();

        assert_eq!(fs::read_to_string(target.join(MARKER)).unwrap(), "// new");
        assert!(!target.join("stale.txt").exists());
    }

    #[test]
    fn test_unknown_format_touches_nothing() {
        let (_temp, config) = setup();
        let target = plant_existing(&config, "// old");
        let extractor = FakeExtractor {
            prefix: Some("sdk"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(true);

        let err = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.tar.gz"))
            .unwrap_err();

        assert!(matches!(err, AppError::ArchiveFormat { .. }));
        assert!(confirm.asked.is_empty());
        assert_eq!(fs::read_to_string(target.join(MARKER)).unwrap(), "// old");
    }

    #[test]
    fn test_unknown_format_creates_no_target() {
        let (_temp, config) = setup();
        let extractor = SystemExtractor::new(vec!["7z".to_string()]);
        let mut confirm = FixedAnswer::always(true);

        let err = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.rar"))
            .unwrap_err();

        assert!(matches!(err, AppError::ArchiveFormat { .. }));
        assert!(!config.sdk_dir.exists());
    }

    #[test]
    fn test_extractor_failure_cleans_scratch() {
        let (_temp, config) = setup();
        let extractor = FakeExtractor {
            prefix: None,
            fail: true,
        };
        let mut confirm = FixedAnswer::always(false);

        let err = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap_err();

        assert!(matches!(err, AppError::ToolFailed { .. }));
        assert!(!err.is_fatal());
        assert!(scratch_dirs(&config).is_empty());
        assert!(!config.target_dir("linux-x64").exists());
    }

    #[test]
    fn test_root_not_found_cleans_scratch() {
        let (_temp, config) = setup();
        let extractor = FakeExtractor {
            prefix: None,
            fail: false,
        };
        let mut confirm = FixedAnswer::always(false);

        let err = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap_err();

        assert!(matches!(err, AppError::SdkRootNotFound { .. }));
        assert!(scratch_dirs(&config).is_empty());
        assert!(!config.target_dir("linux-x64").exists());
    }

    #[test]
    fn test_root_too_deep_not_found() {
        let (_temp, config) = setup();
        let extractor = FakeExtractor {
            prefix: Some("a/b/c"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(false);

        let err = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap_err();
        assert!(matches!(err, AppError::SdkRootNotFound { .. }));
    }

    #[test]
    fn test_stale_target_declined_is_error() {
        let (_temp, config) = setup();
        let target = config.target_dir("linux-x64");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("notes.txt"), "mine").unwrap();
        let extractor = FakeExtractor {
            prefix: Some("sdk"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(false);

        let err = PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap_err();
        assert!(matches!(err, AppError::Path { .. }));
        assert!(target.join("notes.txt").exists());
    }

    #[test]
    fn test_stale_file_target_confirmed_is_replaced() {
        let (_temp, config) = setup();
        let target = config.target_dir("linux-x64");
        fs::create_dir_all(&config.sdk_dir).unwrap();
        fs::write(&target, "stray file").unwrap();
        let extractor = FakeExtractor {
            prefix: Some("sdk"),
            fail: false,
        };
        let mut confirm = FixedAnswer::always(true);

        PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), Path::new("sdk-linux-x64.7z"))
            .unwrap();

        assert_eq!(confirm.asked, vec!["是否替换?"]);
        assert_eq!(fs::read_to_string(target.join(MARKER)).unwrap(), "// new");
    }

    #[test]
    fn test_install_real_zip() {
        let (temp, config) = setup();
        let archive = temp.path().join("ultralight-sdk-1.4.0-linux-x64.zip");
        write_zip(
            &archive,
            &[
                ("ultralight-sdk-1.4.0-linux-x64/include/Ultralight/Ultralight.h", "// h"),
                ("ultralight-sdk-1.4.0-linux-x64/bin/libUltralight.so", "elf"),
            ],
        );
        let extractor = SystemExtractor::new(vec!["7z".to_string()]);
        let mut confirm = FixedAnswer::always(false);

        PlatformInstaller::new(&config, &extractor, &mut confirm)
            .install(&linux(), &archive)
            .unwrap();

        let target = config.target_dir("linux-x64");
        assert!(target.join(MARKER).is_file());
        assert!(target.join("bin/libUltralight.so").is_file());
        assert!(scratch_dirs(&config).is_empty());
    }
}
