use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::constants::{archive, config as config_consts, sdk};
use crate::core::platform::{PlatformSpec, PlatformTable};
use crate::error::{AppError, AppResult};
use crate::utils::PathUtils;

/// 配置文件结构（ulsdk.toml）
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// SDK 安装根目录，相对路径按项目目录解析
    #[serde(default)]
    pub sdk_dir: Option<String>,
    /// 替换默认搜索目录
    #[serde(default)]
    pub search_dirs: Option<Vec<String>>,
    /// 7z 可执行文件候选名
    #[serde(default)]
    pub sevenzip_commands: Option<Vec<String>>,
    /// 替换内置平台表
    #[serde(default)]
    pub platforms: Vec<PlatformSpec>,
}

impl ConfigFile {
    /// 从文件加载配置
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| AppError::config(format!("解析配置文件 {} 失败: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// 命令行传入、优先级高于配置文件的选项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub sdk_dir: Option<PathBuf>,
    pub archives_dir: Option<PathBuf>,
    pub assume_yes: bool,
}

/// 一次运行的完整配置，构建后只读
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub project_dir: PathBuf,
    pub sdk_dir: PathBuf,
    /// 按优先级排列的搜索目录
    pub search_dirs: Vec<PathBuf>,
    pub platforms: PlatformTable,
    pub sevenzip_commands: Vec<String>,
    pub assume_yes: bool,
}

impl SetupConfig {
    /// 以项目目录为基准的默认配置
    pub fn new(project_dir: PathBuf) -> Self {
        SetupConfig {
            sdk_dir: project_dir.join(sdk::SDK_DIR_NAME),
            search_dirs: default_search_dirs(&project_dir),
            platforms: PlatformTable::builtin(),
            sevenzip_commands: archive::SEVENZIP_COMMANDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            assume_yes: false,
            project_dir,
        }
    }

    /// 合并默认值、配置文件和命令行选项
    pub fn resolve(overrides: &ConfigOverrides) -> AppResult<Self> {
        let project_dir = match &overrides.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let explicit = overrides.config_path.is_some();
        let config_path = overrides
            .config_path
            .clone()
            .unwrap_or_else(|| project_dir.join(config_consts::CONFIG_FILE_NAME));

        let file = if config_path.is_file() {
            tracing::info!(path = %config_path.display(), "loading config file");
            ConfigFile::load(&config_path)?
        } else if explicit {
            return Err(AppError::config(format!(
                "配置文件不存在: {}",
                config_path.display()
            )));
        } else {
            ConfigFile::default()
        };

        let mut config = Self::new(project_dir).apply_file(file)?;

        if let Some(sdk_dir) = &overrides.sdk_dir {
            config.sdk_dir = sdk_dir.clone();
        }
        if let Some(archives_dir) = &overrides.archives_dir {
            config.search_dirs.retain(|d| d != archives_dir);
            config.search_dirs.insert(0, archives_dir.clone());
        }
        config.assume_yes = overrides.assume_yes;

        Ok(config)
    }

    fn apply_file(mut self, file: ConfigFile) -> AppResult<Self> {
        if let Some(sdk_dir) = file.sdk_dir {
            self.sdk_dir = PathUtils::resolve(&self.project_dir, &sdk_dir);
        }
        if let Some(dirs) = file.search_dirs {
            self.search_dirs = dirs
                .iter()
                .map(|d| PathUtils::resolve(&self.project_dir, d))
                .collect();
        }
        if let Some(commands) = file.sevenzip_commands {
            if commands.is_empty() {
                return Err(AppError::config("sevenzip_commands 不能为空"));
            }
            self.sevenzip_commands = commands;
        }
        if !file.platforms.is_empty() {
            self.platforms = PlatformTable::new(file.platforms)?;
        }
        Ok(self)
    }

    /// 平台的最终安装目录
    pub fn target_dir(&self, platform: &str) -> PathBuf {
        self.sdk_dir.join(platform)
    }
}

/// 默认搜索目录：下载目录、项目目录、项目上级目录
fn default_search_dirs(project_dir: &Path) -> Vec<PathBuf> {
    let mut dirs_list = Vec::new();

    let downloads = dirs::download_dir().or_else(|| {
        dirs::home_dir().map(|home| home.join(config_consts::DOWNLOADS_DIR_NAME))
    });
    if let Some(downloads) = downloads {
        dirs_list.push(downloads);
    }

    dirs_list.push(project_dir.to_path_buf());
    if let Some(parent) = project_dir.parent() {
        if !parent.as_os_str().is_empty() {
            dirs_list.push(parent.to_path_buf());
        }
    }

    let mut unique: Vec<PathBuf> = Vec::with_capacity(dirs_list.len());
    for dir in dirs_list {
        if !unique.contains(&dir) {
            unique.push(dir);
        }
    }
    unique
}
