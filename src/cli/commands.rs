use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::cli::output::OutputFormat;
use crate::core::constants::platforms;
use crate::infrastructure::config::ConfigOverrides;

/// ulsdk CLI 应用程序
#[derive(Parser, Debug, Default)]
#[command(name = "ulsdk")]
#[command(about = "解压并整理 Ultralight SDK 压缩包，供多平台原生构建使用", long_about = None)]
#[command(version)]
#[command(after_help = "示例:
    # 自动在下载目录等位置查找
    ulsdk

    # 指定压缩包所在目录
    ulsdk --archives-dir ~/Downloads

    # 逐个指定压缩包
    ulsdk --win ~/Downloads/ultralight-free-sdk-1.4.0-win-x64.7z \\
          --linux ~/Downloads/ultralight-free-sdk-1.4.0-linux-x64.7z \\
          --mac ~/Downloads/ultralight-free-sdk-1.4.0-mac-x64.7z \\
          --mac-arm64 ~/Downloads/ultralight-free-sdk-1.4.0-mac-arm64.7z")]
pub struct Cli {
    /// 存放 SDK 压缩包的目录，优先于默认目录搜索
    #[arg(long, value_name = "DIR")]
    pub archives_dir: Option<PathBuf>,

    /// Windows x64 SDK 压缩包
    #[arg(long, value_name = "ARCHIVE")]
    pub win: Option<PathBuf>,

    /// Linux x64 SDK 压缩包
    #[arg(long, value_name = "ARCHIVE")]
    pub linux: Option<PathBuf>,

    /// macOS x64 SDK 压缩包
    #[arg(long, value_name = "ARCHIVE")]
    pub mac: Option<PathBuf>,

    /// macOS arm64 SDK 压缩包
    #[arg(long = "mac-arm64", value_name = "ARCHIVE")]
    pub mac_arm64: Option<PathBuf>,

    /// 仅显示当前 SDK 状态后退出
    #[arg(long)]
    pub list: bool,

    /// JSON 格式输出状态（配合 --list）
    #[arg(long, requires = "list")]
    pub json: bool,

    /// SDK 安装根目录（默认 <project-dir>/sdk）
    #[arg(long, value_name = "DIR")]
    pub sdk_dir: Option<PathBuf>,

    /// 项目目录，默认目录均以此为基准（默认当前目录）
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// 配置文件路径（默认 <project-dir>/ulsdk.toml）
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 覆盖已有安装时不再询问
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// 日志详细程度，可重复
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// 命令行指定的压缩包，按平台名
    pub fn manual_archives(&self) -> Vec<(String, PathBuf)> {
        [
            (platforms::WIN_X64, &self.win),
            (platforms::LINUX_X64, &self.linux),
            (platforms::MAC_X64, &self.mac),
            (platforms::MAC_ARM64, &self.mac_arm64),
        ]
        .into_iter()
        .filter_map(|(name, path)| path.clone().map(|p| (name.to_string(), p)))
        .collect()
    }

    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_dir: self.project_dir.clone(),
            config_path: self.config.clone(),
            sdk_dir: self.sdk_dir.clone(),
            archives_dir: self.archives_dir.clone(),
            assume_yes: self.yes,
        }
    }

    pub fn run_request(&self) -> RunRequest {
        RunRequest {
            manual_archives: self.manual_archives(),
            list_only: self.list,
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }
}

/// 一次运行的请求
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub manual_archives: Vec<(String, PathBuf)>,
    pub list_only: bool,
    pub format: OutputFormat,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            manual_archives: Vec::new(),
            list_only: false,
            format: OutputFormat::Text,
        }
    }
}
