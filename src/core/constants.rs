//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的配置值。

/// SDK 布局相关常量
pub mod sdk {
    /// 标记文件：存在即视为有效的 SDK 根目录
    pub const MARKER_FILE: &str = "include/Ultralight/Ultralight.h";
    /// 项目目录下的 SDK 安装根目录名
    pub const SDK_DIR_NAME: &str = "sdk";
    /// SDK 下载地址
    pub const DOWNLOAD_URL: &str = "https://ultralig.ht/";
    /// 查找 SDK 根目录的最大深度
    pub const MAX_ROOT_DEPTH: usize = 2;
}

/// 压缩包相关常量
pub mod archive {
    /// 依次尝试的 7z 可执行文件名
    pub const SEVENZIP_COMMANDS: &[&str] = &["7z", "7za", "7zz"];
    /// 临时解压目录前缀
    pub const SCRATCH_PREFIX: &str = ".ulsdk-extract-";
}

/// 内置平台表
pub mod platforms {
    pub const WIN_X64: &str = "win-x64";
    pub const LINUX_X64: &str = "linux-x64";
    pub const MAC_X64: &str = "mac-x64";
    pub const MAC_ARM64: &str = "mac-arm64";

    pub const WIN_X64_PATTERNS: &[&str] = &["*win*x64*", "*win*64*", "*windows*"];
    pub const LINUX_X64_PATTERNS: &[&str] = &["*linux*x64*", "*linux*64*"];
    pub const MAC_X64_PATTERNS: &[&str] = &["*mac*x64*", "*macos*x64*", "*osx*x64*"];
    pub const MAC_ARM64_PATTERNS: &[&str] = &[
        "*mac*arm64*",
        "*macos*arm64*",
        "*mac*aarch64*",
        "*osx*arm64*",
    ];

    pub const WIN_LIBS: &[&str] = &["bin/*.dll", "lib/*.lib"];
    pub const LINUX_LIBS: &[&str] = &["bin/*.so*", "lib/*.so*"];
    pub const MAC_LIBS: &[&str] = &["bin/*.dylib", "lib/*.dylib"];
}

/// 配置文件相关常量
pub mod config {
    /// 项目目录下的默认配置文件名
    pub const CONFIG_FILE_NAME: &str = "ulsdk.toml";
    /// 用户下载目录名（dirs 无法识别时使用）
    pub const DOWNLOADS_DIR_NAME: &str = "Downloads";
}

/// 日志相关常量
pub mod log {
    /// 默认日志级别
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
    /// 日志级别环境变量
    pub const LOG_ENV: &str = "RUST_LOG";
}

/// 版本信息常量
pub mod version {
    /// 应用程序名称
    pub const APP_NAME: &str = "ulsdk";
    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
