// 核心模块
pub mod cli;
pub mod core;
pub mod error;
pub mod infrastructure;
pub mod sdk;
pub mod utils;

// 重新导出常用类型
pub use cli::*;
pub use error::*;
pub use sdk::*;
pub use utils::*;
pub use crate::core::platform::{HostOs, PlatformSpec, PlatformTable};
// 使用命名空间导入常量，避免冲突
pub use crate::core::constants as app_constants;

pub use infrastructure::config::{ConfigOverrides, SetupConfig};
pub use infrastructure::extractor::{ArchiveFormat, Extractor, SystemExtractor};
pub use infrastructure::prompt::{AssumeYes, Confirm, LineConfirm};
