pub mod app_error;
pub mod context;

pub use app_error::*;
pub use context::*;
