pub mod constants;
pub mod platform;

pub use platform::*;
