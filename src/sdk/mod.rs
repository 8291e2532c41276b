pub mod installer;
pub mod locator;
pub mod root_finder;
pub mod status;
pub mod validator;

pub use installer::*;
pub use locator::*;
pub use root_finder::*;
pub use status::*;
pub use validator::*;
