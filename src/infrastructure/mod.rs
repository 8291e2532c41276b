pub mod config;
pub mod extractor;
pub mod logging;
pub mod prompt;

pub use config::*;
pub use extractor::*;
pub use logging::*;
pub use prompt::*;
