pub mod filesystem;
pub mod paths;

pub use filesystem::*;
pub use paths::*;
