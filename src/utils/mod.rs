pub mod format;
pub mod paths;

pub use format::*;
pub use paths::*;
