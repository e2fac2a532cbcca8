// Data models (structs)
pub mod job;
pub mod preset;
pub mod settings;

pub use job::*;
pub use preset::*;
pub use settings::*;
