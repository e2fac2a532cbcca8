// External process management
pub mod runner;

pub use runner::*;
