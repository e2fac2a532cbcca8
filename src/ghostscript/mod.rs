// Ghostscript integration: discovery, arguments, environment, output naming
pub mod bundle;
pub mod invocation;
pub mod locator;
pub mod output_path;

pub use bundle::*;
pub use invocation::*;
pub use locator::*;
pub use output_path::*;
