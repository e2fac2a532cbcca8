// Command handlers - one file per domain
pub mod compression;
