// Settings data models
use crate::models::CompressionPreset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_preset: CompressionPreset,
    /// Explicit Ghostscript binary, tried before any discovery.
    #[serde(default)]
    pub ghostscript_path: Option<String>,
    /// Extra locations checked after the well-known install paths.
    #[serde(default)]
    pub extra_search_paths: Vec<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    String::from("info")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_preset: CompressionPreset::default(),
            ghostscript_path: None,
            extra_search_paths: Vec::new(),
            log_level: default_log_level(),
        }
    }
}
