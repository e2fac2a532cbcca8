// Compression preset model
use crate::error::CompressorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality/size tradeoff handed to Ghostscript as `-dPDFSETTINGS`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompressionPreset {
    Strong,
    #[default]
    Middle,
    Low,
}

impl CompressionPreset {
    pub const ALL: [CompressionPreset; 3] = [
        CompressionPreset::Strong,
        CompressionPreset::Middle,
        CompressionPreset::Low,
    ];

    /// Token passed to Ghostscript. These strings are part of its CLI contract.
    pub fn ghostscript_value(self) -> &'static str {
        match self {
            CompressionPreset::Strong => "/screen",
            CompressionPreset::Middle => "/ebook",
            CompressionPreset::Low => "/printer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompressionPreset::Strong => "Strong",
            CompressionPreset::Middle => "Middle",
            CompressionPreset::Low => "Low",
        }
    }
}

impl fmt::Display for CompressionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompressionPreset {
    type Err = CompressorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strong" | "screen" => Ok(CompressionPreset::Strong),
            "middle" | "ebook" => Ok(CompressionPreset::Middle),
            "low" | "printer" => Ok(CompressionPreset::Low),
            other => Err(CompressorError::UnknownPreset(other.to_string())),
        }
    }
}
