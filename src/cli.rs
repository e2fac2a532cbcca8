// Command-line front-end
use crate::models::CompressionPreset;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pdf-compressor", version, about = "Compress PDF files with Ghostscript")]
pub struct Cli {
    /// PDF files to compress; anything else is ignored
    #[arg(required_unless_present = "check")]
    pub files: Vec<PathBuf>,

    /// strong, middle or low (defaults to the saved preset)
    #[arg(short, long)]
    pub preset: Option<CompressionPreset>,

    /// Use this Ghostscript binary instead of searching for one
    #[arg(long, value_name = "PATH")]
    pub ghostscript: Option<PathBuf>,

    /// Remember --preset as the default
    #[arg(long, requires = "preset")]
    pub save_preset: bool,

    /// Only report whether Ghostscript can be found
    #[arg(long)]
    pub check: bool,

    /// Print the final job list as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files_and_preset() {
        let cli = Cli::try_parse_from(["pdf-compressor", "-p", "strong", "a.pdf", "b.pdf"]).unwrap();
        assert_eq!(cli.preset, Some(CompressionPreset::Strong));
        assert_eq!(cli.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert!(!cli.json);
    }

    #[test]
    fn test_files_required_unless_check() {
        assert!(Cli::try_parse_from(["pdf-compressor"]).is_err());
        assert!(Cli::try_parse_from(["pdf-compressor", "--check"]).is_ok());
    }

    #[test]
    fn test_rejects_unknown_preset() {
        assert!(Cli::try_parse_from(["pdf-compressor", "-p", "ultra", "a.pdf"]).is_err());
    }

    #[test]
    fn test_save_preset_requires_preset() {
        assert!(Cli::try_parse_from(["pdf-compressor", "--save-preset", "a.pdf"]).is_err());
    }
}
