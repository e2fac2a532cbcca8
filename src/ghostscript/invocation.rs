use crate::models::CompressionPreset;
use std::path::Path;

/// Argument vector for one Ghostscript run. Order matters to its parser.
pub fn ghostscript_args(preset: CompressionPreset, output: &Path, source: &Path) -> Vec<String> {
    vec![
        "-sDEVICE=pdfwrite".to_string(),
        "-dCompatibilityLevel=1.6".to_string(),
        format!("-dPDFSETTINGS={}", preset.ghostscript_value()),
        "-dNOPAUSE".to_string(),
        "-dQUIET".to_string(),
        "-dBATCH".to_string(),
        format!("-sOutputFile={}", output.to_string_lossy()),
        source.to_string_lossy().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_order() {
        let args = ghostscript_args(
            CompressionPreset::Strong,
            Path::new("/docs/Compressed_a.pdf"),
            Path::new("/docs/a.pdf"),
        );
        assert_eq!(
            args,
            vec![
                "-sDEVICE=pdfwrite",
                "-dCompatibilityLevel=1.6",
                "-dPDFSETTINGS=/screen",
                "-dNOPAUSE",
                "-dQUIET",
                "-dBATCH",
                "-sOutputFile=/docs/Compressed_a.pdf",
                "/docs/a.pdf",
            ]
        );
    }
}
