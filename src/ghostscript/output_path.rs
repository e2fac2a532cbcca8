use std::path::{Path, PathBuf};

pub const COMPRESSED_PREFIX: &str = "Compressed_";

/// Pick where the compressed copy of `input` goes.
///
/// `Compressed_<stem>.pdf` next to the input, with `_1`, `_2`, ... appended
/// while that name is taken by some other file. A stem that already carries
/// the prefix loses one copy of it first, so recompressing an output lands on
/// its own name instead of `Compressed_Compressed_...`.
pub fn resolve_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let base = stem.strip_prefix(COMPRESSED_PREFIX).unwrap_or(&stem);
    let directory = input.parent().unwrap_or_else(|| Path::new(""));

    let mut candidate = directory.join(format!("{}{}.pdf", COMPRESSED_PREFIX, base));
    let mut index = 1u32;
    while candidate.exists() && candidate != input {
        candidate = directory.join(format!("{}{}_{}.pdf", COMPRESSED_PREFIX, base, index));
        index += 1;
    }

    candidate
}
