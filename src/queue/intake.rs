// File intake: PDF filter and dedup against every path seen this session
use crate::models::CompressionJob;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Turn dropped paths into pending jobs, in input order.
///
/// Anything that is not a readable regular `.pdf` file, or whose canonical
/// path is already in `known_paths`, is skipped without a job. A path only
/// enters `known_paths` once its job is created.
pub fn admit_paths<I, P>(paths: I, known_paths: &mut HashSet<PathBuf>) -> Vec<CompressionJob>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut jobs = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !has_pdf_extension(path) {
            debug!("Skipping non-PDF: {:?}", path);
            continue;
        }

        let canonical = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(e) => {
                debug!("Skipping unreadable {:?}: {}", path, e);
                continue;
            }
        };

        if known_paths.contains(&canonical) {
            debug!("Skipping duplicate: {:?}", canonical);
            continue;
        }

        let size = match fs::metadata(&canonical) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => {
                debug!("Skipping non-regular file: {:?}", canonical);
                continue;
            }
            Err(e) => {
                debug!("Skipping unreadable {:?}: {}", canonical, e);
                continue;
            }
        };

        known_paths.insert(canonical.clone());
        jobs.push(CompressionJob::new(canonical, size));
    }

    jobs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_case_insensitive() {
        assert!(has_pdf_extension(Path::new("/a/b.pdf")));
        assert!(has_pdf_extension(Path::new("/a/b.PdF")));
        assert!(!has_pdf_extension(Path::new("/a/b.txt")));
        assert!(!has_pdf_extension(Path::new("/a/pdf")));
    }

    #[test]
    fn test_filters_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.pdf");
        let a = dir.path().join("a.PDF");
        let txt = dir.path().join("notes.txt");
        fs::write(&b, vec![0u8; 20]).unwrap();
        fs::write(&a, vec![0u8; 10]).unwrap();
        fs::write(&txt, b"hello").unwrap();
        fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let mut known = HashSet::new();
        let jobs = admit_paths(
            vec![
                b.clone(),
                txt,
                dir.path().join("folder.pdf"),
                dir.path().join("missing.pdf"),
                a.clone(),
            ],
            &mut known,
        );

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source_path, fs::canonicalize(&b).unwrap());
        assert_eq!(jobs[0].original_size, 20);
        assert_eq!(jobs[1].source_path, fs::canonicalize(&a).unwrap());
        assert_eq!(jobs[1].original_size, 10);
        assert_eq!(known.len(), 2);
    }

    #[test]
    fn test_duplicates_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.pdf");
        fs::write(&a, b"%PDF").unwrap();
        let roundabout = dir.path().join(".").join("a.pdf");

        let mut known = HashSet::new();
        let jobs = admit_paths(vec![a.clone(), roundabout], &mut known);
        assert_eq!(jobs.len(), 1);

        assert!(admit_paths(vec![a], &mut known).is_empty());
    }

    #[test]
    fn test_unreadable_path_not_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let later = dir.path().join("later.pdf");

        let mut known = HashSet::new();
        assert!(admit_paths(vec![later.clone()], &mut known).is_empty());
        assert!(known.is_empty());

        fs::write(&later, b"%PDF").unwrap();
        assert_eq!(admit_paths(vec![later], &mut known).len(), 1);
    }
}
