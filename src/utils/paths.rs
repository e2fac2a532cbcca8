use log::debug;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static APP_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Directory holding the bundled Ghostscript tree, relative to a resources root.
pub const GHOSTSCRIPT_RESOURCE_DIR: &str = "Ghostscript";

pub fn get_app_data_dir() -> PathBuf {
    APP_DATA_DIR
        .get_or_init(|| {
            let base_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."));
            base_dir.join("PDFCompressor")
        })
        .clone()
}

pub fn get_settings_json_path() -> PathBuf {
    get_app_data_dir().join("settings.json")
}

/// Locate the resources root shipped next to the executable.
///
/// Checks the executable's own directory, a macOS-style `../Resources`, and then
/// walks up a few parents so development builds under `target/` find a
/// checked-in `Ghostscript/` tree.
pub fn get_bundle_resources_dir() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;
    find_resources_dir_from(exe_dir)
}

pub fn find_resources_dir_from(exe_dir: &Path) -> Option<PathBuf> {
    if exe_dir.join(GHOSTSCRIPT_RESOURCE_DIR).is_dir() {
        return Some(exe_dir.to_path_buf());
    }

    if let Some(contents) = exe_dir.parent() {
        let resources = contents.join("Resources");
        if resources.join(GHOSTSCRIPT_RESOURCE_DIR).is_dir() {
            return Some(resources);
        }
    }

    let mut current = exe_dir;
    for _ in 0..3 {
        match current.parent() {
            Some(parent) => {
                if parent.join(GHOSTSCRIPT_RESOURCE_DIR).is_dir() {
                    debug!("Found bundled Ghostscript at: {:?}", parent);
                    return Some(parent.to_path_buf());
                }
                current = parent;
            }
            None => break,
        }
    }

    None
}
