// Ghostscript shipped inside the application's resources
use crate::utils::{get_bundle_resources_dir, GHOSTSCRIPT_RESOURCE_DIR};
use std::path::{Path, PathBuf};

#[cfg(windows)]
const GS_LIB_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const GS_LIB_SEPARATOR: &str = ":";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostscriptBundle {
    resources_dir: PathBuf,
}

impl GhostscriptBundle {
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
        }
    }

    pub fn discover() -> Option<Self> {
        get_bundle_resources_dir().map(Self::new)
    }

    pub fn root(&self) -> PathBuf {
        self.resources_dir.join(GHOSTSCRIPT_RESOURCE_DIR)
    }

    pub fn binary_path(&self) -> PathBuf {
        self.root()
            .join("bin")
            .join(format!("gs{}", std::env::consts::EXE_SUFFIX))
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root().join("lib")
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.root().join("fonts")
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.resources_dir)
    }

    /// `GS_LIB` pointing at whichever of the bundled lib/fonts directories exist.
    pub fn environment(&self) -> Vec<(String, String)> {
        let parts: Vec<String> = [self.lib_dir(), self.fonts_dir()]
            .iter()
            .filter(|dir| dir.exists())
            .map(|dir| dir.to_string_lossy().to_string())
            .collect();

        if parts.is_empty() {
            return Vec::new();
        }

        vec![("GS_LIB".to_string(), parts.join(GS_LIB_SEPARATOR))]
    }
}

/// Extra environment for running `binary`: only a bundled binary gets one.
pub fn ghostscript_environment(
    binary: &Path,
    bundle: Option<&GhostscriptBundle>,
) -> Vec<(String, String)> {
    match bundle {
        Some(bundle) if bundle.contains(binary) => bundle.environment(),
        _ => Vec::new(),
    }
}
