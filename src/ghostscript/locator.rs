// Ghostscript binary discovery with a session cache
use super::bundle::GhostscriptBundle;
use crate::models::Settings;
use crate::process_manager::{ProcessRequest, ProcessRunner};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const GHOSTSCRIPT_BINARY_NAME: &str = "gs";

#[cfg(windows)]
const WHICH_PROGRAM: &str = "where";
#[cfg(not(windows))]
const WHICH_PROGRAM: &str = "/usr/bin/which";

lazy_static::lazy_static! {
    /// Package-manager install locations (Apple Silicon Homebrew, Intel Homebrew).
    pub static ref WELL_KNOWN_PATHS: Vec<PathBuf> = vec![
        PathBuf::from("/opt/homebrew/bin/gs"),
        PathBuf::from("/usr/local/bin/gs"),
    ];
}

#[cfg(unix)]
pub fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

pub struct GhostscriptLocator {
    explicit_path: Option<PathBuf>,
    bundle: Option<GhostscriptBundle>,
    search_paths: Vec<PathBuf>,
    which_program: Option<PathBuf>,
    runner: Arc<dyn ProcessRunner>,
    cached: Mutex<Option<PathBuf>>,
}

impl GhostscriptLocator {
    /// Bundled binary, then well-known paths, then `which gs`.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            explicit_path: None,
            bundle: GhostscriptBundle::discover(),
            search_paths: WELL_KNOWN_PATHS.clone(),
            which_program: Some(PathBuf::from(WHICH_PROGRAM)),
            runner,
            cached: Mutex::new(None),
        }
    }

    pub fn from_settings(settings: &Settings, runner: Arc<dyn ProcessRunner>) -> Self {
        let mut locator = Self::new(runner);
        locator.explicit_path = settings
            .ghostscript_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        locator
            .search_paths
            .extend(settings.extra_search_paths.iter().map(PathBuf::from));
        locator
    }

    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_path = path;
        self
    }

    pub fn with_bundle(mut self, bundle: Option<GhostscriptBundle>) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// `None` disables the `which` fallback.
    pub fn with_which_program(mut self, program: Option<PathBuf>) -> Self {
        self.which_program = program;
        self
    }

    pub fn bundle(&self) -> Option<&GhostscriptBundle> {
        self.bundle.as_ref()
    }

    pub fn cached_path(&self) -> Option<PathBuf> {
        self.cached.lock().clone()
    }

    /// Cached path if it is still an executable, otherwise a fresh search.
    pub async fn resolve(&self) -> Option<PathBuf> {
        let cached = self.cached_path();
        if let Some(path) = cached {
            if is_executable_file(&path) {
                return Some(path);
            }
            warn!("Cached Ghostscript at {:?} is gone, searching again", path);
        }

        let discovered = self.locate().await;
        *self.cached.lock() = discovered.clone();
        discovered
    }

    /// Full search, ignoring the cache. First executable candidate wins.
    pub async fn locate(&self) -> Option<PathBuf> {
        if let Some(path) = self.explicit_path.as_ref() {
            if is_executable_file(path) {
                info!("Using configured Ghostscript: {:?}", path);
                return Some(path.clone());
            }
            warn!("Configured Ghostscript {:?} is not an executable file", path);
        }

        if let Some(bundle) = self.bundle.as_ref() {
            let path = bundle.binary_path();
            if is_executable_file(&path) {
                info!("Using bundled Ghostscript: {:?}", path);
                return Some(path);
            }
        }

        if let Some(path) = self.search_paths.iter().find(|p| is_executable_file(p)) {
            info!("Found Ghostscript at: {:?}", path);
            return Some(path.clone());
        }

        let found = self.which_lookup().await;
        match &found {
            Some(path) => info!("Found Ghostscript on PATH: {:?}", path),
            None => warn!("Ghostscript not found"),
        }
        found
    }

    async fn which_lookup(&self) -> Option<PathBuf> {
        let which = self.which_program.as_ref()?;
        let request = ProcessRequest::new(which, vec![GHOSTSCRIPT_BINARY_NAME.to_string()]);

        let output = match self.runner.run(&request).await {
            Ok(output) => output,
            Err(e) => {
                debug!("Failed to run {:?}: {}", which, e);
                return None;
            }
        };

        if !output.success() {
            return None;
        }

        let path = output.stdout.trim().lines().next()?.trim();
        if path.is_empty() {
            return None;
        }

        let path = PathBuf::from(path);
        is_executable_file(&path).then_some(path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process_manager::ProcessOutput;
    use async_trait::async_trait;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeWhich {
        output: Option<ProcessOutput>,
        calls: AtomicUsize,
    }

    impl FakeWhich {
        fn new(output: Option<ProcessOutput>) -> Arc<Self> {
            Arc::new(Self {
                output,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeWhich {
        async fn run(&self, request: &ProcessRequest) -> std::io::Result<ProcessOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.args, vec![GHOSTSCRIPT_BINARY_NAME.to_string()]);
            self.output
                .clone()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no which"))
        }
    }

    fn make_executable(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn locator(runner: Arc<FakeWhich>) -> GhostscriptLocator {
        GhostscriptLocator::new(runner)
            .with_bundle(None)
            .with_search_paths(vec![])
            .with_which_program(Some(PathBuf::from("/usr/bin/which")))
    }

    #[test]
    fn test_is_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        fs::write(&plain, b"x").unwrap();
        assert!(!is_executable_file(&plain));
        assert!(!is_executable_file(dir.path()));

        let exe = dir.path().join("exe");
        make_executable(&exe);
        assert!(is_executable_file(&exe));
    }

    #[tokio::test]
    async fn test_bundle_wins_over_search_paths() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = GhostscriptBundle::new(dir.path().join("Resources"));
        make_executable(&bundle.binary_path());
        let system = dir.path().join("usr/local/bin/gs");
        make_executable(&system);

        let runner = FakeWhich::new(None);
        let locator = locator(runner.clone())
            .with_bundle(Some(bundle.clone()))
            .with_search_paths(vec![system]);

        assert_eq!(locator.locate().await, Some(bundle.binary_path()));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_skips_non_executable_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("opt/homebrew/bin/gs");
        let not_exec = dir.path().join("plain-gs");
        fs::write(&not_exec, b"x").unwrap();
        let good = dir.path().join("usr/local/bin/gs");
        make_executable(&good);

        let locator = locator(FakeWhich::new(None)).with_search_paths(vec![missing, not_exec, good.clone()]);
        assert_eq!(locator.locate().await, Some(good));
    }

    #[tokio::test]
    async fn test_which_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let gs = dir.path().join("bin/gs");
        make_executable(&gs);

        let runner = FakeWhich::new(Some(ProcessOutput {
            exit_code: 0,
            stdout: format!("{}\n", gs.to_string_lossy()),
            stderr: String::new(),
        }));
        let locator = locator(runner.clone());

        assert_eq!(locator.locate().await, Some(gs));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_which_failure_is_not_found() {
        let failing = FakeWhich::new(Some(ProcessOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: String::new(),
        }));
        assert_eq!(locator(failing).locate().await, None);

        let empty = FakeWhich::new(Some(ProcessOutput {
            exit_code: 0,
            stdout: "  \n".to_string(),
            stderr: String::new(),
        }));
        assert_eq!(locator(empty).locate().await, None);

        assert_eq!(locator(FakeWhich::new(None)).locate().await, None);
    }

    #[tokio::test]
    async fn test_cache_reused_then_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first/gs");
        let second = dir.path().join("second/gs");
        make_executable(&first);
        make_executable(&second);

        let runner = FakeWhich::new(None);
        let locator = locator(runner).with_search_paths(vec![first.clone(), second.clone()]);

        assert_eq!(locator.resolve().await, Some(first.clone()));
        assert_eq!(locator.cached_path(), Some(first.clone()));

        fs::remove_file(&first).unwrap();
        assert_eq!(locator.resolve().await, Some(second.clone()));
        assert_eq!(locator.cached_path(), Some(second));
    }

    #[tokio::test]
    async fn test_explicit_path_first() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("custom/gs");
        let system = dir.path().join("system/gs");
        make_executable(&explicit);
        make_executable(&system);

        let locator = locator(FakeWhich::new(None))
            .with_search_paths(vec![system])
            .with_explicit_path(Some(explicit.clone()));
        assert_eq!(locator.locate().await, Some(explicit));
    }
}
