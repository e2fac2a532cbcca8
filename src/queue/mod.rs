// Sequential compression queue
// Owns every job of the session and runs Ghostscript on them one at a time

pub mod intake;

use crate::ghostscript::{
    ghostscript_args, ghostscript_environment, resolve_output_path, GhostscriptLocator,
};
use crate::models::{CompressionJob, CompressionPreset, Settings};
use crate::process_manager::{ProcessOutput, ProcessRequest, ProcessRunner, TokioProcessRunner};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub use intake::{admit_paths, has_pdf_extension};

pub const GHOSTSCRIPT_MISSING_MESSAGE: &str =
    "Ghostscript not found. Bundle Resources/Ghostscript/bin/gs or install with: brew install ghostscript";
pub const NON_ZERO_EXIT_MESSAGE: &str = "Ghostscript returned non-zero exit code.";
pub const UNREADABLE_OUTPUT_MESSAGE: &str = "Unable to read compressed file size.";

struct QueueState {
    jobs: Vec<CompressionJob>,
    known_paths: HashSet<PathBuf>,
    total_saved: u64,
    preset: CompressionPreset,
}

/// A job taken off the queue, with the preset in force when it started.
struct ClaimedJob {
    id: String,
    source_path: PathBuf,
    preset: CompressionPreset,
}

enum JobOutcome {
    Succeeded {
        compressed_size: u64,
        output_path: PathBuf,
    },
    Failed(String),
}

pub struct CompressionQueue {
    state: Mutex<QueueState>,
    is_draining: AtomicBool,
    idle: Notify,
    locator: GhostscriptLocator,
    runner: Arc<dyn ProcessRunner>,
}

impl CompressionQueue {
    pub fn new(
        locator: GhostscriptLocator,
        runner: Arc<dyn ProcessRunner>,
        preset: CompressionPreset,
    ) -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: Vec::new(),
                known_paths: HashSet::new(),
                total_saved: 0,
                preset,
            }),
            is_draining: AtomicBool::new(false),
            idle: Notify::new(),
            locator,
            runner,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner);
        let locator = GhostscriptLocator::from_settings(settings, runner.clone());
        Self::new(locator, runner, settings.default_preset)
    }

    /// Queue the PDFs among `paths` and make sure a drain loop is running.
    ///
    /// Returns the newly created jobs; an empty result means nothing was
    /// queued and no loop was started.
    pub fn admit<I, P>(self: &Arc<Self>, paths: I) -> Vec<CompressionJob>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let admitted = self.enqueue(paths);
        if !admitted.is_empty() {
            self.start_draining();
        }
        admitted
    }

    fn enqueue<I, P>(&self, paths: I) -> Vec<CompressionJob>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut state = self.state.lock();
        let admitted = admit_paths(paths, &mut state.known_paths);
        for job in &admitted {
            info!("Queued {:?} ({} bytes)", job.source_path, job.original_size);
        }
        state.jobs.extend(admitted.iter().cloned());
        admitted
    }

    /// Applies to jobs that have not started yet.
    pub fn set_preset(&self, preset: CompressionPreset) {
        self.state.lock().preset = preset;
        debug!("Compression preset set to {}", preset);
    }

    pub fn preset(&self) -> CompressionPreset {
        self.state.lock().preset
    }

    pub fn jobs(&self) -> Vec<CompressionJob> {
        self.state.lock().jobs.clone()
    }

    pub fn total_saved(&self) -> u64 {
        self.state.lock().total_saved
    }

    pub fn has_pending(&self) -> bool {
        self.state.lock().jobs.iter().any(|j| j.status.is_pending())
    }

    pub fn is_draining(&self) -> bool {
        self.is_draining.load(Ordering::SeqCst)
    }

    /// Finds Ghostscript (priming the session cache) without queueing anything.
    pub async fn binary_available(&self) -> bool {
        self.locator.resolve().await.is_some()
    }

    /// Spawn a drain loop on the current runtime unless one is already active.
    pub fn start_draining(self: &Arc<Self>) -> bool {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime; pending jobs wait for an explicit drain");
                return false;
            }
        };

        if self.is_draining.swap(true, Ordering::SeqCst) {
            return false;
        }

        let queue = Arc::clone(self);
        handle.spawn(async move { queue.run_drain_loop().await });
        true
    }

    /// Run the drain loop on the caller's task. No-op while another loop is active.
    pub async fn drain(&self) {
        if self.is_draining.swap(true, Ordering::SeqCst) {
            debug!("Compression queue is already draining");
            return;
        }
        self.run_drain_loop().await;
    }

    /// Resolves once no loop is active and no job is pending.
    pub async fn wait_until_idle(&self) {
        loop {
            let mut notified = std::pin::pin!(self.idle.notified());
            notified.as_mut().enable();

            if !self.is_draining() {
                if !self.has_pending() {
                    return;
                }
                self.drain().await;
                continue;
            }

            notified.await;
        }
    }

    // Caller must already hold the draining flag.
    async fn run_drain_loop(&self) {
        info!("Compression queue started");
        loop {
            while let Some(claimed) = self.claim_next_pending() {
                let outcome = self.execute(&claimed).await;
                self.finish(&claimed.id, outcome);
            }

            self.is_draining.store(false, Ordering::SeqCst);

            // A job admitted after the last claim but before the store above
            // saw the flag set and did not start a loop of its own.
            if !self.has_pending() || self.is_draining.swap(true, Ordering::SeqCst) {
                break;
            }
        }
        info!("Compression queue drained");
        self.idle.notify_waiters();
    }

    fn claim_next_pending(&self) -> Option<ClaimedJob> {
        let mut state = self.state.lock();
        let preset = state.preset;
        let job = state.jobs.iter_mut().find(|j| j.status.is_pending())?;
        job.mark_running();
        info!("Compressing {:?} with preset {}", job.source_path, preset);
        Some(ClaimedJob {
            id: job.id.clone(),
            source_path: job.source_path.clone(),
            preset,
        })
    }

    async fn execute(&self, claimed: &ClaimedJob) -> JobOutcome {
        let binary = match self.locator.resolve().await {
            Some(path) => path,
            None => return JobOutcome::Failed(GHOSTSCRIPT_MISSING_MESSAGE.to_string()),
        };

        let output_path = resolve_output_path(&claimed.source_path);
        let request = ProcessRequest::new(
            &binary,
            ghostscript_args(claimed.preset, &output_path, &claimed.source_path),
        )
        .with_envs(ghostscript_environment(&binary, self.locator.bundle()));

        let output = match self.runner.run(&request).await {
            Ok(output) => output,
            Err(e) => return JobOutcome::Failed(e.to_string()),
        };

        if !output.success() {
            return JobOutcome::Failed(failure_message(&output));
        }

        match fs::metadata(&output_path) {
            Ok(meta) => JobOutcome::Succeeded {
                compressed_size: meta.len(),
                output_path,
            },
            Err(e) => {
                debug!("Cannot stat {:?}: {}", output_path, e);
                JobOutcome::Failed(UNREADABLE_OUTPUT_MESSAGE.to_string())
            }
        }
    }

    fn finish(&self, id: &str, outcome: JobOutcome) {
        let mut state = self.state.lock();
        let Some(job) = state.jobs.iter_mut().find(|j| j.id == id) else {
            return;
        };

        match outcome {
            JobOutcome::Succeeded {
                compressed_size,
                output_path,
            } => {
                job.mark_succeeded(compressed_size, output_path);
                info!(
                    "Compressed {:?}: {} -> {} bytes ({:.1}% saved)",
                    job.source_path,
                    job.original_size,
                    compressed_size,
                    job.percent_saved()
                );
                state.total_saved = state.jobs.iter().map(CompressionJob::bytes_saved).sum();
            }
            JobOutcome::Failed(reason) => {
                warn!("Failed to compress {:?}: {}", job.source_path, reason);
                job.mark_failed(reason);
            }
        }
    }
}

/// stderr, else stdout, else the generic message.
fn failure_message(output: &ProcessOutput) -> String {
    let message = if output.stderr.is_empty() {
        output.stdout.trim()
    } else {
        output.stderr.trim()
    };

    if message.is_empty() {
        NON_ZERO_EXIT_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}
