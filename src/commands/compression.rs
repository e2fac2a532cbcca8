// Compression command handlers - the surface the front-end talks to
use crate::models::{CompressionJob, CompressionPreset, JobStatus};
use crate::queue::CompressionQueue;
use crate::utils::megabytes_string;
use log::debug;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handle to the session's queue
#[derive(Clone)]
pub struct CompressorState(pub Arc<CompressionQueue>);

/// Job view for the front-end
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: String,
    pub file_name: String,
    pub source_path: String,
    pub status: JobStatus,
    pub original_size: u64,
    pub compressed_size: Option<u64>,
    pub percent_saved: f64,
    pub output_path: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl From<&CompressionJob> for JobSnapshot {
    fn from(job: &CompressionJob) -> Self {
        Self {
            id: job.id.clone(),
            file_name: job.file_name(),
            source_path: job.source_path.to_string_lossy().to_string(),
            status: job.status.clone(),
            original_size: job.original_size,
            compressed_size: job.compressed_size(),
            percent_saved: job.percent_saved(),
            output_path: job
                .output_path
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            created_at: job.created_at.clone(),
            completed_at: job.completed_at.clone(),
        }
    }
}

impl JobSnapshot {
    /// One-line row: name, sizes, percent saved and status.
    pub fn summary(&self) -> String {
        let compressed = self
            .compressed_size
            .map(megabytes_string)
            .unwrap_or_else(|| "--".to_string());
        let saved = match self.status {
            JobStatus::Succeeded { .. } => format!("{:.1}%", self.percent_saved),
            _ => "--".to_string(),
        };

        let mut line = format!(
            "{}  {} → {}  {}  {}",
            self.file_name,
            megabytes_string(self.original_size),
            compressed,
            saved,
            self.status.label()
        );
        if let JobStatus::Failed { reason } = &self.status {
            line.push_str(": ");
            line.push_str(reason);
        }
        line
    }
}

/// Total savings payload
#[derive(Debug, Clone, Serialize)]
pub struct TotalSaved {
    pub bytes: u64,
    pub formatted: String,
}

fn snapshots(jobs: &[CompressionJob]) -> Vec<JobSnapshot> {
    jobs.iter().map(JobSnapshot::from).collect()
}

/// Queue dropped files; non-PDFs and repeats are ignored
pub fn admit_files(state: &CompressorState, paths: Vec<String>) -> Vec<JobSnapshot> {
    let admitted = state.0.admit(paths.iter().map(PathBuf::from));
    debug!("Admitted {} of {} dropped paths", admitted.len(), paths.len());
    snapshots(&admitted)
}

pub fn set_preset(state: &CompressorState, preset: String) -> Result<CompressionPreset, String> {
    let preset = preset
        .parse::<CompressionPreset>()
        .map_err(|e| e.to_string())?;
    state.0.set_preset(preset);
    Ok(preset)
}

pub fn get_preset(state: &CompressorState) -> CompressionPreset {
    state.0.preset()
}

pub fn list_jobs(state: &CompressorState) -> Vec<JobSnapshot> {
    snapshots(&state.0.jobs())
}

pub fn get_total_saved(state: &CompressorState) -> TotalSaved {
    let bytes = state.0.total_saved();
    TotalSaved {
        bytes,
        formatted: megabytes_string(bytes),
    }
}

pub async fn is_ghostscript_available(state: &CompressorState) -> bool {
    state.0.binary_available().await
}

/// Wait for the queue to finish, then list every job
pub async fn wait_for_idle(state: &CompressorState) -> Vec<JobSnapshot> {
    state.0.wait_until_idle().await;
    list_jobs(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: JobStatus) -> JobSnapshot {
        let mut job = CompressionJob::new(PathBuf::from("/docs/report.pdf"), 2_097_152);
        job.status = status;
        JobSnapshot::from(&job)
    }

    #[test]
    fn test_summary_success() {
        let snap = snapshot(JobStatus::Succeeded {
            compressed_size: 1_048_576,
        });
        assert_eq!(snap.percent_saved, 50.0);
        assert_eq!(snap.summary(), "report.pdf  2.00 MB → 1.00 MB  50.0%  Success");
    }

    #[test]
    fn test_summary_failed() {
        let snap = snapshot(JobStatus::Failed {
            reason: "error: corrupt xref".to_string(),
        });
        assert_eq!(snap.compressed_size, None);
        assert_eq!(
            snap.summary(),
            "report.pdf  2.00 MB → --  --  Failed: error: corrupt xref"
        );
    }

    #[test]
    fn test_snapshot_serializes_status_tag() {
        let snap = snapshot(JobStatus::Pending);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["status"]["state"], "pending");
        assert_eq!(json["file_name"], "report.pdf");
    }
}
