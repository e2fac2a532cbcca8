// Compression job data models
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded { compressed_size: u64 },
    Failed { reason: String },
}

impl JobStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded { .. } | JobStatus::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Compressing",
            JobStatus::Succeeded { .. } => "Success",
            JobStatus::Failed { .. } => "Failed",
        }
    }

    /// Pending -> Running -> {Succeeded, Failed}. Nothing else.
    fn can_become(&self, next: &JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Succeeded { .. })
                | (JobStatus::Running, JobStatus::Failed { .. })
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionJob {
    pub id: String,
    pub source_path: PathBuf,
    pub original_size: u64,
    pub status: JobStatus,
    pub output_path: Option<PathBuf>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl CompressionJob {
    pub fn new(source_path: PathBuf, original_size: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_path,
            original_size,
            status: JobStatus::Pending,
            output_path: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Only present once the job has succeeded.
    pub fn compressed_size(&self) -> Option<u64> {
        match self.status {
            JobStatus::Succeeded { compressed_size } => Some(compressed_size),
            _ => None,
        }
    }

    pub fn bytes_saved(&self) -> u64 {
        self.compressed_size()
            .map(|compressed| self.original_size.saturating_sub(compressed))
            .unwrap_or(0)
    }

    pub fn percent_saved(&self) -> f64 {
        match self.compressed_size() {
            Some(compressed) if self.original_size > 0 => {
                let saved = self.original_size as f64 - compressed as f64;
                (saved / self.original_size as f64 * 100.0).max(0.0)
            }
            _ => 0.0,
        }
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.source_path)
    }

    pub(crate) fn mark_running(&mut self) -> bool {
        self.transition(JobStatus::Running)
    }

    pub(crate) fn mark_succeeded(&mut self, compressed_size: u64, output_path: PathBuf) -> bool {
        let changed = self.transition(JobStatus::Succeeded { compressed_size });
        if changed {
            self.output_path = Some(output_path);
        }
        changed
    }

    pub(crate) fn mark_failed(&mut self, reason: impl Into<String>) -> bool {
        self.transition(JobStatus::Failed {
            reason: reason.into(),
        })
    }

    fn transition(&mut self, next: JobStatus) -> bool {
        if !self.status.can_become(&next) {
            return false;
        }
        if next.is_terminal() {
            self.completed_at = Some(chrono::Utc::now().to_rfc3339());
        }
        self.status = next;
        true
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
