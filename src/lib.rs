mod cli;
pub mod commands;
pub mod error;
mod file_manager;
pub mod ghostscript;
mod logging;
pub mod models;
pub mod process_manager;
pub mod queue;
pub mod utils;

use clap::Parser;
use cli::Cli;
use commands::compression::{
    admit_files, get_total_saved, is_ghostscript_available, wait_for_idle, CompressorState,
    JobSnapshot,
};
use error::{CompressorError, Result};
use file_manager::{read_json_file_or_default, write_json_file};
use log::{info, warn};
use models::{CompressionPreset, JobStatus, Settings};
use queue::{CompressionQueue, GHOSTSCRIPT_MISSING_MESSAGE};
use std::path::Path;
use std::sync::Arc;
use utils::get_settings_json_path;

fn load_settings() -> (Settings, Option<CompressorError>) {
    match read_json_file_or_default::<Settings>(&get_settings_json_path()) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    }
}

/// Rewrites only `default_preset`; an unreadable settings file is left as is.
fn save_default_preset(path: &Path, preset: CompressionPreset) -> Result<()> {
    let mut saved = read_json_file_or_default::<Settings>(path)?;
    saved.default_preset = preset;
    write_json_file(path, &saved)
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CompressorError::Runtime(e.to_string()))
}

/// CLI entry point. Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    let (mut settings, load_error) = load_settings();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        settings.log_level.clone()
    };
    logging::init(&level);

    if let Some(e) = load_error {
        warn!("Failed to load settings, using defaults: {}", e);
    }

    if let Some(path) = &cli.ghostscript {
        settings.ghostscript_path = Some(path.to_string_lossy().to_string());
    }

    if let Some(preset) = cli.preset {
        settings.default_preset = preset;
        if cli.save_preset {
            match save_default_preset(&get_settings_json_path(), preset) {
                Ok(()) => info!("Saved {} as the default preset", preset),
                Err(e) => warn!("Failed to save settings, leaving them untouched: {}", e),
            }
        }
    }

    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    runtime.block_on(compress(cli, settings))
}

async fn compress(cli: Cli, settings: Settings) -> i32 {
    let state = CompressorState(Arc::new(CompressionQueue::from_settings(&settings)));

    let available = is_ghostscript_available(&state).await;
    if cli.check {
        if available {
            println!("Ghostscript is available");
            return 0;
        }
        eprintln!("{}", GHOSTSCRIPT_MISSING_MESSAGE);
        return 1;
    }
    if !available {
        eprintln!("Warning: {}", GHOSTSCRIPT_MISSING_MESSAGE);
    }

    let paths = cli
        .files
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();
    if admit_files(&state, paths).is_empty() {
        eprintln!("No PDF files to compress");
        return 1;
    }

    let jobs = wait_for_idle(&state).await;
    print_report(&state, &jobs, cli.json);

    let all_succeeded = jobs
        .iter()
        .all(|j| matches!(j.status, JobStatus::Succeeded { .. }));
    if all_succeeded {
        0
    } else {
        1
    }
}

fn print_report(state: &CompressorState, jobs: &[JobSnapshot], json: bool) {
    let total = get_total_saved(state);

    if json {
        let report = serde_json::json!({
            "jobs": jobs,
            "total_saved": total,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to serialize report: {}", e),
        }
        return;
    }

    for job in jobs {
        println!("{}", job.summary());
    }
    println!("Saved {} total", total.formatted);
}
