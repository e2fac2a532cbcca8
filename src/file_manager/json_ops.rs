// Atomic JSON file operations

use crate::error::{CompressorError, Result};
use log::debug;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

lazy_static::lazy_static! {
    static ref FILE_LOCK: Mutex<()> = Mutex::new(());
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let _lock = FILE_LOCK.lock();

    if !path.exists() {
        return Err(CompressorError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;

    serde_json::from_str(&contents).map_err(|source| CompressorError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes JSON atomically using write-to-temp-then-rename
pub fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let _lock = FILE_LOCK.lock();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json_string = serde_json::to_string_pretty(data).map_err(CompressorError::Serialize)?;

    let temp_path = path.with_extension("tmp");

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(json_string.as_bytes())?;
    temp_file.sync_all()?;

    fs::rename(&temp_path, path)?;

    debug!("Wrote {:?}", path);
    Ok(())
}

pub fn read_json_file_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        read_json_file(path)
    } else {
        Ok(T::default())
    }
}
