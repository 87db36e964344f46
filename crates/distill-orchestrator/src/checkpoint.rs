//! Stage checkpoints on disk
//!
//! Every save writes two files with the same payload:
//!
//! ```text
//! checkpoint_<stage>_<YYYYmmdd_HHMMSS>.json   written once
//! checkpoint_<stage>_latest.json              overwritten each run
//! ```
//!
//! The directory is single-writer; concurrent runs sharing it are not
//! coordinated.

use crate::CheckpointError;
use chrono::Local;
use distill_domain::PipelineStage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const LATEST_SUFFIX: &str = "latest";

/// One stage's output as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<T> {
    /// Stage name, e.g. `stage1_deconstruction`
    pub stage: String,

    /// Local time of the write, `YYYYmmdd_HHMMSS`
    pub timestamp: String,

    /// Stage-specific payload
    pub data: T,
}

/// Reads and writes checkpoints in one directory
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    directory: PathBuf,
}

impl CheckpointStore {
    /// Create a store rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Checkpoint directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the overwritten alias for `stage`
    pub fn latest_path(&self, stage: PipelineStage) -> PathBuf {
        self.directory
            .join(format!("checkpoint_{}_{}.json", stage, LATEST_SUFFIX))
    }

    /// Persist `data` for `stage`, returning the timestamped path
    pub fn save<T: Serialize + ?Sized>(
        &self,
        stage: PipelineStage,
        data: &T,
    ) -> Result<PathBuf, CheckpointError> {
        self.save_within(stage, data, None)
    }

    /// Persist `data` for `stage` unless `deadline` passes first
    ///
    /// The deadline is checked between file operations. A timestamped file
    /// written after the deadline is removed again, and the `latest` alias
    /// is only replaced while the deadline holds. A file system call already
    /// in progress is not interrupted.
    pub fn save_within<T: Serialize + ?Sized>(
        &self,
        stage: PipelineStage,
        data: &T,
        deadline: Option<Instant>,
    ) -> Result<PathBuf, CheckpointError> {
        let expired = || deadline.is_some_and(|deadline| Instant::now() >= deadline);

        fs::create_dir_all(&self.directory)?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let checkpoint = Checkpoint {
            stage: stage.as_str().to_string(),
            timestamp: timestamp.clone(),
            data,
        };
        let json = serde_json::to_string_pretty(&checkpoint)?;
        if expired() {
            return Err(CheckpointError::DeadlineExceeded(stage));
        }

        let path = self
            .directory
            .join(format!("checkpoint_{}_{}.json", stage, timestamp));
        fs::write(&path, &json)?;
        if expired() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove late checkpoint {}: {}", path.display(), e);
            }
            return Err(CheckpointError::DeadlineExceeded(stage));
        }
        fs::write(self.latest_path(stage), &json)?;

        debug!("Wrote checkpoint {}", path.display());
        Ok(path)
    }

    /// Load the checkpoint for `stage`
    ///
    /// `use_latest` reads the alias; otherwise the newest timestamped file.
    pub fn load<T: DeserializeOwned>(
        &self,
        stage: PipelineStage,
        use_latest: bool,
    ) -> Result<Checkpoint<T>, CheckpointError> {
        let path = if use_latest {
            self.latest_path(stage)
        } else {
            self.newest_timestamped(stage)?
                .ok_or(CheckpointError::NotFound(stage))?
        };

        if !path.exists() {
            return Err(CheckpointError::NotFound(stage));
        }

        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Timestamped checkpoints for `stage`, oldest first
    pub fn list(&self, stage: PipelineStage) -> Result<Vec<PathBuf>, CheckpointError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("checkpoint_{}_", stage);
        let latest = format!("{}{}.json", prefix, LATEST_SUFFIX);

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(&prefix) && name.ends_with(".json") && name != latest {
                paths.push(path);
            }
        }

        // Timestamp format sorts lexicographically
        paths.sort();
        Ok(paths)
    }

    fn newest_timestamped(&self, stage: PipelineStage) -> Result<Option<PathBuf>, CheckpointError> {
        Ok(self.list(stage)?.pop())
    }
}
