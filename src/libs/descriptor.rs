//! Pending-update descriptor: the handoff record between the two processes.
//!
//! The primary process and the updater communicate only through the
//! filesystem. Before exiting, the primary writes a single JSON descriptor at
//! a well-known machine-wide location; the updater reads it at startup and
//! takes every parameter from there. The updater is started with no
//! command-line arguments at all.
//!
//! The descriptor carries an explicit schema version so that future shape
//! changes do not break updater binaries still on disk from an earlier
//! release: a reader rejects any schema it does not know.

use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the pending-update descriptor in the machine-wide data directory.
pub const DESCRIPTOR_FILE: &str = "pending-update.json";

/// Descriptor schema version understood by this build.
pub const DESCRIPTOR_SCHEMA: u32 = 1;

#[derive(Debug, Error)]
pub enum DescriptorError {
    /// No descriptor file exists; the updater has nothing to do.
    #[error("no pending update descriptor at {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported descriptor schema version {found} (this updater understands {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("failed to read descriptor: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse descriptor: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisted instruction set for the updater process.
///
/// Written exactly once per update cycle by the primary process, consumed by
/// the updater. The updater deletes it before the risky copy phase begins, so
/// a failed apply does not re-trigger (or re-elevate) on the next launch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    /// Descriptor schema version; readers reject unknown versions.
    pub schema: u32,
    /// Path of the downloaded (or network-share) update archive.
    pub archive_path: PathBuf,
    /// Directory the update is applied into.
    pub install_dir: PathBuf,
    /// Executable to relaunch after a successful apply.
    pub target_exe: PathBuf,
    /// Process id of the primary process; the updater waits for it to exit.
    pub origin_pid: u32,
    /// Version string of the update being applied.
    pub remote_version: String,
    /// Whether writing into the install directory requires elevated privileges.
    pub requires_elevation: bool,
}

impl PendingUpdate {
    /// Default descriptor location in the machine-wide application data directory.
    pub fn default_path() -> Result<PathBuf> {
        DataStorage::machine().get_path(DESCRIPTOR_FILE)
    }

    /// Writes the descriptor as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), DescriptorError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates a descriptor.
    ///
    /// A missing file is reported as [`DescriptorError::NotFound`] so the
    /// updater can fail fast with a distinct message.
    pub fn load_from(path: &Path) -> Result<Self, DescriptorError> {
        if !path.exists() {
            return Err(DescriptorError::NotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path)?;
        let descriptor: PendingUpdate = serde_json::from_str(&raw)?;

        if descriptor.schema != DESCRIPTOR_SCHEMA {
            return Err(DescriptorError::UnsupportedSchema {
                found: descriptor.schema,
                supported: DESCRIPTOR_SCHEMA,
            });
        }

        Ok(descriptor)
    }

    /// Removes the descriptor file; a missing file is not an error.
    pub fn delete(path: &Path) -> Result<(), DescriptorError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
