use anyhow::Result;
use serde::Deserialize;
use std::env::consts::OS;
use std::env::var;
use std::path::{Path, PathBuf};
use std::{fs, str};

pub const VENDOR_NAME: &str = "lacodda";
pub const APP_NAME: &str = "acces-client";

/// Resolves platform-specific application data directories.
///
/// Two scopes exist: the per-user directory (configuration, client database,
/// downloaded archives) and the machine-wide directory, which holds the
/// pending-update descriptor so that an elevated updater instance finds the
/// same file as the unprivileged primary process.
#[derive(Deserialize, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    /// Per-user application data directory.
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    /// Machine-wide application data directory.
    ///
    /// On Windows this resolves under `%PROGRAMDATA%`; elsewhere it falls back
    /// to the per-user location, which is still shared between the primary
    /// process and the updater it spawns.
    pub fn machine() -> Self {
        match OS {
            "windows" => match var("PROGRAMDATA") {
                Ok(base) => Self {
                    base_path: Path::new(&base).join(VENDOR_NAME).join(APP_NAME),
                },
                Err(_) => Self::new(),
            },
            _ => Self::new(),
        }
    }

    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}
