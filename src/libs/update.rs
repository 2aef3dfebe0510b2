//! Primary-process side of the update pipeline.
//!
//! Sequence: reachability probe → version oracle → user confirmation →
//! write the pending-update descriptor → launch the updater process → exit.
//! Everything before the confirmation prompt fails silently (logged at debug
//! level only) so an unreachable share or a corrupt archive never disturbs
//! normal startup.

use crate::libs::apply::dir_writable;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::descriptor::{PendingUpdate, DESCRIPTOR_SCHEMA};
use crate::libs::messages::Message;
use crate::libs::oracle::{self, UpdateCheck};
use crate::libs::probe::Probe;
use crate::libs::version::Version;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use reqwest::Client;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// File name the downloaded archive is stored under in the app data directory.
pub const UPDATE_ARCHIVE_FILE: &str = "update.zip";

/// Where the update archive lives.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateSource {
    Http(String),
    Path(PathBuf),
}

impl UpdateSource {
    pub fn from_config(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            UpdateSource::Http(raw.to_string())
        } else {
            UpdateSource::Path(PathBuf::from(raw))
        }
    }
}

/// Orchestrates the update check and the handoff to the updater process.
#[derive(Debug)]
pub struct Updater {
    client: Client,
    probe: Probe,
    pub name: String,
    pub version: Version,
    source: UpdateSource,
    probe_timeout: Duration,
    pub latest_version: Option<Version>,
    archive_path: Option<PathBuf>,
    downloaded: Option<PathBuf>,
}

impl Updater {
    /// Builds an updater from an explicitly provided configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let update = config.update.as_ref().ok_or_else(|| msg_error_anyhow!(Message::UpdateSourceNotConfigured))?;

        Ok(Self {
            client: Client::new(),
            probe: Probe::new(),
            name: APP_METADATA_NAME.to_owned(),
            version: Version::parse(APP_METADATA_VERSION),
            source: UpdateSource::from_config(&update.source),
            probe_timeout: Duration::from_secs(update.probe_timeout_secs),
            latest_version: None,
            archive_path: None,
            downloaded: None,
        })
    }

    /// Probes the source and asks the version oracle whether an update exists.
    ///
    /// Never fails the caller for "no update" situations: unreachable
    /// sources, download failures, corrupt archives and missing markers all
    /// come back as their [`UpdateCheck`] reason codes.
    pub async fn check(&mut self) -> Result<UpdateCheck> {
        let reachable = match &self.source {
            UpdateSource::Http(url) => self.probe.http_reachable(url, self.probe_timeout).await,
            UpdateSource::Path(path) => Probe::path_reachable(path, self.probe_timeout).await,
        };
        if !reachable {
            return Ok(UpdateCheck::Unreachable);
        }

        let archive = match self.materialize_archive().await {
            Ok(path) => path,
            Err(error) => {
                tracing::debug!(%error, "failed to obtain the update archive");
                return Ok(UpdateCheck::Unreachable);
            }
        };
        if matches!(self.source, UpdateSource::Http(_)) {
            self.downloaded = Some(archive.clone());
        }

        let outcome = oracle::check(&self.version, &archive);
        if let UpdateCheck::Available { remote } = &outcome {
            self.latest_version = Some(*remote);
            self.archive_path = Some(archive);
        }
        Ok(outcome)
    }

    /// Makes the archive available on the local filesystem.
    ///
    /// A path-style source (network share) is used in place; an HTTP source
    /// is downloaded into the app data directory.
    async fn materialize_archive(&self) -> Result<PathBuf> {
        match &self.source {
            UpdateSource::Path(path) => Ok(path.clone()),
            UpdateSource::Http(url) => {
                let destination = DataStorage::new().get_path(UPDATE_ARCHIVE_FILE)?;
                let response = self.client.get(url).send().await?.error_for_status()?;
                let bytes = response.bytes().await?;
                fs::write(&destination, &bytes)?;
                Ok(destination)
            }
        }
    }

    /// Removes the downloaded archive when the flow ends without staging an
    /// update. Path-style sources are used in place and never deleted.
    pub fn discard(&mut self) {
        if let Some(path) = self.downloaded.take() {
            let _ = fs::remove_file(&path);
        }
    }

    /// Writes the pending-update descriptor the updater process will consume.
    pub fn stage(&self) -> Result<PendingUpdate> {
        let latest = self.latest_version.ok_or_else(|| msg_error_anyhow!(Message::NoUpdateRequired))?;
        let archive_path = self.archive_path.clone().ok_or_else(|| msg_error_anyhow!(Message::NoUpdateRequired))?;

        let target_exe = env::current_exe().map_err(|_| msg_error_anyhow!(Message::FailedToGetCurrentExecutable))?;
        let install_dir = target_exe
            .parent()
            .ok_or_else(|| msg_error_anyhow!(Message::FailedToGetCurrentExecutable))?
            .to_path_buf();

        let descriptor = PendingUpdate {
            schema: DESCRIPTOR_SCHEMA,
            archive_path,
            install_dir: install_dir.clone(),
            target_exe,
            origin_pid: std::process::id(),
            remote_version: latest.to_string(),
            requires_elevation: !dir_writable(&install_dir),
        };
        descriptor.write_to(&PendingUpdate::default_path()?)?;
        Ok(descriptor)
    }

    /// Spawns the updater as a detached process.
    ///
    /// The updater receives no command-line arguments; every parameter flows
    /// through the descriptor file. Its working directory is the install
    /// directory. Returns the updater's PID; the caller is expected to exit
    /// right after.
    pub fn spawn_updater(&self, descriptor: &PendingUpdate) -> Result<u32> {
        let updater_exe = descriptor.install_dir.join(format!("{}{}", APP_METADATA_UPDATER_BIN, env::consts::EXE_SUFFIX));
        if !updater_exe.exists() {
            msg_bail_anyhow!(Message::UpdaterBinaryMissing(updater_exe.display().to_string()));
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            let mut command = Command::new(&updater_exe);
            command.current_dir(&descriptor.install_dir);
            unsafe {
                command.pre_exec(|| {
                    // Detach from the current session so the updater outlives us.
                    nix::unistd::setsid().map_err(std::io::Error::from)?;
                    Ok(())
                });
            }
            let child = command.spawn()?;
            Ok(child.id())
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            let child = Command::new(&updater_exe)
                .current_dir(&descriptor.install_dir)
                .creation_flags(CREATE_NO_WINDOW)
                .spawn()?;
            Ok(child.id())
        }

        #[cfg(not(any(unix, windows)))]
        {
            let child = Command::new(&updater_exe).current_dir(&descriptor.install_dir).spawn()?;
            Ok(child.id())
        }
    }
}
