//! Process-launch wrappers for shortcut entries.
//!
//! Every launch is fire-and-forget: the child is spawned detached from our
//! stdio and the command returns as soon as the spawn succeeded. Which
//! program gets spawned depends on the entry kind and, for RDS, on whether an
//! external helper executable is configured.

use crate::libs::config::Config;
use crate::libs::database::{Entry, EntryKind};
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

#[cfg(windows)]
const ANYDESK_PROGRAM: &str = "AnyDesk.exe";
#[cfg(not(windows))]
const ANYDESK_PROGRAM: &str = "anydesk";

/// Launches a shortcut entry.
///
/// `password` is only consumed by AnyDesk entries, where it is handed to the
/// client on stdin together with `--with-password` for unattended access.
pub fn launch(entry: &Entry, config: &Config, password: Option<String>) -> Result<()> {
    match entry.kind {
        EntryKind::Rds => launch_rds(entry, config),
        EntryKind::AnyDesk => launch_anydesk(entry, password),
        EntryKind::Vpn => launch_executable(&entry.target),
        EntryKind::File | EntryKind::Folder => open_path(&entry.target),
    }
}

/// Opens an RDS connection, preferring the configured helper executable and
/// falling back to the built-in `mstsc` client on Windows.
fn launch_rds(entry: &Entry, config: &Config) -> Result<()> {
    if let Some(remote_desktop) = &config.remote_desktop {
        Command::new(&remote_desktop.helper_path)
            .arg(&entry.target)
            .spawn()
            .map_err(|error| msg_error_anyhow!(Message::LaunchFailed(error.to_string())))?;
        return Ok(());
    }

    if cfg!(windows) {
        Command::new("mstsc")
            .arg(format!("/v:{}", entry.target))
            .spawn()
            .map_err(|error| msg_error_anyhow!(Message::LaunchFailed(error.to_string())))?;
        return Ok(());
    }

    msg_bail_anyhow!(Message::HelperNotConfigured)
}

fn launch_anydesk(entry: &Entry, password: Option<String>) -> Result<()> {
    let mut command = Command::new(ANYDESK_PROGRAM);
    command.arg(&entry.target);

    match password {
        Some(password) => {
            command.arg("--with-password").stdin(Stdio::piped());
            let mut child = command.spawn().map_err(|error| msg_error_anyhow!(Message::LaunchFailed(error.to_string())))?;
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(password.as_bytes());
            }
        }
        None => {
            command.spawn().map_err(|error| msg_error_anyhow!(Message::LaunchFailed(error.to_string())))?;
        }
    }
    Ok(())
}

fn launch_executable(target: &str) -> Result<()> {
    Command::new(target)
        .spawn()
        .map_err(|error| msg_error_anyhow!(Message::LaunchFailed(error.to_string())))?;
    Ok(())
}

/// Opens a file or folder with the platform's default handler.
fn open_path(target: &str) -> Result<()> {
    if !Path::new(target).exists() {
        msg_bail_anyhow!(Message::TargetDoesNotExist(target.to_string()));
    }

    let opener = if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    Command::new(opener)
        .arg(target)
        .spawn()
        .map_err(|error| msg_error_anyhow!(Message::LaunchFailed(error.to_string())))?;
    Ok(())
}
