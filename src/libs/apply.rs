//! Apply engine: the sequential state machine run by the updater process.
//!
//! `AwaitingElevation → WaitingForOriginalExit → Extracting → Copying →
//! Finalizing → Relaunching → Done`, with a terminal `Failed` reachable from
//! any step. Every step is strictly sequential: one file at a time, one
//! state at a time. The only concurrency in the whole update pipeline is the
//! pair of OS processes involved.
//!
//! Files are applied with an atomic-replace-with-retry primitive: the update
//! runs while the old process may still be shutting down and antivirus or
//! indexing tools may transiently hold locks, so each copy retries with
//! exponential backoff before giving up. The updater never touches files
//! belonging to its own program (the self-referential exclusion), otherwise
//! it would be deleting its own running binary mid-run.

use crate::libs::descriptor::PendingUpdate;
use crate::libs::messages::Message;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use thiserror::Error;

/// Retry budget for the atomic-replace copy primitive.
const RETRY_ATTEMPTS: u32 = 10;
const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(120);
const RETRY_MAX_DELAY: Duration = Duration::from_millis(800);

/// Poll interval while waiting for the original process to exit.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(200);
/// How often the unbounded wait logs that it is still waiting.
const EXIT_LOG_EVERY: u32 = 25;

/// Overall progress sub-ranges per phase.
const PROGRESS_WAITING: u8 = 5;
const PROGRESS_EXTRACTING: u8 = 10;
const PROGRESS_COPY_START: u8 = 20;
const PROGRESS_COPY_END: u8 = 90;
const PROGRESS_FINALIZING: u8 = 95;
const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("destination file stayed locked after {attempts} attempts: {}", .path.display())]
    DestinationLocked {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },
    #[error("failed to extract update archive: {0}")]
    Extract(#[from] zip::result::ZipError),
    #[error("failed to relaunch with elevated privileges: {0}")]
    Elevation(#[source] io::Error),
    #[error("failed to relaunch target executable {}: {source}", .path.display())]
    Relaunch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk extracted files: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// States of the apply engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyState {
    AwaitingElevation,
    WaitingForOriginalExit,
    Extracting,
    Copying,
    Finalizing,
    Relaunching,
    Done,
    Failed,
}

/// Observer contract for apply progress.
///
/// The engine emits `(percentage, human-readable status)` pairs as it
/// advances. Percentages are clamped to 0–100 and non-decreasing in practice.
pub trait UpdateProgress {
    fn report(&mut self, percent: u8, status: &str);
}

/// No-op progress sink.
pub struct NullProgress;

impl UpdateProgress for NullProgress {
    fn report(&mut self, _percent: u8, _status: &str) {}
}

/// The sequential update apply state machine.
pub struct ApplyEngine {
    descriptor: PendingUpdate,
    descriptor_path: PathBuf,
    updater_name: String,
    state: ApplyState,
}

impl ApplyEngine {
    /// Builds an engine for a loaded descriptor.
    ///
    /// `updater_name` is the program name of the updater itself; extracted
    /// files whose names start with it are skipped during the copy phase.
    pub fn new(descriptor: PendingUpdate, descriptor_path: PathBuf, updater_name: &str) -> Self {
        Self {
            descriptor,
            descriptor_path,
            updater_name: updater_name.to_string(),
            state: ApplyState::AwaitingElevation,
        }
    }

    pub fn state(&self) -> ApplyState {
        self.state
    }

    /// Runs the whole apply sequence.
    ///
    /// The temporary extraction directory is removed on the way out whether
    /// the run succeeds or fails. Any error leaves the engine in
    /// [`ApplyState::Failed`].
    pub fn run(&mut self, progress: &mut dyn UpdateProgress) -> Result<(), ApplyError> {
        let result = self.run_inner(progress);
        if result.is_err() {
            self.state = ApplyState::Failed;
        }
        result
    }

    fn run_inner(&mut self, progress: &mut dyn UpdateProgress) -> Result<(), ApplyError> {
        self.await_elevation(progress)?;

        self.state = ApplyState::WaitingForOriginalExit;
        emit(progress, PROGRESS_WAITING, &Message::WaitingForOriginalExit(self.descriptor.origin_pid).to_string());
        wait_for_exit(self.descriptor.origin_pid);

        // The descriptor is consumed before the risky phases begin, so a
        // failed apply does not re-trigger (or re-elevate) on next launch.
        if let Err(error) = PendingUpdate::delete(&self.descriptor_path) {
            tracing::warn!(%error, "failed to delete pending update descriptor before apply");
        }

        self.state = ApplyState::Extracting;
        emit(
            progress,
            PROGRESS_EXTRACTING,
            &Message::ExtractingArchive(self.descriptor.archive_path.display().to_string()).to_string(),
        );
        // Dropped at the end of this function on every path, success or not.
        let staging = tempfile::tempdir()?;
        let source_root = extract_archive(&self.descriptor.archive_path, staging.path())?;

        self.state = ApplyState::Copying;
        emit(progress, PROGRESS_COPY_START, &Message::CopyingFiles.to_string());
        self.copy_tree(&source_root, progress)?;

        self.state = ApplyState::Finalizing;
        emit(progress, PROGRESS_FINALIZING, &Message::OperationCompleted.to_string());
        // Best effort: the descriptor was already deleted above; this only
        // covers the elevated-relaunch path where a fresh instance re-read it.
        let _ = PendingUpdate::delete(&self.descriptor_path);

        self.state = ApplyState::Relaunching;
        emit(
            progress,
            PROGRESS_DONE,
            &Message::RelaunchingTarget(self.descriptor.target_exe.display().to_string()).to_string(),
        );
        self.relaunch_target()?;

        self.state = ApplyState::Done;
        Ok(())
    }

    /// Relaunches the updater with an elevation request when the descriptor
    /// demands it and the current process cannot write into the install
    /// directory. The relaunched instance restarts the state machine from the
    /// top; this instance terminates.
    ///
    /// Elevation denied by the user is not distinguished from a relaunch that
    /// failed to start: both surface as a missing privileged instance.
    fn await_elevation(&mut self, progress: &mut dyn UpdateProgress) -> Result<(), ApplyError> {
        self.state = ApplyState::AwaitingElevation;

        if !self.descriptor.requires_elevation {
            return Ok(());
        }
        if process_elevated() || dir_writable(&self.descriptor.install_dir) {
            return Ok(());
        }

        emit(progress, 0, &Message::ElevationRelaunch.to_string());
        relaunch_self_elevated().map_err(ApplyError::Elevation)?;
        std::process::exit(0);
    }

    /// Walks every file under the effective source root and applies it into
    /// the install directory, preserving relative structure.
    fn copy_tree(&self, source_root: &Path, progress: &mut dyn UpdateProgress) -> Result<(), ApplyError> {
        let mut files = Vec::new();
        let mut total_bytes: u64 = 0;

        for entry in walkdir::WalkDir::new(source_root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_own_file(entry.path()) {
                tracing::debug!(path = %entry.path().display(), "skipping updater's own file");
                continue;
            }
            let size = entry.metadata()?.len();
            total_bytes += size;
            files.push((entry.into_path(), size));
        }

        let mut copied_bytes: u64 = 0;
        for (source, size) in files {
            let relative = source.strip_prefix(source_root).expect("walked file is under the source root");
            let destination = self.descriptor.install_dir.join(relative);

            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            atomic_replace_copy(&source, &destination)?;

            copied_bytes += size;
            let span = (PROGRESS_COPY_END - PROGRESS_COPY_START) as u64;
            let fraction = if total_bytes == 0 { span } else { copied_bytes * span / total_bytes };
            emit(
                progress,
                PROGRESS_COPY_START + fraction as u8,
                &format!("{} {}", Message::CopyingFiles, relative.display()),
            );
        }

        Ok(())
    }

    /// Self-referential exclusion: never overwrite the updater program's own
    /// files while it is running.
    fn is_own_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(&self.updater_name))
            .unwrap_or(false)
    }

    fn relaunch_target(&self) -> Result<(), ApplyError> {
        Command::new(&self.descriptor.target_exe)
            .current_dir(&self.descriptor.install_dir)
            .spawn()
            .map_err(|source| ApplyError::Relaunch {
                path: self.descriptor.target_exe.clone(),
                source,
            })?;
        Ok(())
    }
}

fn emit(progress: &mut dyn UpdateProgress, percent: u8, status: &str) {
    progress.report(percent.min(100), status);
}

/// Blocks until the process with `pid` has exited.
///
/// "Process not found" means already-exited, not an error. The wait is
/// unbounded: a hung original process stalls the updater indefinitely, which
/// is an accepted limitation. The wait logs periodically so it is at least
/// visible.
pub fn wait_for_exit(pid: u32) {
    let mut system = System::new();
    let target = Pid::from_u32(pid);
    let mut polls: u32 = 0;

    loop {
        system.refresh_processes(ProcessesToUpdate::All, true);
        if system.process(target).is_none() {
            return;
        }
        polls += 1;
        if polls % EXIT_LOG_EVERY == 0 {
            tracing::info!("{}", Message::StillWaitingForExit(pid));
        }
        std::thread::sleep(EXIT_POLL_INTERVAL);
    }
}

/// Unpacks the ZIP archive into `staging` and returns the effective source
/// root: when the contents are nested under a single top-level folder, that
/// folder; otherwise the staging directory itself.
pub fn extract_archive(archive_path: &Path, staging: &Path) -> Result<PathBuf, ApplyError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    archive.extract(staging)?;

    Ok(effective_source_root(staging))
}

fn effective_source_root(staging: &Path) -> PathBuf {
    let entries: Vec<_> = match fs::read_dir(staging) {
        Ok(iter) => iter.flatten().collect(),
        Err(_) => return staging.to_path_buf(),
    };

    match entries.as_slice() {
        [single] if single.path().is_dir() => single.path(),
        _ => staging.to_path_buf(),
    }
}

/// Copies `source` over `destination` with atomic-replace semantics and a
/// bounded retry loop.
///
/// The bytes land in a sibling `*.tmp` first; an existing destination is then
/// swapped out through a transient `*.bak` that is removed on success. IO
/// errors (typically transient locks held by scanners) are retried with
/// exponential backoff from 120 ms up to an 800 ms cap, at most 10 attempts;
/// exhaustion fails with an error naming the locked path. A stray `.tmp` is
/// cleaned up on every failure path.
pub fn atomic_replace_copy(source: &Path, destination: &Path) -> Result<(), ApplyError> {
    let tmp = sibling(destination, "tmp");
    let mut delay = RETRY_INITIAL_DELAY;

    for attempt in 1..=RETRY_ATTEMPTS {
        match try_replace(source, destination, &tmp) {
            Ok(()) => return Ok(()),
            Err(error) if attempt < RETRY_ATTEMPTS => {
                let _ = fs::remove_file(&tmp);
                tracing::debug!(
                    destination = %destination.display(),
                    attempt,
                    %error,
                    "atomic replace failed, retrying"
                );
                std::thread::sleep(delay);
                delay = (delay * 2).min(RETRY_MAX_DELAY);
            }
            Err(source_error) => {
                let _ = fs::remove_file(&tmp);
                return Err(ApplyError::DestinationLocked {
                    path: destination.to_path_buf(),
                    attempts: RETRY_ATTEMPTS,
                    source: source_error,
                });
            }
        }
    }

    unreachable!("retry loop either returns or errors on the last attempt")
}

fn try_replace(source: &Path, destination: &Path, tmp: &Path) -> io::Result<()> {
    {
        // Shared read on the source tolerates concurrent readers/scanners.
        let mut reader = File::open(source)?;
        let mut writer = File::create(tmp)?;
        io::copy(&mut reader, &mut writer)?;
        writer.sync_all()?;
    }

    if destination.exists() {
        let backup = sibling(destination, "bak");
        let _ = fs::remove_file(&backup);
        fs::rename(destination, &backup)?;
        if let Err(error) = fs::rename(tmp, destination) {
            // Put the original back so a failed swap does not lose the file.
            let _ = fs::rename(&backup, destination);
            return Err(error);
        }
        let _ = fs::remove_file(&backup);
    } else {
        fs::rename(tmp, destination)?;
    }

    Ok(())
}

/// Builds a sibling path by appending `.suffix` to the full file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Checks whether the current process can create files in `dir`.
pub fn dir_writable(dir: &Path) -> bool {
    let probe = dir.join(format!(".write-probe-{}", std::process::id()));
    match File::create(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(windows)]
fn process_elevated() -> bool {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
    use winapi::um::securitybaseapi::GetTokenInformation;
    use winapi::um::winnt::{TokenElevation, HANDLE, TOKEN_ELEVATION, TOKEN_QUERY};

    unsafe {
        let mut token: HANDLE = std::ptr::null_mut();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            return false;
        }

        let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
        let mut returned: u32 = 0;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut _ as *mut _,
            std::mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );
        CloseHandle(token);

        ok != 0 && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(windows))]
fn process_elevated() -> bool {
    // Elevation is a Windows concern; elsewhere the writable-dir check decides.
    true
}

#[cfg(windows)]
fn relaunch_self_elevated() -> io::Result<()> {
    let current_exe = std::env::current_exe()?;
    Command::new("powershell")
        .args([
            "-NoProfile",
            "-Command",
            &format!("Start-Process -FilePath '{}' -Verb RunAs", current_exe.display()),
        ])
        .spawn()?;
    Ok(())
}

#[cfg(not(windows))]
fn relaunch_self_elevated() -> io::Result<()> {
    Ok(())
}
