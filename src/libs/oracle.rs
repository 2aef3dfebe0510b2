//! Version oracle: reads the version marker out of an update archive.
//!
//! The archive is opened as a random-access ZIP index and only one small
//! entry is read; the whole payload is never extracted just to learn its
//! version. The marker is preferred at the exact path `version.txt`; as a
//! fallback, any entry whose name ends with that filename is accepted (the
//! archive may wrap its payload in a root folder).
//!
//! Failures are not exceptions here. The caller gets an explicit
//! [`UpdateCheck`] reason code, so "server holds an older build", "archive is
//! corrupt" and "nobody put a marker in the archive" stay distinguishable in
//! logs and tests, while all of them still mean "no update" to the startup
//! flow.

use crate::libs::version::Version;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Name of the plain-text version marker entry inside the update archive.
pub const VERSION_MARKER: &str = "version.txt";

/// Upper bound for the marker entry size; anything larger is not a version string.
const MARKER_SIZE_LIMIT: u64 = 256;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("update archive not found: {}", .0.display())]
    ArchiveMissing(std::path::PathBuf),
    #[error("update archive is corrupt or unreadable: {0}")]
    CorruptArchive(String),
    #[error("no 'version.txt' entry in the update archive")]
    NoVersionMarker,
}

/// Outcome of an update check, with an explicit reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// The remote version is strictly greater than the local one.
    Available { remote: Version },
    /// The remote version is lower than or equal to the local one.
    UpToDate { remote: Version },
    /// The update source did not answer the reachability probe.
    Unreachable,
    /// The archive exists but cannot be opened as a ZIP index.
    CorruptArchive,
    /// The archive has no version marker entry.
    NoVersionMarker,
}

impl UpdateCheck {
    pub fn is_available(&self) -> bool {
        matches!(self, UpdateCheck::Available { .. })
    }
}

/// Reads the version marker from inside the archive at `path`.
pub fn remote_version(path: &Path) -> Result<Version, OracleError> {
    let file = File::open(path).map_err(|_| OracleError::ArchiveMissing(path.to_path_buf()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|error| OracleError::CorruptArchive(error.to_string()))?;

    let marker_name = find_marker_entry(&mut archive).ok_or(OracleError::NoVersionMarker)?;

    let mut entry = archive.by_name(&marker_name).map_err(|error| OracleError::CorruptArchive(error.to_string()))?;
    if entry.size() > MARKER_SIZE_LIMIT {
        return Err(OracleError::CorruptArchive(format!(
            "version marker entry is {} bytes, expected at most {}",
            entry.size(),
            MARKER_SIZE_LIMIT
        )));
    }

    let mut raw = String::new();
    entry.read_to_string(&mut raw).map_err(|error| OracleError::CorruptArchive(error.to_string()))?;

    Ok(Version::parse(raw.trim()))
}

/// Compares the local version against the archive's marker.
///
/// Strictly-greater comparison: an equal remote version is [`UpdateCheck::UpToDate`].
pub fn check(local: &Version, archive: &Path) -> UpdateCheck {
    match remote_version(archive) {
        Ok(remote) if remote > *local => UpdateCheck::Available { remote },
        Ok(remote) => UpdateCheck::UpToDate { remote },
        Err(OracleError::ArchiveMissing(_)) => UpdateCheck::Unreachable,
        Err(OracleError::CorruptArchive(error)) => {
            tracing::debug!(archive = %archive.display(), error, "update archive rejected by version oracle");
            UpdateCheck::CorruptArchive
        }
        Err(OracleError::NoVersionMarker) => UpdateCheck::NoVersionMarker,
    }
}

/// Finds the marker entry name: exact path match first, then any entry whose
/// name ends with the marker filename.
fn find_marker_entry(archive: &mut zip::ZipArchive<File>) -> Option<String> {
    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();

    if names.iter().any(|name| name == VERSION_MARKER) {
        return Some(VERSION_MARKER.to_string());
    }

    names.into_iter().find(|name| name.ends_with(VERSION_MARKER))
}
