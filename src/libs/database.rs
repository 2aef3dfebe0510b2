//! Client and shortcut-entry persistence.
//!
//! The client directory is a flat JSON document rewritten whole on every
//! save: an in-memory list of clients, each carrying its shortcut entries,
//! with manual upsert keyed by (client name, entry name). There are no
//! transactional guarantees; the implicit assumption is single-instance,
//! single-user.
//!
//! The one shared feature is the external "shared database": a `.extension`
//! JSON document that can be exported for colleagues and imported back with
//! merge semantics. Access to it is guarded by an advisory lock file named
//! after the document. The lock is cooperative only; nothing stops a second
//! instance from ignoring it, and a crash leaves a stale lock that has to be
//! removed by hand.

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the primary client database in the app data directory.
pub const DATABASE_FILE: &str = "clients.json";

/// File extension of shared database documents.
pub const SHARED_EXTENSION: &str = "extension";

/// Kind of a shortcut entry, deciding how it is launched.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Rds,
    AnyDesk,
    Vpn,
    File,
    Folder,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            EntryKind::Rds => "RDS",
            EntryKind::AnyDesk => "AnyDesk",
            EntryKind::Vpn => "VPN",
            EntryKind::File => "File",
            EntryKind::Folder => "Folder",
        };
        write!(f, "{}", text)
    }
}

/// A shortcut entry belonging to a client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    /// Host name, AnyDesk address, executable path, or file/folder path.
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A client with its shortcut entries.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Counters returned by a shared-database merge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
}

/// The in-memory client list backed by whole-file JSON rewrite.
#[derive(Debug)]
pub struct ClientDatabase {
    path: PathBuf,
    pub clients: Vec<Client>,
}

impl ClientDatabase {
    /// Opens the database at its default location, creating an empty one in
    /// memory when no file exists yet.
    pub fn open() -> Result<Self> {
        let path = DataStorage::new().get_path(DATABASE_FILE)?;
        Self::open_at(path)
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        let clients = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Vec::new()
        };
        Ok(Self { path, clients })
    }

    /// Rewrites the whole document.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.clients)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn client(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|client| client.name == name)
    }

    /// Returns the client with `name`, creating it when absent.
    pub fn upsert_client(&mut self, name: &str) -> &mut Client {
        if let Some(position) = self.clients.iter().position(|client| client.name == name) {
            return &mut self.clients[position];
        }
        self.clients.push(Client {
            name: name.to_string(),
            entries: Vec::new(),
        });
        self.clients.last_mut().expect("client was just pushed")
    }

    pub fn remove_client(&mut self, name: &str) -> bool {
        let before = self.clients.len();
        self.clients.retain(|client| client.name != name);
        self.clients.len() != before
    }

    /// Inserts or replaces an entry keyed by (client name, entry name).
    ///
    /// Returns `true` when an existing entry was replaced.
    pub fn upsert_entry(&mut self, client_name: &str, entry: Entry) -> bool {
        let client = self.upsert_client(client_name);
        if let Some(existing) = client.entries.iter_mut().find(|existing| existing.name == entry.name) {
            *existing = entry;
            return true;
        }
        client.entries.push(entry);
        false
    }

    pub fn remove_entry(&mut self, client_name: &str, entry_name: &str) -> bool {
        match self.clients.iter_mut().find(|client| client.name == client_name) {
            Some(client) => {
                let before = client.entries.len();
                client.entries.retain(|entry| entry.name != entry_name);
                client.entries.len() != before
            }
            None => false,
        }
    }

    /// Merges another client list into this one, entry by entry.
    pub fn merge(&mut self, other: Vec<Client>) -> MergeStats {
        let mut stats = MergeStats::default();
        for client in other {
            for entry in client.entries {
                if self.upsert_entry(&client.name, entry) {
                    stats.updated += 1;
                } else {
                    stats.added += 1;
                }
            }
        }
        stats
    }

    /// Exports the client list as a shared database document.
    pub fn export_shared(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.clients)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Imports a shared database document, merging it into this database and
    /// saving the result. The document is protected by an advisory lock for
    /// the duration of the read.
    pub fn import_shared(&mut self, path: &Path) -> Result<MergeStats> {
        if !path.exists() {
            return Err(msg_error_anyhow!(Message::SharedDatabaseNotFound(path.display().to_string())));
        }

        let _lock = SharedLock::acquire(path)?;
        let raw = fs::read_to_string(path)?;
        let clients: Vec<Client> = serde_json::from_str(&raw)?;

        let stats = self.merge(clients);
        self.save()?;
        Ok(stats)
    }
}

/// Advisory lock file guarding a shared database document.
///
/// Created before the document is opened and removed when the guard drops.
pub struct SharedLock {
    lock_path: PathBuf,
}

impl SharedLock {
    pub fn acquire(document: &Path) -> Result<Self> {
        let mut name = document.as_os_str().to_owned();
        name.push(".lock");
        let lock_path = PathBuf::from(name);

        if lock_path.exists() {
            return Err(msg_error_anyhow!(Message::SharedDatabaseLocked(lock_path.display().to_string())));
        }
        fs::write(&lock_path, std::process::id().to_string())?;
        Ok(Self { lock_path })
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for SharedLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}
