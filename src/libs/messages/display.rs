//! Display implementation for Acces Client application messages.
//!
//! All user-facing text lives here, in one place, as the `Display`
//! implementation for the [`Message`] enum. Commands and library code build a
//! structured `Message` value and hand it to one of the `msg_*!` macros; the
//! text itself is never scattered through the codebase.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CLIENT MESSAGES ===
            Message::ClientAdded(name) => format!("Client '{}' added.", name),
            Message::ClientRemoved(name) => format!("Client '{}' removed.", name),
            Message::ClientNotFound(name) => format!("Client '{}' not found.", name),
            Message::ClientsHeader => "Clients:".to_string(),
            Message::NoClientsFound => "No clients yet. Add one with: acces-client client add <name>".to_string(),
            Message::ConfirmRemoveClient(name) => format!("Remove client '{}' and all of its entries?", name),

            // === ENTRY MESSAGES ===
            Message::EntryAdded { client, name } => format!("Entry '{}' added to client '{}'.", name, client),
            Message::EntryUpdated { client, name } => format!("Entry '{}' of client '{}' updated.", name, client),
            Message::EntryRemoved { client, name } => format!("Entry '{}' removed from client '{}'.", name, client),
            Message::EntryNotFound { client, name } => format!("Entry '{}' not found for client '{}'.", name, client),
            Message::EntriesHeader(client) => format!("Entries for '{}':", client),
            Message::NoEntriesFound(client) => format!("Client '{}' has no entries yet.", client),

            // === LAUNCH MESSAGES ===
            Message::Launching { name, target } => format!("Launching '{}' ({})...", name, target),
            Message::LaunchFailed(error) => format!("Failed to launch: {}", error),
            Message::HelperNotConfigured => "No remote desktop helper configured. Run 'acces-client init' first.".to_string(),
            Message::TargetDoesNotExist(path) => format!("Target does not exist: {}", path),

            // === SHARED DATABASE MESSAGES ===
            Message::DatabaseExported(path) => format!("Shared database exported to: {}", path),
            Message::DatabaseImported { added, updated } => {
                format!("Shared database imported: {} entries added, {} updated.", added, updated)
            }
            Message::SharedDatabaseLocked(path) => {
                format!("Shared database is in use (lock file present: {}). Remove the lock file if no other instance is running.", path)
            }
            Message::SharedDatabaseNotFound(path) => format!("Shared database not found: {}", path),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleUpdate => "Update source configuration".to_string(),
            Message::ConfigModuleRemoteDesktop => "Remote desktop helper configuration".to_string(),
            Message::UpdateSourceNotConfigured => "No update source configured. Run 'acces-client init' to set one.".to_string(),

            // === UPDATE MESSAGES ===
            Message::UpdateAvailable { app_name, latest } => {
                format!("A new version of {} is available: v{}", app_name, latest)
            }
            Message::NoUpdateRequired => "No update required. You are using the latest version!".to_string(),
            Message::UpdateSourceUnreachable => "Update source is not reachable.".to_string(),
            Message::UpdateArchiveCorrupt => "Update archive is corrupt or unreadable.".to_string(),
            Message::UpdateMarkerMissing => "Update archive does not contain a version marker.".to_string(),
            Message::UpdateCancelled => "Update cancelled.".to_string(),
            Message::UpdaterSpawned(pid) => format!("Updater started (PID: {}). The application will now exit.", pid),
            Message::UpdaterBinaryMissing(path) => format!("Updater executable not found: {}", path),

            // === UPDATER/APPLY MESSAGES ===
            Message::UpdaterNoDescriptor => "No pending update descriptor found. Nothing to do.".to_string(),
            Message::UpdaterDescriptorRejected(error) => format!("Pending update descriptor rejected: {}", error),
            Message::WaitingForOriginalExit(pid) => format!("Waiting for the original process (PID: {}) to exit...", pid),
            Message::StillWaitingForExit(pid) => format!("Still waiting for PID {} to exit...", pid),
            Message::ExtractingArchive(path) => format!("Extracting update archive: {}", path),
            Message::CopyingFiles => "Copying files into the install directory...".to_string(),
            Message::RelaunchingTarget(path) => format!("Relaunching: {}", path),
            Message::UpdateApplied(version) => format!("Update to version {} applied successfully!", version),
            Message::UpdateFailed(error) => format!("Update failed: {}", error),
            Message::ElevationRelaunch => "Elevated privileges are required. Relaunching the updater as administrator...".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptUpdateSource => "Update source (HTTP URL or path of the update archive)".to_string(),
            Message::PromptRemoteDesktopHelper => "Path to the remote desktop helper executable".to_string(),
            Message::PromptEntryPassword => "Password for this entry".to_string(),
            Message::PromptConfirmUpdate(latest) => format!("Install version {} now? The application will restart.", latest),

            // === GENERAL MESSAGES ===
            Message::OperationCompleted => "Operation completed".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::FailedToGetCurrentExecutable => "Failed to get current executable path".to_string(),
        };
        write!(f, "{}", text)
    }
}
