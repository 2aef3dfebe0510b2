#[derive(Debug, Clone)]
pub enum Message {
    // === CLIENT MESSAGES ===
    ClientAdded(String),
    ClientRemoved(String),
    ClientNotFound(String),
    ClientsHeader,
    NoClientsFound,
    ConfirmRemoveClient(String),

    // === ENTRY MESSAGES ===
    EntryAdded { client: String, name: String },
    EntryUpdated { client: String, name: String },
    EntryRemoved { client: String, name: String },
    EntryNotFound { client: String, name: String },
    EntriesHeader(String), // client name
    NoEntriesFound(String), // client name

    // === LAUNCH MESSAGES ===
    Launching { name: String, target: String },
    LaunchFailed(String),    // error
    HelperNotConfigured,
    TargetDoesNotExist(String), // path

    // === SHARED DATABASE MESSAGES ===
    DatabaseExported(String), // path
    DatabaseImported { added: usize, updated: usize },
    SharedDatabaseLocked(String), // lock file path
    SharedDatabaseNotFound(String), // path

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleUpdate,
    ConfigModuleRemoteDesktop,
    UpdateSourceNotConfigured,

    // === UPDATE MESSAGES (primary process) ===
    UpdateAvailable {
        app_name: String,
        latest: String,
    },
    NoUpdateRequired,
    UpdateSourceUnreachable,
    UpdateArchiveCorrupt,
    UpdateMarkerMissing,
    UpdateCancelled,
    UpdaterSpawned(u32),          // PID
    UpdaterBinaryMissing(String), // path

    // === UPDATER/APPLY MESSAGES (secondary process) ===
    UpdaterNoDescriptor,
    UpdaterDescriptorRejected(String), // error
    WaitingForOriginalExit(u32),       // PID
    StillWaitingForExit(u32),          // PID
    ExtractingArchive(String),         // archive path
    CopyingFiles,
    RelaunchingTarget(String), // target path
    UpdateApplied(String),     // version
    UpdateFailed(String),      // error
    ElevationRelaunch,

    // === PROMPTS ===
    PromptSelectModules,
    PromptUpdateSource,
    PromptRemoteDesktopHelper,
    PromptEntryPassword,
    PromptConfirmUpdate(String), // latest version

    // === GENERAL MESSAGES ===
    OperationCompleted,
    OperationCancelled,
    FailedToGetCurrentExecutable,
}
