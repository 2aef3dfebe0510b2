//! # Acces Client - remote access connection manager
//!
//! A command-line utility for storing, organizing, and launching remote-access
//! connections per client, with a self-update pipeline driven by a separate
//! updater process.
//!
//! ## Features
//!
//! - **Client Directory**: Flat JSON document holding clients and their shortcut entries
//! - **Connection Launching**: RDS/RDP, AnyDesk, VPN executables, files and folders
//! - **Shared Database**: Export/import of an external `.extension` document with an advisory lock
//! - **Self-Update**: Reachability probe, in-archive version oracle, pending-update
//!   descriptor and a two-process apply engine with atomic-replace copy semantics
//! - **Credential Storage**: AES-encrypted per-entry passwords
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acces_client::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
