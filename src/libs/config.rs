//! Configuration management for the Acces Client application.
//!
//! Settings are kept in a single JSON document in the per-user application
//! data directory. The configuration value is constructed explicitly
//! (`Config::read()`) and passed to the components that need it; there is no
//! ambient global settings object.
//!
//! ## Configuration Structure
//!
//! Every module is optional, so a fresh installation works with an empty
//! configuration file:
//!
//! - **Update Config**: where the update archive lives (HTTP URL or a network
//!   share path) and how long the reachability probe may take
//! - **Remote Desktop Config**: path to the external helper executable used to
//!   open RDS connections instead of the built-in `mstsc` fallback

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default reachability probe timeout in seconds.
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// Represents a configurable module in the application.
///
/// Used during interactive setup to present the available modules for
/// selection. Each module has a unique key for internal routing and a
/// human-readable display name.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Update source configuration.
///
/// The source is either an HTTP(S) endpoint serving the update archive or a
/// filesystem path (typically a network share) containing it. The archive is
/// expected to be a ZIP with a small `version.txt` marker inside.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateConfig {
    /// HTTP URL or filesystem path of the update archive.
    pub source: String,

    /// Reachability probe timeout in seconds.
    ///
    /// The probe treats "did not answer within this bound" as a definitive
    /// negative answer, never as "unknown".
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_probe_timeout() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

/// Remote desktop helper configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RemoteDesktopConfig {
    /// Path to the external remote desktop helper executable.
    ///
    /// When set, RDS entries are launched through this program with the
    /// connection target as its first argument. When absent, the Windows
    /// built-in `mstsc` client is used as a fallback.
    pub helper_path: String,
}

/// Main configuration container for the entire application.
///
/// All modules are optional; unconfigured modules are omitted from the JSON
/// output to keep the file clean and hand-editable.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Update source configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateConfig>,

    /// Remote desktop helper configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_desktop: Option<RemoteDesktopConfig>,
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// A missing configuration file is not an error; it yields the default
    /// configuration with every module disabled so the application can run
    /// with minimal setup.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration to the filesystem.
    ///
    /// The JSON output is pretty-printed so the file stays readable for
    /// manual editing.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs an interactive configuration setup wizard.
    ///
    /// Presents a multi-select list of the available modules and, for each
    /// selected one, prompts for its parameters with the current values as
    /// defaults. Returns the updated configuration for saving.
    pub fn init() -> Result<Self> {
        // Load existing configuration to use as defaults for the setup wizard
        let mut config = match Self::read() {
            Ok(config) => config,
            Err(_) => Config::default(),
        };

        let node_descriptions = vec![
            ConfigModule {
                key: "update".to_string(),
                name: "Update source".to_string(),
            },
            ConfigModule {
                key: "remote_desktop".to_string(),
                name: "Remote desktop helper".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "update" => {
                    let default = config.update.clone().unwrap_or(UpdateConfig {
                        source: "".to_string(),
                        probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
                    });
                    msg_print!(Message::ConfigModuleUpdate);
                    config.update = Some(UpdateConfig {
                        source: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptUpdateSource.to_string())
                            .default(default.source)
                            .interact_text()?,
                        probe_timeout_secs: default.probe_timeout_secs,
                    });
                }
                "remote_desktop" => {
                    let default = config.remote_desktop.clone().unwrap_or(RemoteDesktopConfig {
                        helper_path: "".to_string(),
                    });
                    msg_print!(Message::ConfigModuleRemoteDesktop);
                    config.remote_desktop = Some(RemoteDesktopConfig {
                        helper_path: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRemoteDesktopHelper.to_string())
                            .default(default.helper_path)
                            .interact_text()?,
                    });
                }
                _ => {} // Unknown module keys are safely ignored
            }
        }

        Ok(config)
    }
}
