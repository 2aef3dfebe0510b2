//! Application configuration initialization command.
//!
//! Interactive setup wizard for first-time use: update source location and
//! the external remote desktop helper.

use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

/// Command-line arguments for the initialization command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove existing configuration instead of creating a new one
    #[arg(short, long)]
    delete: bool,
}

/// Executes the initialization command.
pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        let config = Config::default();
        config.save()?;
        msg_success!(Message::ConfigSaved);
        return Ok(());
    }

    // Run interactive configuration wizard
    Config::init()?.save()?;

    msg_success!(Message::ConfigSaved);
    Ok(())
}
