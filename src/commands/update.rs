//! Application update command.
//!
//! `acces-client update` runs the primary-process half of the update
//! pipeline: probe the source, ask the version oracle, and, after the user
//! confirms, write the pending-update descriptor, start the updater process
//! and exit so the updater can replace our files.

use crate::{
    libs::{config::Config, messages::Message, oracle::UpdateCheck, update::Updater},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Only check whether an update is available, without installing it
    #[arg(long)]
    check: bool,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub async fn cmd(args: UpdateArgs) -> Result<()> {
    let config = Config::read()?;
    let mut updater = Updater::new(&config)?;

    let latest = match updater.check().await? {
        UpdateCheck::Available { remote } => remote,
        UpdateCheck::UpToDate { .. } => {
            updater.discard();
            msg_info!(Message::NoUpdateRequired);
            return Ok(());
        }
        UpdateCheck::Unreachable => {
            msg_warning!(Message::UpdateSourceUnreachable);
            return Ok(());
        }
        UpdateCheck::CorruptArchive => {
            updater.discard();
            msg_warning!(Message::UpdateArchiveCorrupt);
            return Ok(());
        }
        UpdateCheck::NoVersionMarker => {
            updater.discard();
            msg_warning!(Message::UpdateMarkerMissing);
            return Ok(());
        }
    };

    msg_print!(Message::UpdateAvailable {
        app_name: updater.name.clone(),
        latest: latest.to_string()
    });

    if args.check {
        updater.discard();
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptConfirmUpdate(latest.to_string()).to_string())
            .default(true)
            .interact()?;
        if !confirmed {
            updater.discard();
            msg_info!(Message::UpdateCancelled);
            return Ok(());
        }
    }

    let descriptor = updater.stage()?;
    let pid = updater.spawn_updater(&descriptor)?;
    msg_success!(Message::UpdaterSpawned(pid));

    // The updater waits for this process id to disappear before it touches
    // any file, so leave immediately.
    std::process::exit(0);
}
