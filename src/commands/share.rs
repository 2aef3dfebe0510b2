//! Shared database command: export to and import from an external
//! `.extension` document.

use crate::{
    libs::{
        database::{ClientDatabase, SHARED_EXTENSION},
        messages::Message,
    },
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum ShareCommand {
    /// Export all clients to a shared database document
    Export { path: PathBuf },
    /// Import a shared database document, merging it into the local database
    Import { path: PathBuf },
}

#[derive(Debug, Args)]
pub struct ShareArgs {
    #[command(subcommand)]
    command: ShareCommand,
}

pub fn cmd(args: ShareArgs) -> Result<()> {
    match args.command {
        ShareCommand::Export { path } => export(with_extension(path)),
        ShareCommand::Import { path } => import(with_extension(path)),
    }
}

/// Shared documents always carry the `.extension` suffix.
fn with_extension(path: PathBuf) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == SHARED_EXTENSION => path,
        _ => {
            let mut name = path.into_os_string();
            name.push(".");
            name.push(SHARED_EXTENSION);
            PathBuf::from(name)
        }
    }
}

fn export(path: PathBuf) -> Result<()> {
    let db = ClientDatabase::open()?;
    db.export_shared(&path)?;
    msg_success!(Message::DatabaseExported(path.display().to_string()));
    Ok(())
}

fn import(path: PathBuf) -> Result<()> {
    let mut db = ClientDatabase::open()?;
    let stats = db.import_shared(&path)?;
    msg_success!(Message::DatabaseImported {
        added: stats.added,
        updated: stats.updated
    });
    Ok(())
}
