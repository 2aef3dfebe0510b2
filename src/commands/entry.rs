//! Shortcut entry management command: add, remove, and list entries per client.

use crate::{
    libs::{
        database::{ClientDatabase, Entry, EntryKind},
        messages::Message,
        secret::Secret,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use prettytable::{format, row, Table};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Rds,
    Anydesk,
    Vpn,
    File,
    Folder,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Rds => EntryKind::Rds,
            KindArg::Anydesk => EntryKind::AnyDesk,
            KindArg::Vpn => EntryKind::Vpn,
            KindArg::File => EntryKind::File,
            KindArg::Folder => EntryKind::Folder,
        }
    }
}

#[derive(Debug, Subcommand)]
enum EntryCommand {
    /// Add or replace an entry
    Add {
        name: String,
        /// Entry kind deciding how it is launched
        #[arg(value_enum)]
        kind: KindArg,
        /// Host name, AnyDesk address, executable path, or file/folder path
        target: String,
        /// User name for the connection
        #[arg(short, long)]
        username: Option<String>,
        /// Prompt for a password and store it encrypted
        #[arg(short, long)]
        password: bool,
    },
    /// Remove an entry
    Remove { name: String },
    /// List the client's entries
    List,
}

#[derive(Debug, Args)]
pub struct EntryArgs {
    /// Client the entries belong to
    client: String,
    #[command(subcommand)]
    command: Option<EntryCommand>,
}

pub fn cmd(args: EntryArgs) -> Result<()> {
    match args.command.unwrap_or(EntryCommand::List) {
        EntryCommand::Add {
            name,
            kind,
            target,
            username,
            password,
        } => add(&args.client, name, kind.into(), target, username, password),
        EntryCommand::Remove { name } => remove(&args.client, &name),
        EntryCommand::List => list(&args.client),
    }
}

fn add(client: &str, name: String, kind: EntryKind, target: String, username: Option<String>, password: bool) -> Result<()> {
    let mut db = ClientDatabase::open()?;
    let entry = Entry {
        name: name.clone(),
        kind,
        target,
        username,
    };
    let updated = db.upsert_entry(client, entry);
    db.save()?;

    if password {
        Secret::new(&Secret::entry_secret_name(client, &name), &Message::PromptEntryPassword.to_string()).prompt()?;
    }

    if updated {
        msg_success!(Message::EntryUpdated {
            client: client.to_string(),
            name
        });
    } else {
        msg_success!(Message::EntryAdded {
            client: client.to_string(),
            name
        });
    }
    Ok(())
}

fn remove(client: &str, name: &str) -> Result<()> {
    let mut db = ClientDatabase::open()?;
    if !db.remove_entry(client, name) {
        msg_info!(Message::EntryNotFound {
            client: client.to_string(),
            name: name.to_string()
        });
        return Ok(());
    }
    db.save()?;

    // Drop any stored credential along with the entry.
    Secret::new(&Secret::entry_secret_name(client, name), "").forget();

    msg_success!(Message::EntryRemoved {
        client: client.to_string(),
        name: name.to_string()
    });
    Ok(())
}

fn list(client: &str) -> Result<()> {
    let db = ClientDatabase::open()?;
    let Some(found) = db.client(client) else {
        msg_info!(Message::ClientNotFound(client.to_string()));
        return Ok(());
    };

    if found.entries.is_empty() {
        msg_info!(Message::NoEntriesFound(client.to_string()));
        return Ok(());
    }

    msg_print!(Message::EntriesHeader(client.to_string()));
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Entry", "Kind", "Target", "Username"]);
    for entry in &found.entries {
        table.add_row(row![entry.name, entry.kind, entry.target, entry.username.as_deref().unwrap_or("-")]);
    }
    table.printstd();
    Ok(())
}
