//! Client management command: add, remove, and list clients.

use crate::{
    libs::{database::ClientDatabase, messages::Message},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use prettytable::{format, row, Table};

#[derive(Debug, Subcommand)]
enum ClientCommand {
    /// Add a new client
    Add { name: String },
    /// Remove a client and all of its entries
    Remove { name: String },
    /// List all clients
    List,
}

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    command: Option<ClientCommand>,
}

pub fn cmd(args: ClientArgs) -> Result<()> {
    match args.command.unwrap_or(ClientCommand::List) {
        ClientCommand::Add { name } => add(&name),
        ClientCommand::Remove { name } => remove(&name),
        ClientCommand::List => list(),
    }
}

fn add(name: &str) -> Result<()> {
    let mut db = ClientDatabase::open()?;
    db.upsert_client(name);
    db.save()?;
    msg_success!(Message::ClientAdded(name.to_string()));
    Ok(())
}

fn remove(name: &str) -> Result<()> {
    let mut db = ClientDatabase::open()?;
    if db.client(name).is_none() {
        msg_info!(Message::ClientNotFound(name.to_string()));
        return Ok(());
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmRemoveClient(name.to_string()).to_string())
        .default(false)
        .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    db.remove_client(name);
    db.save()?;
    msg_success!(Message::ClientRemoved(name.to_string()));
    Ok(())
}

fn list() -> Result<()> {
    let db = ClientDatabase::open()?;
    if db.clients.is_empty() {
        msg_info!(Message::NoClientsFound);
        return Ok(());
    }

    msg_print!(Message::ClientsHeader);
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Client", "Entries"]);
    for client in &db.clients {
        table.add_row(row![client.name, client.entries.len()]);
    }
    table.printstd();
    Ok(())
}
