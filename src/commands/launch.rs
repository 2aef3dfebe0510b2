//! Launch command: starts the program behind a shortcut entry.

use crate::{
    libs::{config::Config, database::ClientDatabase, launcher, messages::Message, secret::Secret},
    msg_bail_anyhow, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct LaunchArgs {
    /// Client the entry belongs to
    client: String,
    /// Name of the entry to launch
    name: String,
}

pub fn cmd(args: LaunchArgs) -> Result<()> {
    let config = Config::read()?;
    let db = ClientDatabase::open()?;

    let Some(client) = db.client(&args.client) else {
        msg_bail_anyhow!(Message::ClientNotFound(args.client));
    };
    let Some(entry) = client.entries.iter().find(|entry| entry.name == args.name) else {
        msg_bail_anyhow!(Message::EntryNotFound {
            client: args.client,
            name: args.name
        });
    };

    // A stored credential is optional; its absence just means interactive login.
    let password = Secret::new(&Secret::entry_secret_name(&args.client, &args.name), "").get();

    msg_print!(Message::Launching {
        name: entry.name.clone(),
        target: entry.target.clone()
    });
    launcher::launch(entry, &config, password)
}
