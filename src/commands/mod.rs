pub mod client;
pub mod entry;
pub mod init;
pub mod launch;
pub mod share;
pub mod update;

use clap::{Parser, Subcommand};
use std::error::Error;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage clients")]
    Client(client::ClientArgs),
    #[command(about = "Manage shortcut entries of a client")]
    Entry(entry::EntryArgs),
    #[command(about = "Launch a shortcut entry")]
    Launch(launch::LaunchArgs),
    #[command(about = "Export or import the shared database")]
    Share(share::ShareArgs),
    #[command(about = "Check for and install application updates")]
    Update(update::UpdateArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<(), Box<dyn Error>> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Client(args) => client::cmd(args),
            Commands::Entry(args) => entry::cmd(args),
            Commands::Launch(args) => launch::cmd(args),
            Commands::Share(args) => share::cmd(args),
            Commands::Update(args) => update::cmd(args).await,
        }
        .map_err(Into::into)
    }
}
