//! The updater process.
//!
//! Started by the primary application with no command-line arguments; every
//! parameter comes from the pending-update descriptor. Reads the descriptor,
//! waits for the original process to exit, applies the archive into the
//! install directory and relaunches the target executable.

use acces_client::libs::apply::{ApplyEngine, UpdateProgress};
use acces_client::libs::descriptor::{DescriptorError, PendingUpdate};
use acces_client::libs::messages::Message;
use acces_client::{msg_error, msg_print, msg_success};
use tracing_subscriber::EnvFilter;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// Prints `(percentage, status)` progress events to the console.
struct ConsoleProgress;

impl UpdateProgress for ConsoleProgress {
    fn report(&mut self, percent: u8, status: &str) {
        msg_print!(format!("[{:>3}%] {}", percent, status));
    }
}

fn main() {
    if std::env::var("ACCES_CLIENT_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let descriptor_path = match PendingUpdate::default_path() {
        Ok(path) => path,
        Err(error) => {
            msg_error!(Message::UpdaterDescriptorRejected(error.to_string()));
            std::process::exit(1);
        }
    };

    // No descriptor means there is nothing to do: fail fast.
    let descriptor = match PendingUpdate::load_from(&descriptor_path) {
        Ok(descriptor) => descriptor,
        Err(DescriptorError::NotFound(_)) => {
            msg_error!(Message::UpdaterNoDescriptor);
            std::process::exit(1);
        }
        Err(error) => {
            msg_error!(Message::UpdaterDescriptorRejected(error.to_string()));
            std::process::exit(1);
        }
    };

    let remote_version = descriptor.remote_version.clone();
    let mut engine = ApplyEngine::new(descriptor, descriptor_path, APP_METADATA_UPDATER_BIN);

    match engine.run(&mut ConsoleProgress) {
        Ok(()) => {
            msg_success!(Message::UpdateApplied(remote_version));
        }
        Err(error) => {
            msg_error!(Message::UpdateFailed(error.to_string()));
            std::process::exit(1);
        }
    }
}
