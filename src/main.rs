use acces_client::commands::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging only when explicitly requested; normal runs keep
    // plain console output through the message macros.
    if std::env::var("ACCES_CLIENT_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    Cli::menu().await.map_err(|error| anyhow::anyhow!(error.to_string()))
}
