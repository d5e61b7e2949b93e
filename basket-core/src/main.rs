use anyhow::Result;
use basket_core::{config::Config, migration, server, telemetry};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "basket-core")]
#[command(author, version, about = "Gecko-Basket e-commerce backend", long_about = None)]
struct Cli {
    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve,
    /// Create the database if needed, apply migrations and seed the admin account
    Migrate,
    /// Create or promote the admin account from ADMIN_NAME / ADMIN_EMAIL / ADMIN_PASSWORD
    SeedAdmin,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Basket Core v{}", env!("CARGO_PKG_VERSION"));
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, prometheus_handle).await
        }
        Command::Migrate => {
            info!("Running database migrations");
            migration::run_migrations(&config).await
        }
        Command::SeedAdmin => migration::seed_admin(&config).await,
    }
}
