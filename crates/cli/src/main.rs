use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Personal library catalog service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Report which storage backend would be used and what it holds
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            shelf_app::run(settings).await
        }
        Command::Doctor => doctor(&settings).await,
    }
}

async fn doctor(settings: &Settings) -> anyhow::Result<()> {
    let store = shelf_app::resolve_store(&settings.database).await;
    let books = store
        .list()
        .await
        .with_context(|| format!("{} backend failed to list books", store.kind()))?;

    println!("environment: {:?}", settings.environment);
    println!("database:    {}", database_status(settings).await);
    println!("backend:     {}", store.kind());
    println!("books:       {}", books.len());

    if settings.database.connection_url().is_some() && store.kind() == shelf_app::BackendKind::Memory
    {
        tracing::warn!("a database url is configured but the in-memory backend was selected");
    }
    Ok(())
}

/// Connect and ping the configured database, independently of backend choice.
async fn database_status(settings: &Settings) -> String {
    match ping_database(settings).await {
        Ok(true) => "reachable".to_string(),
        Ok(false) => "not configured".to_string(),
        Err(err) => format!("unreachable ({err:#})"),
    }
}

/// `Ok(false)` when no database is configured.
async fn ping_database(settings: &Settings) -> anyhow::Result<bool> {
    let Some(pool) = shelf_db::connect(&settings.database).await? else {
        return Ok(false);
    };
    shelf_db::ping(&pool).await?;
    pool.close().await;
    Ok(true)
}
