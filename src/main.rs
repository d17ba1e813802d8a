use clap::{Parser, Subcommand};
use shortlink::admin::{self, AdminCommands};
use shortlink::config::Config;
use shortlink::error::AppResult;
use shortlink::server::{self, StorageBackend};
use shortlink::telemetry;

/// shortlink - short codes for long URLs
#[derive(Parser, Debug)]
#[command(name = "shortlink")]
#[command(version)]
#[command(about = "A URL shortener with custom slugs and expiring links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Run migrations on startup
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        migrate: bool,

        /// Keep links in process memory instead of Postgres
        #[arg(long)]
        in_memory: bool,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;

    match cli.command {
        Commands::Server {
            host,
            port,
            migrate,
            in_memory,
        } => {
            let addr = config.server.bind_addr(host, port);

            let backend = if in_memory {
                StorageBackend::Memory
            } else {
                StorageBackend::Postgres { migrate }
            };

            server::run_server(config, addr, backend).await
        }
        Commands::Admin { admin_command } => admin::run(config, admin_command).await,
    }
}
