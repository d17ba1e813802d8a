//! Administrative command handlers.
//!
//! Operator tasks run from the CLI against the Postgres backend: schema
//! migration, a storage ping, and a one-off purge of expired rows. The server
//! itself never purges in the background; it evicts lapsed links on access.

use crate::config::Config;
use crate::server::{connect_storage, StorageBackend};
use crate::error::AppResult;
use chrono::Utc;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run database migrations
    Migrate,

    /// Physically remove expired and deleted short links
    PurgeExpired,

    /// Check that the database is reachable
    Ping,
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::Migrate => {
            info!("Running database migrations...");
            connect_storage(&config, StorageBackend::Postgres { migrate: true }).await?;
            Ok(())
        }
        AdminCommands::PurgeExpired => {
            info!("Purging expired short links...");
            let store =
                connect_storage(&config, StorageBackend::Postgres { migrate: false }).await?;
            let purged = store.purge_expired(Utc::now()).await?;
            info!("Purged {} short link(s)", purged);
            Ok(())
        }
        AdminCommands::Ping => {
            let store =
                connect_storage(&config, StorageBackend::Postgres { migrate: false }).await?;
            store.ping().await?;
            info!("Database is reachable");
            Ok(())
        }
    }
}
