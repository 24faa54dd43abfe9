use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use inventory_gateway::catalog::{Catalog, EntityKind, QueryFilters};
use inventory_gateway::config::ObservabilityConfig;
use inventory_gateway::credentials::{CredentialStore, FileStore, GatewayConfig, DEFAULT_TIMEOUT_MS};
use inventory_gateway::{observability, AuthenticatedClient, Session, UniformError};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Direct client for the inventory API using stored credentials", long_about = None)]
struct Cli {
    /// Directory holding the saved connection config.
    #[arg(long, env = "INVENTORY_GATEWAY_HOME", default_value = ".inventory-gateway")]
    store_dir: PathBuf,

    /// Diagnostic log level; logs go to stderr.
    #[arg(long, env = "INVENTORY_GATEWAY_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify credentials against the upstream and save them
    Connect {
        #[arg(long, default_value = "https://api.moysklad.ru/api/remap/1.2")]
        endpoint: String,
        #[arg(long)]
        identity: String,
        #[arg(long, env = "INVENTORY_GATEWAY_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
    },
    /// Show the saved config and probe the upstream
    Status,
    /// Forget the saved config
    Disconnect,
    /// List a collection
    List {
        kind: EntityKind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Fetch one entity by id
    Get { kind: EntityKind, id: String },
    /// List the line items of a document
    Positions { kind: EntityKind, id: String },
    /// Search several kinds at once
    Search {
        query: String,
        #[arg(long, value_delimiter = ',')]
        kinds: Vec<EntityKind>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    order: Option<String>,
    #[arg(long)]
    expand: Option<String>,
}

impl From<FilterArgs> for QueryFilters {
    fn from(args: FilterArgs) -> Self {
        QueryFilters {
            limit: args.limit,
            offset: args.offset,
            search: args.search,
            filter: args.filter,
            order: args.order,
            expand: args.expand,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::logging::init_logging(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        ..ObservabilityConfig::default()
    });

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            if let Ok(detail) = serde_json::to_string_pretty(&err) {
                eprintln!("{detail}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), UniformError> {
    let client = Arc::new(AuthenticatedClient::new()?);
    let session = Session::new(
        Arc::clone(&client),
        CredentialStore::new(FileStore::new(&cli.store_dir)),
    );

    match cli.command {
        Commands::Connect {
            endpoint,
            identity,
            secret,
            timeout_ms,
        } => {
            let config = GatewayConfig::new(endpoint, identity, secret).with_timeout_ms(timeout_ms);
            let connected = session.connect(config).await?;
            if !connected {
                return Err(UniformError::connectivity(
                    "Connection check failed; credentials were not saved",
                ));
            }
            print_json(&json!({ "connected": true }))
        }
        Commands::Status => {
            let saved = session.store().load()?;
            let connected = session.resume().await?;
            print_json(&json!({
                "configured": saved.is_some(),
                "endpoint": saved.as_ref().map(|c| c.endpoint_base.clone()),
                "identity": saved.as_ref().map(|c| c.identity.clone()),
                "connected": connected,
            }))
        }
        Commands::Disconnect => {
            session.disconnect()?;
            print_json(&json!({ "connected": false }))
        }
        Commands::List { kind, filters } => {
            let catalog = catalog_for(&session)?;
            let page = catalog.list_raw(kind, &filters.into()).await?;
            print_json(&page)
        }
        Commands::Get { kind, id } => {
            let catalog = catalog_for(&session)?;
            let entity: Value = catalog.get_raw(kind, &id).await?;
            print_json(&entity)
        }
        Commands::Positions { kind, id } => {
            let catalog = catalog_for(&session)?;
            let page = catalog.list_positions_raw(kind, &id).await?;
            print_json(&page)
        }
        Commands::Search { query, kinds } => {
            let catalog = catalog_for(&session)?;
            let results = catalog.search(&query, &kinds).await;
            print_json(&results)
        }
    }
}

/// Configure the client from the saved record without probing.
fn catalog_for(session: &Session<FileStore>) -> Result<Catalog, UniformError> {
    let config = session.store().load()?.ok_or_else(|| {
        UniformError::configuration("Not connected; run `gateway-cli connect` first")
    })?;
    session.client().configure(config);
    Ok(Catalog::new(Arc::clone(session.client())))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), UniformError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| UniformError::protocol(format!("Failed to render output: {e}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_warn() {
        let cli = Cli::try_parse_from(["gateway-cli", "status"]).unwrap();
        assert_eq!(cli.log_level, "warn");

        let cli = Cli::try_parse_from(["gateway-cli", "--log-level", "debug", "disconnect"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}
