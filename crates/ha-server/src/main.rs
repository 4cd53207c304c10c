//! Unified Remote command line host
//!
//! Loads `configuration.yaml`, sets up every `unified_remote` remote and
//! runs actions through the `unified_remote.trigger_command` service.
//!
//! Usage:
//!   unified-remote --config-dir /config list
//!   unified-remote --config-dir /config trigger remote.htpc Core.Input Play

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use ha_components::unified_remote::{
    load_platforms, setup, RemoteRegistry, DOMAIN, SERVICE_TRIGGER_COMMAND,
};
use ha_config::{load_yaml, CONFIG_FILE};
use ha_core::Context;
use ha_service_registry::ServiceRegistry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use unified_remote_client::HttpTransport;

#[derive(Parser, Debug)]
#[command(name = "unified-remote")]
#[command(about = "Trigger Unified Remote actions from configuration.yaml")]
struct Args {
    /// Directory holding configuration.yaml and secrets.yaml
    #[arg(long, env = "HA_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured remotes
    List,

    /// Run an action on one remote
    Trigger {
        /// Entity id, e.g. remote.living_room_pc
        entity_id: String,
        /// Remote id, without the `Unified.` prefix
        id: String,
        /// Action to run
        run: String,
    },
}

/// Services and remotes of one host instance
pub struct Host {
    pub services: Arc<ServiceRegistry>,
    pub remotes: Arc<RemoteRegistry>,
}

impl Host {
    /// Load the configuration and set up the configured remotes
    pub fn from_config_dir(config_dir: PathBuf) -> Result<Self> {
        let config = load_yaml(config_dir.clone(), CONFIG_FILE).with_context(|| {
            format!("loading {}", config_dir.join(CONFIG_FILE).display())
        })?;

        let services = Arc::new(ServiceRegistry::new());
        let remotes = Arc::new(RemoteRegistry::new(Arc::new(HttpTransport::new()?)));
        setup(&services, &remotes, &load_platforms(&config));

        Ok(Self { services, remotes })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let host = Host::from_config_dir(args.config_dir)?;

    match args.command {
        Command::List => {
            for remote in host.remotes.entities() {
                println!(
                    "{}\t{}\t{}",
                    remote.entity_id(),
                    remote.name(),
                    remote.attributes()["host"].as_str().unwrap_or_default()
                );
            }
        }
        Command::Trigger { entity_id, id, run } => {
            info!(entity_id = %entity_id, "Triggering {} on {}", run, id);
            host.services
                .call(
                    DOMAIN,
                    SERVICE_TRIGGER_COMMAND,
                    json!({"entity_id": entity_id, "id": id, "run": run}),
                    Context::with_user("cli"),
                )
                .await?;
        }
    }

    Ok(())
}
