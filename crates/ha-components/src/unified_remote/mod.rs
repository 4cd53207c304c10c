//! Unified Remote Component
//!
//! Remote platform that triggers pre-programmed actions on a Unified Remote
//! server. Configured under `remote:`:
//!
//! ```yaml
//! remote:
//!   - platform: unified_remote
//!     host: 192.168.1.50
//!     name: Living Room PC
//!     username: alice
//!     password: !secret unified_remote_password
//! ```
//!
//! Actions are run through the `unified_remote.trigger_command` service:
//!
//! ```yaml
//! service: unified_remote.trigger_command
//! data:
//!   entity_id: remote.living_room_pc
//!   id: Core.Input
//!   run: Play
//! ```

mod config;
mod entity;
mod registry;
mod services;

#[cfg(test)]
mod testing;

pub use config::{load_platforms, RemotePlatformConfig, DEFAULT_NAME, DEFAULT_TIMEOUT_SECS};
pub use entity::{RemoteError, UnifiedRemoteEntity};
pub use registry::RemoteRegistry;
pub use services::{register_services, trigger_command_schema, TriggerCommand};

use ha_core::EntityIdError;
use ha_service_registry::ServiceRegistry;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Integration domain
pub const DOMAIN: &str = "unified_remote";

/// Service that runs a remote action
pub const SERVICE_TRIGGER_COMMAND: &str = "trigger_command";

/// Errors raised while setting up the platform
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("invalid unified_remote configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate: {unique_id}")]
    Duplicate { unique_id: String },

    #[error("invalid entity id: {0}")]
    InvalidEntityId(#[from] EntityIdError),
}

/// Set up every configured remote and register the integration services
///
/// Platforms that fail (duplicates, bad names) are logged and skipped; the
/// others are still set up. Returns the number of remotes added.
pub fn setup(
    services: &ServiceRegistry,
    remotes: &Arc<RemoteRegistry>,
    configs: &[RemotePlatformConfig],
) -> usize {
    let mut count = 0;

    for config in configs {
        match remotes.setup_platform(config) {
            Ok(_) => count += 1,
            Err(e) => error!("{}", e),
        }
    }

    if let Err(e) = register_services(services, remotes.clone()) {
        error!("Failed to register {} services: {}", DOMAIN, e);
    }

    if count > 0 {
        info!("Set up {} Unified Remote remotes", count);
    }
    count
}
