//! Built-in Components
//!
//! Integrations implemented natively in Rust. Currently the `unified_remote`
//! remote platform, which triggers actions on Unified Remote servers.

pub mod unified_remote;

pub use unified_remote::{
    load_platforms, register_services, setup, PlatformError, RemotePlatformConfig,
    RemoteRegistry, UnifiedRemoteEntity, DOMAIN, SERVICE_TRIGGER_COMMAND,
};
