//! The Unified Remote remote entity

use dashmap::DashMap;
use ha_core::EntityId;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use unified_remote_client::{CommandDispatcher, DispatchError};

/// Failure of a single trigger on one entity
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("handshake did not finish within {0:?}")]
    Timeout(Duration),
}

/// A configured Unified Remote server, exposed as a `remote` entity
///
/// The entity is always on and always available: the server offers no
/// status endpoint, and a failed trigger is reported to the caller rather
/// than reflected in the entity state.
pub struct UnifiedRemoteEntity {
    name: String,
    unique_id: String,
    entity_id: EntityId,
    dispatcher: CommandDispatcher,
    timeout: Duration,
    /// Toggle flags per key, 0 when unset
    flags: DashMap<String, i64>,
}

impl UnifiedRemoteEntity {
    pub fn new(
        name: impl Into<String>,
        unique_id: impl Into<String>,
        entity_id: EntityId,
        dispatcher: CommandDispatcher,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            unique_id: unique_id.into(),
            entity_id,
            dispatcher,
            timeout,
            flags: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    pub fn is_on(&self) -> bool {
        true
    }

    pub fn available(&self) -> bool {
        true
    }

    /// State string as shown to users
    pub fn state(&self) -> &'static str {
        if self.is_on() {
            "on"
        } else {
            "off"
        }
    }

    pub fn attributes(&self) -> HashMap<String, serde_json::Value> {
        let mut attributes = HashMap::new();
        attributes.insert("friendly_name".to_string(), json!(self.name));
        attributes.insert("host".to_string(), json!(self.dispatcher.target().host()));
        attributes
    }

    /// Snapshot of the toggle flags
    ///
    /// A toggle flag tells whether an alternative code should be sent for
    /// a key. Keys never set are absent from the snapshot and read as 0
    /// through [`UnifiedRemoteEntity::flag`].
    pub fn flags(&self) -> HashMap<String, i64> {
        self.flags
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn flag(&self, key: &str) -> i64 {
        self.flags.get(key).map(|v| *v).unwrap_or(0)
    }

    /// Bump the counter of a key, returning the new value
    pub fn increment_flag(&self, key: &str) -> i64 {
        let mut value = self.flags.entry(key.to_string()).or_insert(0);
        *value += 1;
        *value
    }

    /// Run `run` on the remote `action_id` of this server
    ///
    /// The whole handshake is bounded by the configured timeout. Dropping
    /// the returned future abandons the handshake; the next call starts a
    /// new one.
    #[instrument(skip(self), fields(entity_id = %self.entity_id))]
    pub async fn trigger_command(&self, action_id: &str, run: &str) -> Result<(), RemoteError> {
        debug!("Triggering remote command");

        match tokio::time::timeout(self.timeout, self.dispatcher.trigger(action_id, run)).await {
            Ok(Ok(())) => {
                info!("Triggered {} on {}", run, self.name);
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Trigger failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Trigger timed out");
                Err(RemoteError::Timeout(self.timeout))
            }
        }
    }
}

impl std::fmt::Debug for UnifiedRemoteEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedRemoteEntity")
            .field("name", &self.name)
            .field("unique_id", &self.unique_id)
            .field("entity_id", &self.entity_id)
            .field("target", self.dispatcher.target())
            .finish()
    }
}
