//! Registry of configured Unified Remote entities
//!
//! Owned by whoever sets up the platform and handed to the service handler
//! explicitly; there is no process-wide device list.

use super::config::RemotePlatformConfig;
use super::entity::UnifiedRemoteEntity;
use super::{PlatformError, DOMAIN};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ha_core::{slugify, EntityId, REMOTE_DOMAIN};
use std::sync::Arc;
use tracing::{debug, info};
use unified_remote_client::{CommandDispatcher, Transport, UuidTokens};

/// All Unified Remote entities, keyed by unique id
pub struct RemoteRegistry {
    remotes: DashMap<String, Arc<UnifiedRemoteEntity>>,
    /// Shared by every dispatcher so remotes reuse one connection pool
    transport: Arc<dyn Transport>,
}

impl RemoteRegistry {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            remotes: DashMap::new(),
            transport,
        }
    }

    /// Create the entity for one platform entry
    ///
    /// The unique id is derived from the display name, so two entries with
    /// names that slugify alike are duplicates; the second one is rejected.
    pub fn setup_platform(
        &self,
        config: &RemotePlatformConfig,
    ) -> Result<Arc<UnifiedRemoteEntity>, PlatformError> {
        let slug = slugify(&config.name);
        let unique_id = format!("{}_{}", DOMAIN, slug);

        let entity_id = EntityId::new(REMOTE_DOMAIN, slug)?;
        let target = config.target();
        debug!(unique_id = %unique_id, target = ?target, "Setting up Unified Remote");

        let dispatcher =
            CommandDispatcher::with_shared(target, self.transport.clone(), Arc::new(UuidTokens));
        let entity = Arc::new(UnifiedRemoteEntity::new(
            config.name.clone(),
            unique_id.clone(),
            entity_id,
            dispatcher,
            config.timeout(),
        ));

        match self.remotes.entry(unique_id) {
            Entry::Occupied(occupied) => Err(PlatformError::Duplicate {
                unique_id: occupied.key().clone(),
            }),
            Entry::Vacant(vacant) => {
                info!(entity_id = %entity.entity_id(), "Added Unified Remote {}", config.name);
                vacant.insert(entity.clone());
                Ok(entity)
            }
        }
    }

    pub fn get(&self, unique_id: &str) -> Option<Arc<UnifiedRemoteEntity>> {
        self.remotes.get(unique_id).map(|r| r.clone())
    }

    pub fn by_entity_id(&self, entity_id: &EntityId) -> Option<Arc<UnifiedRemoteEntity>> {
        self.remotes
            .iter()
            .find(|r| r.entity_id() == entity_id)
            .map(|r| r.clone())
    }

    /// All entities, ordered by entity id
    pub fn entities(&self) -> Vec<Arc<UnifiedRemoteEntity>> {
        let mut entities: Vec<_> = self.remotes.iter().map(|r| r.clone()).collect();
        entities.sort_by_key(|e| e.entity_id().to_string());
        entities
    }

    /// Entities targeted by a service call; all of them for an empty list
    pub fn matching(&self, entity_ids: &[EntityId]) -> Vec<Arc<UnifiedRemoteEntity>> {
        if entity_ids.is_empty() {
            return self.entities();
        }
        self.entities()
            .into_iter()
            .filter(|e| entity_ids.contains(e.entity_id()))
            .collect()
    }

    /// Remove an entity; its unique id becomes available again
    pub fn remove(&self, unique_id: &str) -> Option<Arc<UnifiedRemoteEntity>> {
        self.remotes.remove(unique_id).map(|(_, entity)| entity)
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}
