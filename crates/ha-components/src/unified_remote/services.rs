//! `unified_remote.trigger_command` service

use super::registry::RemoteRegistry;
use super::{DOMAIN, SERVICE_TRIGGER_COMMAND};
use ha_core::{EntityId, ServiceCall};
use ha_service_registry::{ServiceDescription, ServiceError, ServiceRegistry, ServiceResult};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// JSON schema of the trigger_command service data
pub fn trigger_command_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "entity_id": {
                "anyOf": [
                    {"type": "string", "minLength": 1},
                    {"type": "array", "items": {"type": "string"}}
                ]
            },
            "id": {
                "anyOf": [
                    {"type": "string", "minLength": 1},
                    {"type": "integer"}
                ]
            },
            "run": {"type": "string", "minLength": 1}
        },
        "required": ["entity_id", "id", "run"],
        "additionalProperties": false
    })
}

/// Validated trigger_command data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCommand {
    pub entity_ids: Vec<EntityId>,
    /// Remote id without the `Unified.` prefix
    pub id: String,
    /// Name of the action to run
    pub run: String,
}

impl TriggerCommand {
    pub fn from_call(call: &ServiceCall) -> Result<Self, ServiceError> {
        let entity_ids = call
            .entity_ids()
            .iter()
            .map(|id| {
                id.parse::<EntityId>()
                    .map_err(|e| ServiceError::InvalidData(format!("entity_id '{}': {}", id, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = call
            .get_string("id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::InvalidData("id is required".to_string()))?;
        let run = call
            .get_string("run")
            .filter(|run| !run.is_empty())
            .ok_or_else(|| ServiceError::InvalidData("run is required".to_string()))?;

        Ok(Self {
            entity_ids,
            id,
            run,
        })
    }
}

/// Register the services of the unified_remote domain
///
/// Safe to call once per platform setup; a later registration replaces
/// the earlier one with an identical handler.
pub fn register_services(
    services: &ServiceRegistry,
    remotes: Arc<RemoteRegistry>,
) -> Result<(), ServiceError> {
    services.register(
        ServiceDescription::new(DOMAIN, SERVICE_TRIGGER_COMMAND)
            .with_name("Trigger command")
            .with_description("Run a pre-programmed action on a Unified Remote server")
            .with_schema(trigger_command_schema()),
        move |call: ServiceCall| {
            let remotes = remotes.clone();
            async move { trigger_command(&remotes, call).await }
        },
    )?;

    debug!("Unified Remote services registered");
    Ok(())
}

/// Run the command on every targeted remote, one after another
///
/// Stops at the first failing remote; remotes after it are not contacted.
#[instrument(skip_all, fields(context_id = %call.context.id))]
async fn trigger_command(remotes: &RemoteRegistry, call: ServiceCall) -> ServiceResult {
    let command = TriggerCommand::from_call(&call)?;
    let targets = remotes.matching(&command.entity_ids);

    if targets.is_empty() {
        warn!(
            entity_ids = ?command.entity_ids,
            "No Unified Remote entities match the service call"
        );
        return Ok(());
    }

    for remote in targets {
        remote
            .trigger_command(&command.id, &command.run)
            .await
            .map_err(|e| ServiceError::CallFailed(format!("{}: {}", remote.entity_id(), e)))?;
    }

    info!(remote = %command.id, run = %command.run, "trigger_command done");
    Ok(())
}
