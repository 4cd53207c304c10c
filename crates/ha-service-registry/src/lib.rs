//! Service registry with schema-validated async handlers
//!
//! Integrations register their services here; callers invoke them by
//! `domain.service`. When a service declares a JSON schema, the service
//! data is validated against it before the handler runs, so handlers only
//! ever see well-formed data.

use dashmap::DashMap;
use ha_core::{Context, ServiceCall};
use jsonschema::JSONSchema;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Result type for service calls
pub type ServiceResult = Result<(), ServiceError>;

/// Future type for async service handlers
pub type ServiceFuture = Pin<Box<dyn Future<Output = ServiceResult> + Send>>;

/// Service handler function type
pub type ServiceHandler = Arc<dyn Fn(ServiceCall) -> ServiceFuture + Send + Sync>;

/// Errors that can occur when working with services
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("service not found: {domain}.{service}")]
    NotFound { domain: String, service: String },

    #[error("service call failed: {0}")]
    CallFailed(String),

    #[error("invalid service data: {0}")]
    InvalidData(String),

    #[error("invalid schema for {domain}.{service}: {reason}")]
    InvalidSchema {
        domain: String,
        service: String,
        reason: String,
    },
}

/// Information about a registered service
#[derive(Debug, Clone)]
pub struct ServiceDescription {
    pub domain: String,
    pub service: String,
    /// Human-readable name
    pub name: Option<String>,
    pub description: Option<String>,
    /// JSON schema the service data must satisfy
    pub schema: Option<serde_json::Value>,
}

impl ServiceDescription {
    pub fn new(domain: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            name: None,
            description: None,
            schema: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    fn key(&self) -> String {
        service_key(&self.domain, &self.service)
    }
}

fn service_key(domain: &str, service: &str) -> String {
    format!("{}.{}", domain, service)
}

struct RegisteredService {
    handler: ServiceHandler,
    validator: Option<Arc<JSONSchema>>,
}

impl RegisteredService {
    fn validate(&self, data: &serde_json::Value) -> Result<(), ServiceError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };
        if let Err(errors) = validator.validate(data) {
            let reasons: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(ServiceError::InvalidData(reasons.join("; ")));
        }
        Ok(())
    }
}

/// The service registry manages all registered services
pub struct ServiceRegistry {
    /// Services indexed by "domain.service" key
    services: DashMap<String, RegisteredService>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Register a service, replacing any previous registration
    ///
    /// Fails if the description carries a schema that does not compile.
    #[instrument(skip(self, handler), fields(service = %description.key()))]
    pub fn register<F, Fut>(
        &self,
        description: ServiceDescription,
        handler: F,
    ) -> Result<(), ServiceError>
    where
        F: Fn(ServiceCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServiceResult> + Send + 'static,
    {
        let validator = match &description.schema {
            Some(schema) => {
                let compiled =
                    JSONSchema::compile(schema).map_err(|e| ServiceError::InvalidSchema {
                        domain: description.domain.clone(),
                        service: description.service.clone(),
                        reason: e.to_string(),
                    })?;
                Some(Arc::new(compiled))
            }
            None => None,
        };

        let handler: ServiceHandler =
            Arc::new(move |call| Box::pin(handler(call)) as ServiceFuture);

        let key = description.key();
        if self.services.contains_key(&key) {
            debug!("Replacing existing service registration");
        } else {
            debug!("Registering service");
        }

        self.services.insert(
            key,
            RegisteredService { handler, validator },
        );
        Ok(())
    }

    /// Call a service
    ///
    /// Service data is checked against the registered schema first; the
    /// handler is not invoked for invalid data.
    #[instrument(skip(self, service_data, context), fields(context_id = %context.id))]
    pub async fn call(
        &self,
        domain: &str,
        service: &str,
        service_data: serde_json::Value,
        context: Context,
    ) -> ServiceResult {
        let key = service_key(domain, service);

        let registered = self.services.get(&key).ok_or_else(|| {
            warn!("Service not found");
            ServiceError::NotFound {
                domain: domain.to_string(),
                service: service.to_string(),
            }
        })?;

        if let Err(e) = registered.validate(&service_data) {
            warn!(error = %e, "Rejected service data");
            return Err(e);
        }

        let handler = registered.handler.clone();
        drop(registered); // Release the shard lock before awaiting the handler

        debug!("Calling service");
        let call = ServiceCall::new(domain, service, service_data, context);
        handler(call).await
    }

    pub fn has_service(&self, domain: &str, service: &str) -> bool {
        self.services.contains_key(&service_key(domain, service))
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
