//! Core host types
//!
//! The small set of types an integration needs from its host: entity ids,
//! call contexts, service calls and the `slugify` helper used to derive
//! object ids from display names.

mod context;
mod entity_id;
mod service_call;
mod slugify;

pub use context::Context;
pub use entity_id::{EntityId, EntityIdError};
pub use service_call::ServiceCall;
pub use slugify::slugify;

/// Entity domain of remote-control entities
pub const REMOTE_DOMAIN: &str = "remote";
