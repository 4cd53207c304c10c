//! Service call type for invoking integration services

use crate::Context;
use serde::{Deserialize, Serialize};

/// A call to a registered service, e.g. `unified_remote.trigger_command`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub service_data: serde_json::Value,
    pub context: Context,
}

impl ServiceCall {
    pub fn new(
        domain: impl Into<String>,
        service: impl Into<String>,
        service_data: serde_json::Value,
        context: Context,
    ) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            service_data,
            context,
        }
    }

    /// Full service identifier (`domain.service`)
    pub fn service_id(&self) -> String {
        format!("{}.{}", self.domain, self.service)
    }

    /// Get a string field, coercing numbers and booleans to their text form
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.service_data.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Entity ids targeted by this call
    ///
    /// Accepts a single string (optionally comma separated) or a list.
    pub fn entity_ids(&self) -> Vec<String> {
        match self.service_data.get("entity_id") {
            Some(serde_json::Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Some(serde_json::Value::Array(arr)) => arr
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(data: serde_json::Value) -> ServiceCall {
        ServiceCall::new("unified_remote", "trigger_command", data, Context::new())
    }

    #[test]
    fn test_service_id() {
        assert_eq!(call(json!({})).service_id(), "unified_remote.trigger_command");
    }

    #[test]
    fn test_get_string_coerces_numbers() {
        let call = call(json!({"id": 5, "run": "MyMacro", "flag": true, "list": [1]}));
        assert_eq!(call.get_string("id").as_deref(), Some("5"));
        assert_eq!(call.get_string("run").as_deref(), Some("MyMacro"));
        assert_eq!(call.get_string("flag").as_deref(), Some("true"));
        assert_eq!(call.get_string("list"), None);
        assert_eq!(call.get_string("missing"), None);
    }

    #[test]
    fn test_entity_ids() {
        assert_eq!(
            call(json!({"entity_id": "remote.htpc"})).entity_ids(),
            vec!["remote.htpc"]
        );
        assert_eq!(
            call(json!({"entity_id": "remote.htpc, remote.office"})).entity_ids(),
            vec!["remote.htpc", "remote.office"]
        );
        assert_eq!(
            call(json!({"entity_id": ["remote.htpc", "remote.office"]})).entity_ids(),
            vec!["remote.htpc", "remote.office"]
        );
        assert!(call(json!({})).entity_ids().is_empty());
    }
}
