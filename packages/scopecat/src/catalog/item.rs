//! Catalog item records.

use std::collections::BTreeMap;
use std::iter;

use bon::Builder;
use serde_json::Value;

use super::name::GLOBAL_SCOPE;

/// A named catalog entry: one global payload plus per-folder overrides.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ScopedItem {
    /// Unique item name, never carrying a scope.
    #[builder(into)]
    pub name: String,

    /// Payload used for the global scope.
    pub global_payload: Value,

    /// Free-text annotation, e.g. for help output.
    #[builder(into)]
    pub comment: Option<String>,

    /// Absolute scope path to payload. The global scope is never a key here.
    #[builder(default)]
    pub payload_map: BTreeMap<String, Value>,
}

impl ScopedItem {
    /// The payload stored exactly at `scope`, with `""` meaning global.
    pub fn payload(&self, scope: &str) -> Option<&Value> {
        if scope == GLOBAL_SCOPE {
            Some(&self.global_payload)
        } else {
            self.payload_map.get(scope)
        }
    }

    /// Store `payload` at `scope`, with `""` meaning global.
    pub fn set_payload(&mut self, scope: &str, payload: Value) {
        if scope == GLOBAL_SCOPE {
            self.global_payload = payload;
        } else {
            self.payload_map.insert(scope.to_string(), payload);
        }
    }

    /// All `(scope, payload)` pairs: global first, then scopes in sorted order.
    pub fn payloads(&self) -> impl Iterator<Item = (&str, &Value)> {
        iter::once((GLOBAL_SCOPE, &self.global_payload)).chain(
            self.payload_map
                .iter()
                .map(|(scope, payload)| (scope.as_str(), payload)),
        )
    }
}
