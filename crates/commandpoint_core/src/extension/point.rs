//! In-process extension point registration and batch delivery.

use crate::extension::collector::ExtensionMessageCollector;
use crate::extension::descriptor::ExtensionDescriptor;
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One extension's declared value for a point, with its scoped collector.
#[derive(Debug, Clone)]
pub struct ExtensionPointUser {
    pub value: Value,
    pub description: ExtensionDescriptor,
    pub collector: ExtensionMessageCollector,
}

impl ExtensionPointUser {
    /// Creates a user whose collector is scoped to `description.id` and `point`.
    pub fn new(point: &str, description: ExtensionDescriptor, value: Value) -> Self {
        let collector = ExtensionMessageCollector::new(description.id.clone(), point);
        Self {
            value,
            description,
            collector,
        }
    }
}

/// Batch handler invoked once per load cycle with every user of a point.
pub type ExtensionPointHandler = Box<dyn Fn(&mut [ExtensionPointUser]) + Send + Sync>;

struct ExtensionPoint {
    schema: Value,
    handler: ExtensionPointHandler,
}

/// Registry of named extension points.
#[derive(Default)]
pub struct ExtensionPointRegistry {
    points: BTreeMap<String, ExtensionPoint>,
}

impl ExtensionPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with its schema document and batch handler.
    pub fn register(
        &mut self,
        name: &str,
        schema: Value,
        handler: ExtensionPointHandler,
    ) -> Result<(), ExtensionPointError> {
        let name = name.trim();
        if !is_valid_point_name(name) {
            return Err(ExtensionPointError::InvalidPointName(name.to_string()));
        }
        if self.points.contains_key(name) {
            return Err(ExtensionPointError::DuplicatePoint(name.to_string()));
        }

        self.points
            .insert(name.to_string(), ExtensionPoint { schema, handler });
        info!("event=point_register module=extension status=ok point={name}");
        Ok(())
    }

    /// Hands the full batch for `name` to its handler.
    pub fn deliver(
        &self,
        name: &str,
        users: &mut [ExtensionPointUser],
    ) -> Result<(), ExtensionPointError> {
        let Some(point) = self.points.get(name) else {
            warn!("event=point_deliver module=extension status=skip point={name} reason=unknown");
            return Err(ExtensionPointError::UnknownPoint(name.to_string()));
        };

        info!(
            "event=point_deliver module=extension status=ok point={} users={}",
            name,
            users.len()
        );
        (point.handler)(users);
        Ok(())
    }

    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.points.get(name).map(|point| &point.schema)
    }

    pub fn point_names(&self) -> Vec<&str> {
        self.points.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn is_valid_point_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

/// Extension point registration/delivery errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPointError {
    InvalidPointName(String),
    DuplicatePoint(String),
    UnknownPoint(String),
}

impl Display for ExtensionPointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPointName(value) => write!(f, "extension point name is invalid: {value}"),
            Self::DuplicatePoint(value) => {
                write!(f, "extension point already registered: {value}")
            }
            Self::UnknownPoint(value) => write!(f, "extension point not found: {value}"),
        }
    }
}

impl Error for ExtensionPointError {}

#[cfg(test)]
mod tests {
    use super::{ExtensionPointError, ExtensionPointRegistry, ExtensionPointUser};
    use crate::extension::collector::ErrorCollector;
    use crate::extension::descriptor::ExtensionDescriptor;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn user(id: &str, value: serde_json::Value) -> ExtensionPointUser {
        ExtensionPointUser::new(
            "views",
            ExtensionDescriptor::new(id, "0.1.0", format!("/ext/{id}")),
            value,
        )
    }

    #[test]
    fn delivers_whole_batch_to_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut registry = ExtensionPointRegistry::new();
        registry
            .register(
                "views",
                json!({ "type": "array" }),
                Box::new(move |users| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    for user in users.iter_mut() {
                        let message = format!("seen {}", user.description.id);
                        user.collector.report(message);
                    }
                }),
            )
            .expect("point registration");

        let mut users = vec![user("acme.a", json!([])), user("acme.b", json!({}))];
        registry
            .deliver("views", &mut users)
            .expect("delivery to known point");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(users[0].collector.messages(), ["seen acme.a"]);
        assert_eq!(users[1].collector.messages(), ["seen acme.b"]);
        assert_eq!(registry.schema("views"), Some(&json!({ "type": "array" })));
        assert_eq!(registry.point_names(), vec!["views"]);
    }

    #[test]
    fn rejects_duplicate_and_invalid_points() {
        let mut registry = ExtensionPointRegistry::new();
        registry
            .register("views", json!({}), Box::new(|_| {}))
            .expect("first registration");

        let err = registry
            .register("views", json!({}), Box::new(|_| {}))
            .expect_err("duplicate point must fail");
        assert_eq!(err, ExtensionPointError::DuplicatePoint("views".to_string()));

        let err = registry
            .register("bad name", json!({}), Box::new(|_| {}))
            .expect_err("invalid point name must fail");
        assert!(matches!(err, ExtensionPointError::InvalidPointName(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_point_delivery_fails() {
        let registry = ExtensionPointRegistry::new();
        let err = registry
            .deliver("missing", &mut [])
            .expect_err("unknown point must fail");
        assert_eq!(err, ExtensionPointError::UnknownPoint("missing".to_string()));
        assert!(registry.is_empty());
    }
}
