//! Per-extension error collection.

use crate::logging::sanitize_message;
use log::warn;

const MAX_LOGGED_MESSAGE_CHARS: usize = 240;

/// Sink for human-readable problems found in one extension's declarations.
///
/// Implementations must not panic; reporting never fails.
pub trait ErrorCollector {
    fn report(&mut self, message: String);
}

/// Message collector scoped to a single extension.
///
/// One instance is created per extension per load cycle so that messages
/// are never attributed to a sibling extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMessageCollector {
    extension_id: String,
    point: String,
    messages: Vec<String>,
}

impl ExtensionMessageCollector {
    pub fn new(extension_id: impl Into<String>, point: impl Into<String>) -> Self {
        Self {
            extension_id: extension_id.into(),
            point: point.into(),
            messages: Vec::new(),
        }
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl ErrorCollector for ExtensionMessageCollector {
    fn report(&mut self, message: String) {
        warn!(
            "event=contribution_error module=extension status=error extension={} point={} message={}",
            self.extension_id,
            self.point,
            sanitize_message(&message, MAX_LOGGED_MESSAGE_CHARS)
        );
        self.messages.push(message);
    }
}

impl ErrorCollector for Vec<String> {
    fn report(&mut self, message: String) {
        self.push(message);
    }
}
