//! Declarative schema for the `commands` contribution point.
//!
//! Field names and the `where` enum come from the same constants the
//! validator reads, so tooling and runtime accept the same flat shape.

use crate::contribution::location::supported_locations;
use crate::contribution::model::{
    PROPERTY_CATEGORY, PROPERTY_COMMAND, PROPERTY_ICON, PROPERTY_TITLE, PROPERTY_WHEN,
    PROPERTY_WHERE,
};
use serde_json::{json, Map, Value};

/// JSON schema document: one command object or an array of them.
pub fn commands_schema() -> Value {
    let command = command_object_schema();
    json!({
        "description": "Contributes commands to the command palette.",
        "oneOf": [
            command.clone(),
            {
                "type": "array",
                "items": command
            }
        ]
    })
}

fn command_object_schema() -> Value {
    let mut properties = Map::new();
    properties.insert(
        PROPERTY_COMMAND.to_string(),
        json!({
            "description": "Identifier of the command to execute",
            "type": "string"
        }),
    );
    properties.insert(
        PROPERTY_TITLE.to_string(),
        json!({
            "description": "Title by which the command is represented in the UI",
            "type": "string"
        }),
    );
    properties.insert(
        PROPERTY_CATEGORY.to_string(),
        json!({
            "description": "(Optional) Category string by which the command is grouped in the UI",
            "type": "string"
        }),
    );
    properties.insert(PROPERTY_WHERE.to_string(), where_schema());
    properties.insert(PROPERTY_WHEN.to_string(), when_schema());
    properties.insert(PROPERTY_ICON.to_string(), icon_schema());

    json!({
        "type": "object",
        "required": [PROPERTY_COMMAND, PROPERTY_TITLE],
        "properties": properties
    })
}

fn where_schema() -> Value {
    let location = json!({
        "type": "string",
        "enum": supported_locations()
    });
    json!({
        "description": "(Optional) UI surfaces the command is placed on",
        "oneOf": [
            location.clone(),
            { "type": "array", "items": location }
        ]
    })
}

fn when_schema() -> Value {
    let condition = json!({
        "oneOf": [
            { "type": "string" },
            {
                "type": "object",
                "properties": {
                    "language": { "type": "string" },
                    "scheme": { "type": "string" },
                    "pattern": { "type": "string" }
                }
            }
        ]
    });
    json!({
        "description": "(Optional) Condition that must hold for the command to be shown",
        "oneOf": [
            condition.clone(),
            { "type": "array", "minItems": 1, "items": condition }
        ]
    })
}

fn icon_schema() -> Value {
    json!({
        "description": "(Optional) Icon used to represent the command in the UI",
        "oneOf": [
            { "type": "string" },
            {
                "type": "object",
                "required": ["light", "dark"],
                "properties": {
                    "light": {
                        "description": "Icon path when a light theme is used",
                        "type": "string"
                    },
                    "dark": {
                        "description": "Icon path when a dark theme is used",
                        "type": "string"
                    }
                }
            }
        ]
    })
}
