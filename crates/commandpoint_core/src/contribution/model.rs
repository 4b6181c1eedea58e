//! Command contribution data model.
//!
//! # Invariants
//! - A [`Command`] built by the validator has non-empty `command` and `title`.
//! - Union-typed manifest fields are sum types here; consumers match on
//!   variants instead of sniffing JSON shapes.

use crate::contribution::location::Location;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

pub const PROPERTY_COMMAND: &str = "command";
pub const PROPERTY_TITLE: &str = "title";
pub const PROPERTY_CATEGORY: &str = "category";
pub const PROPERTY_WHERE: &str = "where";
pub const PROPERTY_WHEN: &str = "when";
pub const PROPERTY_ICON: &str = "icon";

/// Resource predicate; every set field must match (AND).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ResourceFilter {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.scheme.is_none() && self.pattern.is_none()
    }
}

/// One visibility condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WhenCondition {
    Expression(String),
    Filter(ResourceFilter),
}

/// Visibility condition of a command: one condition or an OR-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WhenClause {
    Single(WhenCondition),
    AnyOf(Vec<WhenCondition>),
}

impl WhenClause {
    /// Conditions in declaration order; the clause holds if any holds.
    pub fn conditions(&self) -> &[WhenCondition] {
        match self {
            Self::Single(condition) => std::slice::from_ref(condition),
            Self::AnyOf(conditions) => conditions,
        }
    }
}

/// Where a command is placed: one surface or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Placement {
    Single(Location),
    Many(Vec<Location>),
}

impl Placement {
    pub fn locations(&self) -> &[Location] {
        match self {
            Self::Single(location) => std::slice::from_ref(location),
            Self::Many(locations) => locations,
        }
    }

    pub fn contains(&self, location: Location) -> bool {
        self.locations().contains(&location)
    }
}

/// Icon artwork per visual theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemableIcon {
    pub dark: PathBuf,
    pub light: PathBuf,
}

/// Command icon: a single path or one path per theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconSpec {
    Path(PathBuf),
    Themable(ThemableIcon),
}

/// Returns true iff `value` is an object whose `dark` and `light` are strings.
pub fn is_themable_icon(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            matches!(map.get("dark"), Some(Value::String(_)))
                && matches!(map.get("light"), Some(Value::String(_)))
        }
        _ => false,
    }
}

/// Accepted command contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Identifier used for dispatch and the `onCommand:` activation event.
    pub command: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<WhenClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconSpec>,
}

impl Command {
    pub fn new(command: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            title: title.into(),
            category: None,
            placement: None,
            when: None,
            icon: None,
        }
    }

    /// True when the command declares `location` among its placements.
    pub fn is_placed_at(&self, location: Location) -> bool {
        self.placement
            .as_ref()
            .is_some_and(|placement| placement.contains(location))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        is_themable_icon, Command, IconSpec, Placement, ResourceFilter, WhenClause, WhenCondition,
    };
    use crate::contribution::location::Location;
    use serde_json::json;

    #[test]
    fn themable_icon_requires_both_string_fields() {
        assert!(is_themable_icon(&json!({ "dark": "d.svg", "light": "l.svg" })));
        assert!(!is_themable_icon(&json!({ "dark": "d.svg" })));
        assert!(!is_themable_icon(&json!({ "dark": "d.svg", "light": 3 })));
        assert!(!is_themable_icon(&json!("icon.svg")));
        assert!(!is_themable_icon(&serde_json::Value::Null));
    }

    #[test]
    fn placement_flattens_single_and_many() {
        let single = Placement::Single(Location::EditorPrimary);
        assert_eq!(single.locations(), [Location::EditorPrimary]);

        let many = Placement::Many(vec![Location::EditorSecondary, Location::ExplorerContext]);
        assert!(many.contains(Location::ExplorerContext));
        assert!(!many.contains(Location::EditorPrimary));
    }

    #[test]
    fn when_clause_lists_conditions_in_order() {
        let clause = WhenClause::AnyOf(vec![
            WhenCondition::Expression("editorFocus".to_string()),
            WhenCondition::Filter(ResourceFilter {
                language: Some("rust".to_string()),
                ..ResourceFilter::default()
            }),
        ]);
        assert_eq!(clause.conditions().len(), 2);
        assert_eq!(
            clause.conditions()[0],
            WhenCondition::Expression("editorFocus".to_string())
        );
    }

    #[test]
    fn command_serializes_with_manifest_field_names() {
        let mut command = Command::new("acme.run", "Run");
        command.placement = Some(Placement::Single(Location::EditorPrimary));
        command.icon = Some(IconSpec::Path("/ext/acme/run.svg".into()));

        let json = serde_json::to_value(&command).expect("serialize command");
        assert_eq!(
            json,
            json!({
                "command": "acme.run",
                "title": "Run",
                "where": "editor/primary",
                "icon": "/ext/acme/run.svg"
            })
        );
        assert!(command.is_placed_at(Location::EditorPrimary));
        assert!(!command.is_placed_at(Location::ExplorerContext));
    }
}
