//! Validation of raw command declarations.
//!
//! # Responsibility
//! - Check one loosely-typed declaration against the command contract.
//! - Turn accepted declarations into typed [`Command`] values.
//!
//! # Invariants
//! - Checks run in a fixed order and stop at the first failure.
//! - A rejected candidate reports exactly one message to its collector.
//! - Validation never mutates its input and never panics.

use crate::contribution::location::{supported_locations, Location};
use crate::contribution::model::{
    Command, IconSpec, Placement, ResourceFilter, ThemableIcon, WhenClause,
    WhenCondition, PROPERTY_CATEGORY, PROPERTY_COMMAND, PROPERTY_ICON, PROPERTY_TITLE,
    PROPERTY_WHEN, PROPERTY_WHERE,
};
use crate::extension::collector::ErrorCollector;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const FILTER_FIELDS: &[&str] = &["language", "scheme", "pattern"];

/// Validates `candidate` and returns the typed command on success.
///
/// On failure the reason is reported to `collector` and `None` is returned.
pub fn validate_command(candidate: &Value, collector: &mut dyn ErrorCollector) -> Option<Command> {
    match parse_command(candidate) {
        Ok(command) => Some(command),
        Err(err) => {
            collector.report(err.to_string());
            None
        }
    }
}

/// Boolean form of [`validate_command`].
pub fn is_valid_command(candidate: &Value, collector: &mut dyn ErrorCollector) -> bool {
    validate_command(candidate, collector).is_some()
}

/// Parses one declaration into a [`Command`].
pub fn parse_command(candidate: &Value) -> Result<Command, CommandValidationError> {
    if candidate.is_null() {
        return Err(CommandValidationError::EmptyValue);
    }

    let command = mandatory_string(candidate, PROPERTY_COMMAND)?;
    let title = mandatory_string(candidate, PROPERTY_TITLE)?;
    let category = optional_string(candidate, PROPERTY_CATEGORY)?;
    let icon = present(candidate, PROPERTY_ICON).map(parse_icon).transpose()?;
    let placement = present(candidate, PROPERTY_WHERE)
        .map(parse_where)
        .transpose()?;
    let when = present(candidate, PROPERTY_WHEN).map(parse_when).transpose()?;

    Ok(Command {
        command,
        title,
        category,
        placement,
        when,
        icon,
    })
}

/// Validates an `icon` value: a path string or a `{dark, light}` literal.
pub fn parse_icon(value: &Value) -> Result<IconSpec, CommandValidationError> {
    match value {
        Value::String(path) => Ok(IconSpec::Path(PathBuf::from(path))),
        Value::Object(map) => match (map.get("dark"), map.get("light")) {
            (Some(Value::String(dark)), Some(Value::String(light))) => {
                Ok(IconSpec::Themable(ThemableIcon {
                    dark: PathBuf::from(dark),
                    light: PathBuf::from(light),
                }))
            }
            _ => Err(CommandValidationError::InvalidIcon),
        },
        _ => Err(CommandValidationError::InvalidIcon),
    }
}

/// Validates a `where` value: one location or a (possibly nested) array of them.
pub fn parse_where(value: &Value) -> Result<Placement, CommandValidationError> {
    match value {
        Value::Array(items) => {
            let mut locations = Vec::with_capacity(items.len());
            collect_locations(items, &mut locations)?;
            Ok(Placement::Many(locations))
        }
        scalar => parse_location(scalar).map(Placement::Single),
    }
}

fn collect_locations(
    items: &[Value],
    out: &mut Vec<Location>,
) -> Result<(), CommandValidationError> {
    for item in items {
        match item {
            Value::Array(nested) => collect_locations(nested, out)?,
            scalar => out.push(parse_location(scalar)?),
        }
    }
    Ok(())
}

fn parse_location(value: &Value) -> Result<Location, CommandValidationError> {
    match value {
        Value::String(raw) => {
            Location::parse(raw).map_err(|_| CommandValidationError::InvalidWhere(raw.clone()))
        }
        other => Err(CommandValidationError::InvalidWhere(other.to_string())),
    }
}

/// Validates a `when` value: a condition or a non-empty array of conditions.
pub fn parse_when(value: &Value) -> Result<WhenClause, CommandValidationError> {
    match value {
        Value::Array(items) => {
            let mut conditions = Vec::with_capacity(items.len());
            collect_conditions(items, &mut conditions)?;
            Ok(WhenClause::AnyOf(conditions))
        }
        scalar => parse_condition(scalar).map(WhenClause::Single),
    }
}

fn collect_conditions(
    items: &[Value],
    out: &mut Vec<WhenCondition>,
) -> Result<(), CommandValidationError> {
    if items.is_empty() {
        return Err(CommandValidationError::InvalidWhen);
    }
    for item in items {
        match item {
            Value::Array(nested) => collect_conditions(nested, out)?,
            scalar => out.push(parse_condition(scalar)?),
        }
    }
    Ok(())
}

fn parse_condition(value: &Value) -> Result<WhenCondition, CommandValidationError> {
    match value {
        Value::String(expression) => Ok(WhenCondition::Expression(expression.clone())),
        Value::Object(map) => parse_filter(map).map(WhenCondition::Filter),
        _ => Err(CommandValidationError::InvalidWhen),
    }
}

fn parse_filter(map: &Map<String, Value>) -> Result<ResourceFilter, CommandValidationError> {
    let mut fields = [None, None, None];
    for (slot, name) in fields.iter_mut().zip(FILTER_FIELDS) {
        *slot = match map.get(*name) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(raw.clone()),
            Some(_) => return Err(CommandValidationError::InvalidWhen),
        };
    }
    let [language, scheme, pattern] = fields;
    Ok(ResourceFilter {
        language,
        scheme,
        pattern,
    })
}

/// Optional fields treat an explicit `null` like an absent key.
fn present<'a>(candidate: &'a Value, property: &str) -> Option<&'a Value> {
    // Why: manifest generators emit `"icon": null` for unset fields; rejecting
    // those would drop otherwise valid commands.
    candidate.get(property).filter(|value| !value.is_null())
}

fn mandatory_string(
    candidate: &Value,
    property: &'static str,
) -> Result<String, CommandValidationError> {
    match candidate.get(property) {
        Some(Value::String(raw)) if raw.trim().is_empty() => {
            Err(CommandValidationError::EmptyString(property))
        }
        Some(Value::String(raw)) => Ok(raw.clone()),
        _ => Err(CommandValidationError::MandatoryString(property)),
    }
}

fn optional_string(
    candidate: &Value,
    property: &'static str,
) -> Result<Option<String>, CommandValidationError> {
    match present(candidate, property) {
        None => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw.clone())),
        Some(_) => Err(CommandValidationError::OptionalString(property)),
    }
}

/// Reasons a command declaration is rejected.
///
/// The `Display` text is the message handed to the extension's collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandValidationError {
    EmptyValue,
    MandatoryString(&'static str),
    EmptyString(&'static str),
    OptionalString(&'static str),
    InvalidIcon,
    InvalidWhere(String),
    InvalidWhen,
}

impl Display for CommandValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue => write!(f, "expected non-empty value."),
            Self::MandatoryString(property) => write!(
                f,
                "property `{property}` is mandatory and must be of type `string`"
            ),
            Self::EmptyString(property) => {
                write!(f, "property `{property}` must not be an empty string")
            }
            Self::OptionalString(property) => write!(
                f,
                "property `{property}` can be omitted or must be of type `string`"
            ),
            Self::InvalidIcon => write!(
                f,
                "property `{PROPERTY_ICON}` can be omitted or must be either a string or a literal like `{{dark, light}}`"
            ),
            Self::InvalidWhere(found) => write!(
                f,
                "property `{PROPERTY_WHERE}` can be omitted or must be one of {}; found {found}",
                supported_locations().join(", ")
            ),
            Self::InvalidWhen => write!(
                f,
                "property `{PROPERTY_WHEN}` can be omitted or must be a string, a resource filter or a non-empty array of those"
            ),
        }
    }
}

impl Error for CommandValidationError {}
