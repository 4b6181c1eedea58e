//! Command contribution registry and `commands` point handler.
//!
//! # Responsibility
//! - Drain one load-cycle batch through validation and icon normalization.
//! - Hold accepted commands in arrival order, then freeze them.
//! - Publish the frozen list once per process for unsynchronized reads.
//!
//! # Invariants
//! - The registry moves Open -> Frozen exactly once.
//! - Writes after freeze fail and leave content unchanged.
//! - Rejected declarations never reach the registry.

use crate::contribution::location::Location;
use crate::contribution::model::Command;
use crate::contribution::normalize::normalize_command;
use crate::contribution::schema::commands_schema;
use crate::contribution::validate::validate_command;
use crate::extension::collector::ErrorCollector;
use crate::extension::point::{ExtensionPointError, ExtensionPointRegistry, ExtensionPointUser};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Extension point name commands are contributed under.
pub const COMMANDS_EXTENSION_POINT: &str = "commands";

static PUBLISHED_COMMANDS: OnceCell<ContributionRegistry> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Open,
    Frozen,
}

/// Ordered list of accepted command contributions.
#[derive(Debug, Clone)]
pub struct ContributionRegistry {
    state: RegistryState,
    commands: Vec<Arc<Command>>,
}

impl Default for ContributionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContributionRegistry {
    pub fn new() -> Self {
        Self {
            state: RegistryState::Open,
            commands: Vec::new(),
        }
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state == RegistryState::Frozen
    }

    /// Appends one accepted command.
    pub fn push(&mut self, command: Command) -> Result<(), RegistryError> {
        if self.is_frozen() {
            warn!(
                "event=registry_push module=contribution status=error reason=frozen command={}",
                command.command
            );
            return Err(RegistryError::Frozen);
        }
        self.commands.push(Arc::new(command));
        Ok(())
    }

    /// Moves the registry to its terminal read-only state.
    pub fn freeze(&mut self) -> Result<(), RegistryError> {
        if self.is_frozen() {
            return Err(RegistryError::AlreadyFrozen);
        }
        self.state = RegistryState::Frozen;
        info!(
            "event=registry_freeze module=contribution status=ok commands={}",
            self.commands.len()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.iter()
    }

    /// First command registered under `command_id`.
    pub fn get(&self, command_id: &str) -> Option<&Arc<Command>> {
        self.commands
            .iter()
            .find(|command| command.command == command_id)
    }

    pub fn by_location(&self, location: Location) -> Vec<&Arc<Command>> {
        self.commands
            .iter()
            .filter(|command| command.is_placed_at(location))
            .collect()
    }

    /// Sorted distinct categories.
    pub fn categories(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| command.category.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Splits a declared value into command candidates.
fn candidates(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

/// Validates, normalizes and registers every candidate of the batch, then freezes.
///
/// Each rejection is reported to the owning extension's collector only.
pub fn register_contributions(users: &mut [ExtensionPointUser]) -> ContributionRegistry {
    let mut registry = ContributionRegistry::new();
    let mut seen_ids = HashSet::new();

    for user in users.iter_mut() {
        // Why: icons are resolved against the install root, so a relative or
        // malformed descriptor would leak relative paths into the registry.
        if let Err(err) = user.description.validate() {
            warn!(
                "event=extension_skip module=contribution status=error extension={} error={err}",
                user.description.id
            );
            user.collector.report(err.to_string());
            continue;
        }
        let root = user.description.install_root.clone();
        for candidate in candidates(&user.value) {
            let Some(command) = validate_command(candidate, &mut user.collector) else {
                continue;
            };
            let command = normalize_command(command, &root);
            if !seen_ids.insert(command.command.clone()) {
                warn!(
                    "event=command_duplicate module=contribution status=ok extension={} command={}",
                    user.description.id, command.command
                );
            }
            debug!(
                "event=command_accept module=contribution status=ok extension={} command={}",
                user.description.id, command.command
            );
            if let Err(err) = registry.push(command) {
                warn!("event=command_accept module=contribution status=error error={err}");
            }
        }
    }

    if let Err(err) = registry.freeze() {
        warn!("event=registry_freeze module=contribution status=error error={err}");
    }
    registry
}

/// Publishes a frozen registry for process-wide reads. Succeeds once.
pub fn publish_commands(registry: ContributionRegistry) -> Result<(), RegistryError> {
    if !registry.is_frozen() {
        return Err(RegistryError::NotFrozen);
    }
    PUBLISHED_COMMANDS
        .set(registry)
        .map_err(|_| RegistryError::AlreadyPublished)
}

/// Process-wide commands; empty until a registry has been published.
pub fn registered_commands() -> &'static [Arc<Command>] {
    PUBLISHED_COMMANDS
        .get()
        .map(ContributionRegistry::commands)
        .unwrap_or(&[])
}

/// Published registry, if the `commands` point has been handled.
pub fn published_registry() -> Option<&'static ContributionRegistry> {
    PUBLISHED_COMMANDS.get()
}

/// Registers the `commands` point; its handler builds and publishes the registry.
pub fn register_commands_extension_point(
    points: &mut ExtensionPointRegistry,
) -> Result<(), ExtensionPointError> {
    points.register(
        COMMANDS_EXTENSION_POINT,
        commands_schema(),
        Box::new(|users| {
            let registry = register_contributions(users);
            if let Err(err) = publish_commands(registry) {
                warn!("event=registry_publish module=contribution status=error error={err}");
            }
        }),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    Frozen,
    AlreadyFrozen,
    NotFrozen,
    AlreadyPublished,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frozen => write!(f, "command registry is frozen"),
            Self::AlreadyFrozen => write!(f, "command registry was already frozen"),
            Self::NotFrozen => write!(f, "command registry must be frozen before publishing"),
            Self::AlreadyPublished => write!(f, "command registry was already published"),
        }
    }
}

impl Error for RegistryError {}
