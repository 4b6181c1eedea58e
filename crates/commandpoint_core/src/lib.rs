//! Command contribution host.
//! Validates, normalizes and registers extension-declared commands and
//! binds them to lazily-activated actions.

pub mod contribution;
pub mod extension;
pub mod logging;

pub use contribution::action::{
    sort_actions, ActivationTrigger, CommandAction, CommandActionError, CommandDispatcher,
    ON_COMMAND_ACTIVATION_PREFIX, RUN_LAST_ORDER,
};
pub use contribution::location::{supported_locations, Location, LocationError};
pub use contribution::model::{
    is_themable_icon, Command, IconSpec, Placement, ResourceFilter, ThemableIcon, WhenClause,
    WhenCondition,
};
pub use contribution::normalize::{normalize_command, resolve_icon};
pub use contribution::registry::{
    publish_commands, published_registry, register_commands_extension_point,
    register_contributions, registered_commands, ContributionRegistry, RegistryError,
    RegistryState, COMMANDS_EXTENSION_POINT,
};
pub use contribution::schema::commands_schema;
pub use contribution::validate::{
    is_valid_command, parse_command, validate_command, CommandValidationError,
};
pub use extension::collector::{ErrorCollector, ExtensionMessageCollector};
pub use extension::descriptor::{DescriptorValidationError, ExtensionDescriptor};
pub use extension::point::{
    ExtensionPointError, ExtensionPointHandler, ExtensionPointRegistry, ExtensionPointUser,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
