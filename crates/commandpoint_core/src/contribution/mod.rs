//! Command contributions: model, validation, schema, registry and actions.
//!
//! Raw declarations flow validate -> normalize -> registry (then frozen);
//! actions are built on demand from registered commands.

pub mod action;
pub mod location;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod validate;
