//! Extension host collaborator contracts.
//!
//! Descriptors, scoped error collection and extension point delivery as
//! consumed by contribution handlers. Manifest discovery and activation are
//! owned by the loader, not by this module.

pub mod collector;
pub mod descriptor;
pub mod point;
