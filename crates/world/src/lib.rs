//! World description loading and entity bootstrapping.
//!
//! A recording carries a declarative description of the initial scene:
//! models, lights, and plugin declarations under a single world root.
//! Before playback starts the description is loaded, stripped of plugins
//! that would conflict with replay, and instantiated into the component
//! store. A one-shot notification then hands the sanitized description to
//! the host so it can attach its own runtime plugins.
//!
//! # Invariants
//! - Sanitization preserves the relative order of surviving declarations.
//! - Instantiation runs exactly once, before any log entry is applied.

mod bootstrap;
mod description;
mod events;

pub use bootstrap::instantiate;
pub use description::{
    LightDecl, ModelDecl, PluginDecl, World, WorldDescription, WorldError, PLUGIN_DENY_LIST,
};
pub use events::{EventQueue, EventSink, HostEvent};
