//! The declarative world description document.

use serde::{Deserialize, Serialize};
use std::path::Path;

use simlog_common::Pose;
use simlog_ecs::LightKind;

/// Plugin names containing any of these substrings are removed before
/// playback: recording must not re-record, and physics must not fight the
/// recorded poses. Case-sensitive.
pub const PLUGIN_DENY_LIST: [&str; 2] = ["LogRecord", "Physics"];

/// Errors from loading a world description.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("world description parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("world description declares zero worlds")]
    NoWorlds,
}

/// Top-level document: a list of world declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDescription {
    pub worlds: Vec<World>,
}

/// One declared world: models, lights, and plugins in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelDecl>,
    #[serde(default)]
    pub lights: Vec<LightDecl>,
    #[serde(default)]
    pub plugins: Vec<PluginDecl>,
}

/// A model declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDecl {
    pub name: String,
    #[serde(default)]
    pub pose: Pose,
}

/// A light declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDecl {
    pub name: String,
    #[serde(default = "default_light_kind")]
    pub kind: LightKind,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub pose: Pose,
}

fn default_light_kind() -> LightKind {
    LightKind::Point
}

fn default_intensity() -> f32 {
    1.0
}

/// A plugin declaration. The `name` attribute is the deny-list key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl WorldDescription {
    /// Parse a description from YAML text. Fails on malformed input or an
    /// empty `worlds` list.
    pub fn from_yaml(text: &str) -> Result<Self, WorldError> {
        let doc: Self = serde_yaml::from_str(text)?;
        if doc.worlds.is_empty() {
            return Err(WorldError::NoWorlds);
        }
        Ok(doc)
    }

    /// Load a description from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// The world playback runs against. Descriptions with more than one
    /// world use the first and log the rest as ignored.
    pub fn into_primary(self) -> Result<World, WorldError> {
        if self.worlds.len() > 1 {
            tracing::warn!(
                ignored = self.worlds.len() - 1,
                "description declares multiple worlds, using the first"
            );
        }
        self.worlds.into_iter().next().ok_or(WorldError::NoWorlds)
    }
}

impl World {
    /// Remove plugin declarations whose name matches the deny-list, keeping
    /// the relative order of everything else.
    pub fn sanitize(mut self) -> Self {
        self.plugins.retain(|plugin| {
            let denied = PLUGIN_DENY_LIST.iter().any(|s| plugin.name.contains(s));
            if denied {
                tracing::debug!(plugin = %plugin.name, "removed plugin from loaded world");
            }
            !denied
        });
        self
    }
}
