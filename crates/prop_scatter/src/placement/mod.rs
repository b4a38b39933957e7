//! Placement of template instances inside an authored area.
use glam::{Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::visibility::VisibilityRule;

pub mod events;
pub mod plan;
pub mod planner;
pub mod report;
pub mod scene;

pub use scene::NodeHandle;

pub type TemplateId = String;

/// Something that can be instantiated into the scene, such as a prefab.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Template {
    pub id: TemplateId,
    /// Prefix for generated instance names. Falls back to `id`.
    pub name_prefix: Option<String>,
}

impl Template {
    pub fn new(id: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            name_prefix: None,
        }
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn name_prefix(&self) -> &str {
        self.name_prefix.as_deref().unwrap_or(&self.id)
    }
}

/// Session-unique identifier of a placed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceId(pub u64);

/// Record of one placed instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceDescriptor {
    pub id: InstanceId,
    pub name: String,
    pub template: TemplateId,
    /// Scene node created for this instance.
    pub node: NodeHandle,
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<NodeHandle>,
    pub rule: VisibilityRule,
    /// Author-facing type label, e.g. an occasion name.
    pub label: Option<String>,
}
