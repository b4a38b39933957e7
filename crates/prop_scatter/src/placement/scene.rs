//! Scene mutation capability consumed by the planner.
//!
//! The crate never touches a real scene graph. Hosts implement [`SceneGraph`]
//! on top of their engine; [`MemoryScene`] is a self-contained implementation
//! for tools, tests and headless runs.
use glam::{Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placement::{Template, TemplateId};
use crate::visibility::VisibilityRule;

/// Opaque reference to a scene node owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeHandle(pub u64);

/// Components the planner can attach to an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Re-evaluates the attached rule and toggles rendering.
    Visibility,
}

pub trait SceneGraph {
    /// Whether `node` refers to a live node.
    fn contains(&self, node: NodeHandle) -> bool;

    /// Creates an empty grouping node.
    fn create_group(&mut self, name: &str) -> Result<NodeHandle>;

    fn instantiate(&mut self, template: &Template) -> Result<NodeHandle>;

    fn set_transform(&mut self, node: NodeHandle, position: Vec3, rotation: Quat) -> Result<()>;

    fn set_parent(&mut self, node: NodeHandle, parent: NodeHandle) -> Result<()>;

    fn set_name(&mut self, node: NodeHandle, name: &str) -> Result<()>;

    fn attach_component(
        &mut self,
        node: NodeHandle,
        kind: ComponentKind,
        initial: &VisibilityRule,
    ) -> Result<()>;

    fn set_visible(&mut self, node: NodeHandle, visible: bool) -> Result<()>;

    /// Material shown in placement reports.
    fn material_name(&self, _node: NodeHandle) -> Option<String> {
        None
    }
}

/// A node stored by [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Template this node was instantiated from; `None` for groups.
    pub template: Option<TemplateId>,
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<NodeHandle>,
    pub components: Vec<(ComponentKind, VisibilityRule)>,
    pub visible: bool,
    pub material: Option<String>,
}

impl SceneNode {
    fn new(name: impl Into<String>, template: Option<TemplateId>) -> Self {
        Self {
            name: name.into(),
            template,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent: None,
            components: Vec::new(),
            visible: true,
            material: None,
        }
    }
}

/// Flat in-memory scene. Handles index into the node list.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: Vec<SceneNode>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|idx| self.nodes.get(idx))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeHandle(idx as u64), node))
    }

    pub fn children(&self, parent: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes()
            .filter(move |(_, node)| node.parent == Some(parent))
            .map(|(handle, _)| handle)
    }

    /// Assigns the material reported for `node`.
    pub fn set_material(&mut self, node: NodeHandle, material: impl Into<String>) -> Result<()> {
        self.node_mut(node)?.material = Some(material.into());
        Ok(())
    }

    fn push(&mut self, node: SceneNode) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle((self.nodes.len() - 1) as u64)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut SceneNode> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|idx| self.nodes.get_mut(idx))
            .ok_or(Error::UnknownNode { id: handle.0 })
    }
}

impl SceneGraph for MemoryScene {
    fn contains(&self, node: NodeHandle) -> bool {
        self.node(node).is_some()
    }

    fn create_group(&mut self, name: &str) -> Result<NodeHandle> {
        Ok(self.push(SceneNode::new(name, None)))
    }

    fn instantiate(&mut self, template: &Template) -> Result<NodeHandle> {
        Ok(self.push(SceneNode::new(
            template.id.clone(),
            Some(template.id.clone()),
        )))
    }

    fn set_transform(&mut self, node: NodeHandle, position: Vec3, rotation: Quat) -> Result<()> {
        let node = self.node_mut(node)?;
        node.position = position;
        node.rotation = rotation;
        Ok(())
    }

    fn set_parent(&mut self, node: NodeHandle, parent: NodeHandle) -> Result<()> {
        if self.node(parent).is_none() {
            return Err(Error::UnknownNode { id: parent.0 });
        }
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    fn set_name(&mut self, node: NodeHandle, name: &str) -> Result<()> {
        self.node_mut(node)?.name = name.to_owned();
        Ok(())
    }

    fn attach_component(
        &mut self,
        node: NodeHandle,
        kind: ComponentKind,
        initial: &VisibilityRule,
    ) -> Result<()> {
        let node = self.node_mut(node)?;
        // One component of each kind per node.
        if !node.components.iter().any(|(k, _)| *k == kind) {
            node.components.push((kind, initial.clone()));
        }
        Ok(())
    }

    fn set_visible(&mut self, node: NodeHandle, visible: bool) -> Result<()> {
        self.node_mut(node)?.visible = visible;
        Ok(())
    }

    fn material_name(&self, node: NodeHandle) -> Option<String> {
        self.node(node).and_then(|n| n.material.clone())
    }
}
