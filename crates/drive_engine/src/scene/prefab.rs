//! Prefab factory for procedural spawns

use crate::scene::node::CollidableNode;
use crate::scene::registry::SceneRegistry;
use crate::scene::SceneError;

/// Freshly stamped prefab instance
#[derive(Debug, Clone)]
pub struct PrefabInstance {
    /// Unique name, base name followed by the instance counter
    pub name: String,
    /// New node sharing the template's mesh
    pub node: CollidableNode,
}

/// Stamps uniquely named copies of a collidable template
///
/// The counter only ever grows, so names issued by one factory are never
/// reused. The factory does not limit how many instances exist; pacing is
/// the caller's job.
#[derive(Debug, Clone)]
pub struct PrefabFactory {
    template: CollidableNode,
    base_name: String,
    counter: u64,
}

impl PrefabFactory {
    /// Create a factory
    pub fn new(base_name: impl Into<String>, template: CollidableNode) -> Self {
        Self {
            template,
            base_name: base_name.into(),
            counter: 0,
        }
    }

    /// Create a factory from a collidable node already in the registry
    pub fn from_registry(
        registry: &SceneRegistry,
        template_name: &str,
        base_name: impl Into<String>,
    ) -> Result<Self, SceneError> {
        let template = registry
            .get(template_name)
            .and_then(|node| node.as_collidable())
            .ok_or_else(|| SceneError::MissingTemplate(template_name.to_string()))?;
        Ok(Self::new(base_name, template.clone()))
    }

    /// Base name of issued instances
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Number of instances issued so far
    pub fn issued(&self) -> u64 {
        self.counter
    }

    /// Template node
    pub fn template(&self) -> &CollidableNode {
        &self.template
    }

    /// Stamp a new instance
    pub fn instantiate(&mut self) -> PrefabInstance {
        self.counter += 1;
        PrefabInstance {
            name: format!("{}{}", self.base_name, self.counter),
            node: self.template.instantiate(),
        }
    }
}
