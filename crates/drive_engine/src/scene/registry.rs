//! Scene registry
//!
//! Nodes live in a slot map. Two indices sit beside it: name → key, and
//! mesh id → keys of every batched node drawing that mesh. Every insert and
//! remove updates storage and both indices in one call, so a node is never
//! visible through one index and missing from another.

use crate::assets::MeshId;
use crate::scene::node::SceneNode;
use crate::scene::SceneError;
use slotmap::SlotMap;
use std::collections::{BTreeMap, BTreeSet};

/// Disagreement between registry storage and its indices
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// Name index and storage hold different counts
    #[error("{names} names for {nodes} nodes")]
    NameCount {
        /// Entries in the name index
        names: usize,
        /// Live nodes
        nodes: usize,
    },

    /// A name resolves to a removed or renamed node
    #[error("Name '{0}' points at a stale key")]
    StaleName(String),

    /// A mesh group survived its last member
    #[error("Empty group for mesh '{0}'")]
    EmptyGroup(MeshId),

    /// A mesh group still lists a removed node
    #[error("Group '{0}' holds a removed node")]
    StaleMember(MeshId),

    /// A node sits in the group of another mesh
    #[error("Node '{node}' is in the wrong group '{group}'")]
    WrongGroup {
        /// Misplaced node
        node: String,
        /// Group it was found in
        group: MeshId,
    },

    /// Groups and batched nodes disagree in number
    #[error("{grouped} grouped nodes for {batched} batched nodes")]
    GroupCount {
        /// Keys across all groups
        grouped: usize,
        /// Live batched nodes
        batched: usize,
    },
}

slotmap::new_key_type! {
    /// Stable key of a node in the [`SceneRegistry`]
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    node: SceneNode,
}

/// Named node storage with mesh grouping
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    nodes: SlotMap<NodeKey, Entry>,
    names: BTreeMap<String, NodeKey>,
    mesh_groups: BTreeMap<MeshId, BTreeSet<NodeKey>>,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under a unique name
    pub fn insert(&mut self, name: impl Into<String>, node: SceneNode) -> Result<NodeKey, SceneError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }

        let group = node.is_batched().then(|| node.mesh().map(|mesh| mesh.id.clone())).flatten();
        let key = self.nodes.insert(Entry { name: name.clone(), node });
        self.names.insert(name, key);
        if let Some(mesh_id) = group {
            self.mesh_groups.entry(mesh_id).or_default().insert(key);
        }
        Ok(key)
    }

    /// Remove a node by name
    ///
    /// Returns `None` when the name is not present, e.g. already consumed.
    pub fn remove(&mut self, name: &str) -> Option<SceneNode> {
        let key = self.key_of(name)?;
        self.remove_key(key).map(|(_, node)| node)
    }

    /// Remove a node by key, returning its name and node
    pub fn remove_key(&mut self, key: NodeKey) -> Option<(String, SceneNode)> {
        let Entry { name, node } = self.nodes.remove(key)?;
        self.names.remove(&name);
        if let Some(mesh) = node.mesh() {
            if let Some(group) = self.mesh_groups.get_mut(&mesh.id) {
                group.remove(&key);
                if group.is_empty() {
                    self.mesh_groups.remove(&mesh.id);
                }
            }
        }
        Some((name, node))
    }

    /// Node by name
    pub fn get(&self, name: &str) -> Option<&SceneNode> {
        self.key_of(name).and_then(|key| self.node(key))
    }

    /// Mutable node by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        let key = self.key_of(name)?;
        self.node_mut(key)
    }

    /// Node by key
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key).map(|entry| &entry.node)
    }

    /// Mutable node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key).map(|entry| &mut entry.node)
    }

    /// Key registered for `name`
    pub fn key_of(&self, name: &str) -> Option<NodeKey> {
        self.names.get(name).copied()
    }

    /// Name registered for `key`
    pub fn name_of(&self, key: NodeKey) -> Option<&str> {
        self.nodes.get(key).map(|entry| entry.name.as_str())
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeKey, &SceneNode)> {
        self.names
            .iter()
            .filter_map(|(name, &key)| self.node(key).map(|node| (name.as_str(), key, node)))
    }

    /// Mesh groups in mesh-id order
    pub fn mesh_groups(&self) -> impl Iterator<Item = (&MeshId, &BTreeSet<NodeKey>)> {
        self.mesh_groups.iter()
    }

    /// Keys of the nodes drawing `mesh`
    pub fn group(&self, mesh: &MeshId) -> Option<&BTreeSet<NodeKey>> {
        self.mesh_groups.get(mesh)
    }

    /// Snapshot of the keys of every collidable node
    pub fn collidable_keys(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, entry)| entry.node.is_collidable())
            .map(|(key, _)| key)
            .collect()
    }

    /// Verify that storage and both indices agree
    ///
    /// Every indexed key must be live, every live node must be named, and
    /// every batched node must sit in exactly the group of its own mesh.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        if self.names.len() != self.nodes.len() {
            return Err(ConsistencyError::NameCount {
                names: self.names.len(),
                nodes: self.nodes.len(),
            });
        }
        for (name, &key) in &self.names {
            match self.nodes.get(key) {
                Some(entry) if entry.name == *name => {}
                _ => return Err(ConsistencyError::StaleName(name.clone())),
            }
        }

        let mut grouped = 0;
        for (mesh_id, keys) in &self.mesh_groups {
            if keys.is_empty() {
                return Err(ConsistencyError::EmptyGroup(mesh_id.clone()));
            }
            for &key in keys {
                let Some(entry) = self.nodes.get(key) else {
                    return Err(ConsistencyError::StaleMember(mesh_id.clone()));
                };
                if entry.node.mesh().map(|mesh| &mesh.id) != Some(mesh_id) {
                    return Err(ConsistencyError::WrongGroup {
                        node: entry.name.clone(),
                        group: mesh_id.clone(),
                    });
                }
            }
            grouped += keys.len();
        }

        let batched = self.nodes.values().filter(|entry| entry.node.is_batched()).count();
        if grouped != batched {
            return Err(ConsistencyError::GroupCount { grouped, batched });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Mesh, Primitive};
    use crate::foundation::math::Vec3;
    use crate::physics::collision::Aabb;
    use crate::scene::{CollidableNode, CollisionClass, RenderNode, SkyNode, TransformNode};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn mesh(id: &str) -> Arc<Mesh> {
        Arc::new(Mesh::new(id, vec![Primitive::with_bounds(Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)))]))
    }

    fn pickup(mesh_id: &str) -> SceneNode {
        SceneNode::Collidable(CollidableNode::new(
            RenderNode::new(TransformNode::new(), mesh(mesh_id)),
            CollisionClass::Currency,
        ))
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = SceneRegistry::new();
        registry.insert("coin1", pickup("coin")).unwrap();
        let err = registry.insert("coin1", pickup("coin")).unwrap_err();
        assert_eq!(err, SceneError::DuplicateName("coin1".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_updates_both_indices() {
        let mut registry = SceneRegistry::new();
        let key = registry.insert("coin1", pickup("coin")).unwrap();
        registry.insert("coin2", pickup("coin")).unwrap();
        assert_eq!(registry.group(&MeshId::new("coin")).unwrap().len(), 2);

        assert!(registry.remove("coin1").is_some());
        assert!(!registry.contains("coin1"));
        assert!(!registry.group(&MeshId::new("coin")).unwrap().contains(&key));
        assert!(registry.node(key).is_none());
        registry.check_consistency().unwrap();
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut registry = SceneRegistry::new();
        let key = registry.insert("coin1", pickup("coin")).unwrap();
        registry.remove_key(key).unwrap();
        assert!(registry.remove_key(key).is_none());
        assert!(registry.remove("coin1").is_none());
        assert!(registry.group(&MeshId::new("coin")).is_none());
    }

    #[test]
    fn test_sky_is_not_grouped() {
        let mut registry = SceneRegistry::new();
        registry
            .insert("sky", SceneNode::Sky(SkyNode { transform: TransformNode::new(), mesh: mesh("dome") }))
            .unwrap();
        assert_eq!(registry.mesh_groups().count(), 0);
        assert!(registry.collidable_keys().is_empty());
        registry.check_consistency().unwrap();
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut registry = SceneRegistry::new();
        for name in ["tank2", "coin1", "road"] {
            registry.insert(name, pickup("coin")).unwrap();
        }
        let names: Vec<&str> = registry.iter().map(|(name, _, _)| name).collect();
        assert_eq!(names, vec!["coin1", "road", "tank2"]);
    }

    #[test]
    fn test_random_insert_remove_stays_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut registry = SceneRegistry::new();
        let meshes = ["coin", "tank", "cone"];
        for step in 0..500 {
            if rng.gen_bool(0.6) {
                let mesh_id = meshes[rng.gen_range(0..meshes.len())];
                registry.insert(format!("node{step}"), pickup(mesh_id)).unwrap();
            } else if !registry.is_empty() {
                let victim = rng.gen_range(0..registry.len());
                let name = registry.iter().nth(victim).map(|(name, _, _)| name.to_string()).unwrap();
                assert!(registry.remove(&name).is_some());
            }
            registry.check_consistency().unwrap();
        }
    }

    #[test]
    fn test_consistency_reports_broken_indices() {
        let mut registry = SceneRegistry::new();
        let coin = registry.insert("coin1", pickup("coin")).unwrap();
        let tank = registry.insert("tank1", pickup("tank")).unwrap();

        let mut stale = registry.clone();
        stale.names.insert("ghost".to_string(), coin);
        stale.names.remove("coin1");
        assert_eq!(stale.check_consistency(), Err(ConsistencyError::StaleName("ghost".to_string())));

        let mut misplaced = registry.clone();
        misplaced.mesh_groups.entry(MeshId::new("coin")).or_default().insert(tank);
        assert_eq!(
            misplaced.check_consistency(),
            Err(ConsistencyError::WrongGroup {
                node: "tank1".to_string(),
                group: MeshId::new("coin"),
            })
        );

        let mut ungrouped = registry;
        ungrouped.mesh_groups.remove(&MeshId::new("tank"));
        assert_eq!(
            ungrouped.check_consistency(),
            Err(ConsistencyError::GroupCount { grouped: 1, batched: 2 })
        );
    }
}
