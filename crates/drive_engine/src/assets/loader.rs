//! Scene construction from a [`SceneDescription`]
//!
//! Walks the node tree depth-first, resolves meshes against the
//! [`MeshStore`] and fills a [`SceneRegistry`]. Any problem is a
//! configuration error and aborts the whole build.

use crate::assets::scene_description::{NodeDescription, NodeRole, SceneDescription};
use crate::assets::MeshStore;
use crate::foundation::math::Mat4;
use crate::scene::{
    CameraNode, CollidableNode, NodeKey, Projection, RenderNode, SceneError, SceneNode, SceneRegistry, SkyNode,
    SteeringLimits, VehicleNode,
};

/// A fully built scene
#[derive(Debug, Clone)]
pub struct LoadedScene {
    /// All nodes, cameras included
    pub registry: SceneRegistry,
    /// Active camera
    pub camera: NodeKey,
    /// The player's vehicle
    pub actor: NodeKey,
}

impl LoadedScene {
    /// Active camera node
    pub fn camera(&self) -> Option<&CameraNode> {
        self.registry.node(self.camera).and_then(SceneNode::as_camera)
    }

    /// The player's vehicle
    pub fn actor(&self) -> Option<&VehicleNode> {
        self.registry.node(self.actor).and_then(SceneNode::as_vehicle)
    }
}

/// Builds scenes from descriptions
pub struct SceneLoader<'a> {
    store: &'a MeshStore,
    aspect_ratio: f32,
    steering_limits: SteeringLimits,
}

#[derive(Default)]
struct BuildState {
    registry: SceneRegistry,
    camera: Option<NodeKey>,
    actor: Option<NodeKey>,
}

impl<'a> SceneLoader<'a> {
    /// Create a loader resolving meshes from `store`
    pub fn new(store: &'a MeshStore) -> Self {
        Self {
            store,
            aspect_ratio: 16.0 / 9.0,
            steering_limits: SteeringLimits::default(),
        }
    }

    /// Builder pattern: viewport aspect ratio for cameras without their own
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Builder pattern: steering limits of the vehicle
    pub fn with_steering_limits(mut self, limits: SteeringLimits) -> Self {
        self.steering_limits = limits;
        self
    }

    /// Build the scene
    ///
    /// The first camera becomes the active one. Exactly one vehicle node is
    /// required.
    pub fn build(&self, description: &SceneDescription) -> Result<LoadedScene, SceneError> {
        let mut state = BuildState::default();
        for node in &description.nodes {
            self.add_node(description, node, Mat4::identity(), &mut state)?;
        }

        let camera = state.camera.ok_or(SceneError::MissingCamera)?;
        let actor = state.actor.ok_or(SceneError::MissingActor)?;
        log::info!("Scene built with {} nodes", state.registry.len());
        Ok(LoadedScene {
            registry: state.registry,
            camera,
            actor,
        })
    }

    fn add_node(
        &self,
        description: &SceneDescription,
        node: &NodeDescription,
        parent: Mat4,
        state: &mut BuildState,
    ) -> Result<(), SceneError> {
        if description.is_excluded(&node.name) {
            log::debug!("Skipping excluded node '{}'", node.name);
            return Ok(());
        }

        let transform = node.transform(parent);
        let composed = transform.world_matrix();

        match (&node.mesh, &node.camera) {
            (Some(_), Some(_)) => {
                return Err(invalid(node, "has both a mesh and a camera"));
            }
            (Some(mesh_id), None) => {
                let mesh = self.store.get(mesh_id)?;
                let collides = matches!(node.role, NodeRole::Collidable(_) | NodeRole::Vehicle);
                if collides && mesh.local_bounds().is_none() {
                    return Err(invalid(node, "collides but its mesh has no bounds"));
                }
                let scene_node = match node.role {
                    NodeRole::Renderable => SceneNode::Renderable(RenderNode::new(transform, mesh)),
                    NodeRole::Collidable(class) => {
                        SceneNode::Collidable(CollidableNode::new(RenderNode::new(transform, mesh), class))
                    }
                    NodeRole::Vehicle => {
                        if state.actor.is_some() {
                            return Err(SceneError::MultipleActors(node.name.clone()));
                        }
                        SceneNode::Vehicle(VehicleNode::new(transform, mesh, self.steering_limits))
                    }
                    NodeRole::Sky => SceneNode::Sky(SkyNode { transform, mesh }),
                };
                let key = state.registry.insert(node.name.clone(), scene_node)?;
                if node.role == NodeRole::Vehicle {
                    state.actor = Some(key);
                }
            }
            (None, Some(camera)) => {
                let projection = Projection {
                    yfov: camera.yfov,
                    znear: camera.znear,
                    zfar: camera.zfar,
                    aspect: camera.aspect.unwrap_or(self.aspect_ratio),
                };
                let camera_node = CameraNode::new(node.transform(Mat4::identity()), projection);
                let key = state.registry.insert(node.name.clone(), SceneNode::Camera(camera_node))?;
                if state.camera.is_none() {
                    state.camera = Some(key);
                } else {
                    log::warn!("Extra camera '{}' loaded but not active", node.name);
                }
            }
            (None, None) => {
                if node.role != NodeRole::Renderable {
                    return Err(invalid(node, "has a gameplay role but no mesh"));
                }
            }
        }

        for child in &node.children {
            self.add_node(description, child, composed, state)?;
        }
        Ok(())
    }
}

fn invalid(node: &NodeDescription, reason: &str) -> SceneError {
    SceneError::InvalidNode {
        name: node.name.clone(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::scene_description::CameraDescription;
    use crate::assets::{Mesh, MeshId, Primitive};
    use crate::foundation::math::{translation, Vec3};
    use crate::physics::collision::Aabb;
    use crate::scene::{CollisionClass, Placed};
    use approx::assert_relative_eq;

    fn store() -> MeshStore {
        let mut store = MeshStore::new();
        for id in ["car", "coin", "road", "dome"] {
            store.insert(Mesh::new(id, vec![Primitive::with_bounds(Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)))]));
        }
        store
    }

    fn lens() -> CameraDescription {
        CameraDescription { yfov: 0.8, znear: 0.1, zfar: 100.0, aspect: None }
    }

    fn minimal() -> SceneDescription {
        SceneDescription {
            nodes: vec![
                NodeDescription::camera("Camera", lens()),
                NodeDescription::mesh("ToyCar", "car", NodeRole::Vehicle),
            ],
            excluded: Vec::new(),
        }
    }

    #[test]
    fn test_minimal_scene() {
        let store = store();
        let scene = SceneLoader::new(&store).with_aspect_ratio(2.0).build(&minimal()).unwrap();
        assert!(scene.actor().is_some());
        assert_relative_eq!(scene.camera().unwrap().projection().aspect, 2.0);
        assert_eq!(scene.registry.len(), 2);
    }

    #[test]
    fn test_children_inherit_parent_matrix() {
        let store = store();
        let mut description = minimal();
        description.nodes.push(
            NodeDescription { name: "Track".to_string(), ..NodeDescription::default() }
                .with_translation(Vec3::new(0.0, 0.0, 10.0))
                .with_child(
                    NodeDescription::mesh("road", "road", NodeRole::Renderable)
                        .with_translation(Vec3::new(1.0, 0.0, 0.0)),
                ),
        );
        let scene = SceneLoader::new(&store).build(&description).unwrap();
        let road = scene.registry.get("road").unwrap();
        assert_relative_eq!(*road.transform().parent(), translation(&Vec3::new(0.0, 0.0, 10.0)));
        assert_relative_eq!(
            road.transform().world_matrix(),
            translation(&Vec3::new(1.0, 0.0, 10.0)),
            epsilon = 1e-6
        );
        assert!(!scene.registry.contains("Track"));
    }

    #[test]
    fn test_excluded_node_skipped() {
        let store = store();
        let mut description = minimal();
        description.nodes.push(NodeDescription::mesh("Fabric", "road", NodeRole::Renderable));
        description.excluded.push("Fabric".to_string());
        let scene = SceneLoader::new(&store).build(&description).unwrap();
        assert!(!scene.registry.contains("Fabric"));
    }

    #[test]
    fn test_roles_map_to_variants() {
        let store = store();
        let mut description = minimal();
        description.nodes.push(NodeDescription::mesh("coin_template", "coin", NodeRole::Collidable(CollisionClass::Currency)));
        description.nodes.push(NodeDescription::mesh("sky", "dome", NodeRole::Sky));
        let scene = SceneLoader::new(&store).build(&description).unwrap();
        assert_eq!(
            scene.registry.get("coin_template").unwrap().collision_class(),
            Some(CollisionClass::Currency)
        );
        assert!(matches!(scene.registry.get("sky"), Some(SceneNode::Sky(_))));
        let actor = scene.registry.node(scene.actor).unwrap();
        assert!(actor.as_vehicle().unwrap().world_matrix() == Mat4::identity());
    }

    #[test]
    fn test_configuration_errors() {
        let store = store();
        let loader = SceneLoader::new(&store);

        let mut missing_mesh = minimal();
        missing_mesh.nodes.push(NodeDescription::mesh("tree", "tree", NodeRole::Renderable));
        assert_eq!(loader.build(&missing_mesh).unwrap_err(), SceneError::MissingMesh(MeshId::new("tree")));

        let mut duplicate = minimal();
        duplicate.nodes.push(NodeDescription::mesh("Camera", "road", NodeRole::Renderable));
        assert_eq!(loader.build(&duplicate).unwrap_err(), SceneError::DuplicateName("Camera".to_string()));

        let mut two_cars = minimal();
        two_cars.nodes.push(NodeDescription::mesh("Van", "car", NodeRole::Vehicle));
        assert_eq!(loader.build(&two_cars).unwrap_err(), SceneError::MultipleActors("Van".to_string()));

        let no_camera = SceneDescription { nodes: vec![minimal().nodes[1].clone()], excluded: Vec::new() };
        assert_eq!(loader.build(&no_camera).unwrap_err(), SceneError::MissingCamera);

        let no_actor = SceneDescription { nodes: vec![minimal().nodes[0].clone()], excluded: Vec::new() };
        assert_eq!(loader.build(&no_actor).unwrap_err(), SceneError::MissingActor);

        let mut both = minimal();
        let mut odd = NodeDescription::mesh("odd", "road", NodeRole::Renderable);
        odd.camera = Some(lens());
        both.nodes.push(odd);
        assert!(matches!(loader.build(&both), Err(SceneError::InvalidNode { .. })));
    }

    #[test]
    fn test_collider_needs_bounded_mesh() {
        let mut store = store();
        store.insert(Mesh::new("decal", vec![]));
        let loader = SceneLoader::new(&store);

        let mut decal = minimal();
        decal.nodes.push(NodeDescription::mesh("decal", "decal", NodeRole::Renderable));
        assert!(loader.build(&decal).is_ok());

        let mut hazard = minimal();
        hazard.nodes.push(NodeDescription::mesh("hazard", "decal", NodeRole::Collidable(CollisionClass::Obstacle)));
        assert_eq!(
            loader.build(&hazard).unwrap_err(),
            SceneError::InvalidNode {
                name: "hazard".to_string(),
                reason: "collides but its mesh has no bounds".to_string(),
            }
        );
    }
}
