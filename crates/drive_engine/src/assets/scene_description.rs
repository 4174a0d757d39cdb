//! Serializable scene layout
//!
//! A scene file lists nodes by name with an optional mesh or camera, a local
//! translation/rotation/scale, a gameplay role and child nodes. Children
//! inherit their parent's composed matrix.
//!
//! ```ron
//! (
//!     nodes: [
//!         (name: "Camera", camera: Some((yfov: 0.8, znear: 0.1, zfar: 500.0)),
//!          translation: Some((0.0, 4.0, 20.0))),
//!         (name: "ToyCar", mesh: Some("car"), role: vehicle),
//!         (name: "coin_template", mesh: Some("coin"), role: collidable(currency)),
//!     ],
//!     excluded: ["Fabric"],
//! )
//! ```

use crate::assets::MeshId;
use crate::config::Config;
use crate::foundation::math::{from_quaternion, non_uniform_scale, translation, Mat4, Vec3};
use crate::scene::{CollisionClass, TransformNode};
use serde::{Deserialize, Serialize};

/// Gameplay role of a mesh node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Scenery, drawn but never collided with
    #[default]
    Renderable,
    /// Pickup or obstacle
    Collidable(CollisionClass),
    /// The player's vehicle
    Vehicle,
    /// Sky backdrop
    Sky,
}

/// Perspective camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    /// Vertical field of view in radians
    pub yfov: f32,
    /// Near plane
    pub znear: f32,
    /// Far plane
    pub zfar: f32,
    /// Fixed aspect ratio; the viewport's when absent
    #[serde(default)]
    pub aspect: Option<f32>,
}

/// One node of the scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    /// Unique node name
    pub name: String,
    /// Mesh drawn by this node
    #[serde(default)]
    pub mesh: Option<MeshId>,
    /// Camera carried by this node
    #[serde(default)]
    pub camera: Option<CameraDescription>,
    /// Local translation
    #[serde(default)]
    pub translation: Option<Vec3>,
    /// Local rotation quaternion in `[x, y, z, w]` order
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    /// Local per-axis scale
    #[serde(default)]
    pub scale: Option<Vec3>,
    /// Gameplay role
    #[serde(default)]
    pub role: NodeRole,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

impl NodeDescription {
    /// Mesh node with identity transform
    pub fn mesh(name: impl Into<String>, mesh: impl Into<MeshId>, role: NodeRole) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh.into()),
            role,
            ..Self::default()
        }
    }

    /// Camera node with identity transform
    pub fn camera(name: impl Into<String>, camera: CameraDescription) -> Self {
        Self {
            name: name.into(),
            camera: Some(camera),
            ..Self::default()
        }
    }

    /// Builder pattern: set the local translation
    pub fn with_translation(mut self, offset: Vec3) -> Self {
        self.translation = Some(offset);
        self
    }

    /// Builder pattern: set the local scale
    pub fn with_scale(mut self, factors: Vec3) -> Self {
        self.scale = Some(factors);
        self
    }

    /// Builder pattern: add a child node
    pub fn with_child(mut self, child: NodeDescription) -> Self {
        self.children.push(child);
        self
    }

    /// Transform node for this description under `parent`
    pub fn transform(&self, parent: Mat4) -> TransformNode {
        TransformNode::from_components(
            self.translation.as_ref().map_or_else(Mat4::identity, translation),
            self.rotation.map_or_else(Mat4::identity, from_quaternion),
            self.scale.as_ref().map_or_else(Mat4::identity, non_uniform_scale),
        )
        .with_parent(parent)
    }
}

/// Whole scene layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Root nodes
    pub nodes: Vec<NodeDescription>,
    /// Names of nodes to leave out, along with their children
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl Config for SceneDescription {}

impl SceneDescription {
    /// Whether `name` is on the exclusion list
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|excluded| excluded == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ron_layout() {
        let text = r#"(
            nodes: [
                (name: "Camera", camera: Some((yfov: 0.8, znear: 0.1, zfar: 500.0))),
                (name: "ToyCar", mesh: Some("car"), role: vehicle, translation: Some((0.0, -8.0, 0.0))),
                (name: "coin_template", mesh: Some("coin"), role: collidable(currency)),
            ],
            excluded: ["Fabric"],
        )"#;
        let scene: SceneDescription = ron::from_str(text).unwrap();
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.nodes[1].role, NodeRole::Vehicle);
        assert_eq!(scene.nodes[1].mesh, Some(MeshId::new("car")));
        assert_eq!(scene.nodes[2].role, NodeRole::Collidable(CollisionClass::Currency));
        assert!(scene.nodes[0].camera.unwrap().aspect.is_none());
        assert!(scene.is_excluded("Fabric"));
    }

    #[test]
    fn test_transform_from_description() {
        let node = NodeDescription::mesh("road", "road", NodeRole::Renderable)
            .with_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0));
        let transform = node.transform(Mat4::identity());
        assert_eq!(*transform.translation(), translation(&Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(*transform.rotation(), Mat4::identity());
        assert_eq!(transform.world_matrix()[(0, 0)], 2.0);
    }
}
