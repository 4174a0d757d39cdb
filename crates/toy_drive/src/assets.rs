//! Built-in demo track
//!
//! Stands in for the meshes an asset loader would hand over: ids, bounds and
//! a material per mesh, with placeholder GPU handles. The layout puts the car
//! on a circular track of radius [`TRACK_RADIUS`] around the origin.

use drive_engine::assets::{
    CameraDescription, IndexType, MaterialDescriptor, Mesh, MeshStore, NodeDescription, NodeRole, Primitive,
    SceneDescription,
};
use drive_engine::foundation::math::Vec3;
use drive_engine::physics::Aabb;
use drive_engine::scene::CollisionClass;

/// Distance from the circuit pivot to the racing line
pub const TRACK_RADIUS: f32 = 8.0;

fn cuboid_mesh(id: &str, vertex_array: u32, half_extents: Vec3, base_color: [f32; 4]) -> Mesh {
    Mesh::new(id, vec![Primitive {
        vertex_array,
        element_count: 36,
        index_type: IndexType::U16,
        material: MaterialDescriptor {
            base_color_factor: base_color,
            ..MaterialDescriptor::default()
        },
        bounds: Aabb::new(-half_extents, half_extents),
    }])
}

/// Meshes used by [`demo_scene`]
pub fn demo_meshes() -> MeshStore {
    let mut store = MeshStore::new();
    store.insert(cuboid_mesh("car", 1, Vec3::new(1.0, 0.5, 0.5), [0.8, 0.1, 0.1, 1.0]));
    store.insert(cuboid_mesh("tank", 2, Vec3::new(0.4, 0.4, 0.6), [0.9, 0.7, 0.1, 1.0]));
    store.insert(cuboid_mesh("coin", 3, Vec3::new(0.3, 0.05, 0.3), [1.0, 0.85, 0.0, 1.0]));
    store.insert(cuboid_mesh("cone", 4, Vec3::new(1.0, 1.0, 1.5), [1.0, 0.4, 0.0, 1.0]));
    store.insert(cuboid_mesh("road", 5, Vec3::new(10.0, 10.0, 0.05), [0.2, 0.2, 0.2, 1.0]));
    store.insert(cuboid_mesh("fabric", 6, Vec3::new(1.0, 1.0, 0.01), [1.0, 1.0, 1.0, 1.0]));
    store.insert(cuboid_mesh("dome", 7, Vec3::new(200.0, 200.0, 200.0), [1.0, 1.0, 1.0, 1.0]));
    store
}

/// Demo track layout
pub fn demo_scene() -> SceneDescription {
    let camera = CameraDescription {
        yfov: 0.8,
        znear: 0.1,
        zfar: 500.0,
        aspect: None,
    };

    let track = NodeDescription {
        name: "Track".to_string(),
        ..NodeDescription::default()
    }
    .with_translation(Vec3::new(0.0, 0.0, -0.6))
    .with_child(NodeDescription::mesh("road", "road", NodeRole::Renderable))
    .with_child(NodeDescription::mesh("Fabric", "fabric", NodeRole::Renderable));

    SceneDescription {
        nodes: vec![
            NodeDescription::camera("Camera", camera).with_translation(Vec3::new(0.0, 0.0, 30.0)),
            NodeDescription::mesh("sky", "dome", NodeRole::Sky),
            track,
            NodeDescription::mesh("ToyCar", "car", NodeRole::Vehicle)
                .with_translation(Vec3::new(0.0, -TRACK_RADIUS, 0.0)),
            NodeDescription::mesh("tank_template", "tank", NodeRole::Collidable(CollisionClass::Fuel)),
            NodeDescription::mesh("coin_template", "coin", NodeRole::Collidable(CollisionClass::Currency)),
            NodeDescription::mesh("center_cone", "cone", NodeRole::Collidable(CollisionClass::Obstacle)),
        ],
        excluded: vec!["Fabric".to_string()],
    }
}
