//! Procedural pickup spawning
//!
//! Pickups are stamped from two templates found in the loaded scene: one for
//! fuel, one for currency. The templates are taken out of the registry when
//! the spawner is built so they are never drawn or collided with themselves.

use crate::config::SpawnConfig;
use drive_engine::foundation::math::{axis_rotation, translation, Point3, Vec3};
use drive_engine::scene::{CollisionClass, Placed, PrefabFactory, SceneError, SceneNode, SceneRegistry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Weighted random pickup spawner
#[derive(Debug, Clone)]
pub struct Spawner {
    fuel: PrefabFactory,
    currency: PrefabFactory,
    rng: StdRng,
    config: SpawnConfig,
}

impl Spawner {
    /// Create a spawner from two factories
    pub fn new(fuel: PrefabFactory, currency: PrefabFactory, config: SpawnConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { fuel, currency, rng, config }
    }

    /// Build factories from the template nodes named in `config` and remove
    /// the templates from the registry
    pub fn from_registry(registry: &mut SceneRegistry, config: SpawnConfig) -> Result<Self, SceneError> {
        let fuel = PrefabFactory::from_registry(registry, &config.fuel_template, config.fuel_base_name.clone())?;
        let currency =
            PrefabFactory::from_registry(registry, &config.currency_template, config.currency_base_name.clone())?;
        registry.remove(&config.fuel_template);
        registry.remove(&config.currency_template);
        Ok(Self::new(fuel, currency, config))
    }

    /// Draw the category of the next pickup
    pub fn pick_class(&mut self) -> CollisionClass {
        if self.rng.gen_bool(self.config.fuel_weight) {
            CollisionClass::Fuel
        } else {
            CollisionClass::Currency
        }
    }

    /// Spawn point ahead of the vehicle
    ///
    /// The vehicle's position is carried `lead_degrees` further around the
    /// circuit pivot, then shifted sideways by a random amount within
    /// `lateral_spread`.
    pub fn placement(&mut self, actor_position: Vec3, facing: Vec3, pivot_axis: Vec3) -> Vec3 {
        let ahead = axis_rotation(&pivot_axis, self.config.lead_degrees)
            .transform_point(&Point3::from(actor_position))
            .coords;
        let sideways = facing
            .cross(&pivot_axis)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros);
        let spread = self.config.lateral_spread.abs();
        let offset = if spread > 0.0 { self.rng.gen_range(-spread..=spread) } else { 0.0 };
        ahead + sideways * offset
    }

    /// Number of live pickups in `registry`
    pub fn live_pickups(registry: &SceneRegistry) -> usize {
        registry
            .collidable_keys()
            .into_iter()
            .filter_map(|key| registry.node(key))
            .filter(|node| {
                matches!(node.collision_class(), Some(CollisionClass::Fuel | CollisionClass::Currency))
            })
            .count()
    }

    /// Spawn one pickup at `position`
    ///
    /// Returns the new node's name, or `None` when the live-pickup cap holds
    /// spawning back.
    pub fn spawn(&mut self, registry: &mut SceneRegistry, position: Vec3) -> Result<Option<String>, SceneError> {
        if let Some(cap) = self.config.max_live_pickups {
            if Self::live_pickups(registry) >= cap {
                log::trace!("Spawn skipped, {cap} pickups live");
                return Ok(None);
            }
        }

        let factory = match self.pick_class() {
            CollisionClass::Fuel => &mut self.fuel,
            _ => &mut self.currency,
        };
        let mut instance = factory.instantiate();

        // Shift the whole instance so its origin lands on `position`
        let transform = instance.node.transform_mut();
        let origin = transform.world_matrix().transform_point(&Point3::origin()).coords;
        let parent = translation(&(position - origin)) * transform.parent();
        transform.set_parent(parent);

        registry.insert(instance.name.clone(), SceneNode::Collidable(instance.node))?;
        log::debug!("Spawned {} at {:?}", instance.name, position);
        Ok(Some(instance.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drive_engine::assets::{Mesh, Primitive};
    use drive_engine::physics::Aabb;
    use drive_engine::scene::{CollidableNode, RenderNode, TransformNode};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn template(id: &str, class: CollisionClass) -> SceneNode {
        let mesh = Arc::new(Mesh::new(id, vec![Primitive::with_bounds(Aabb::new(
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ))]));
        let mut node = CollidableNode::new(RenderNode::new(TransformNode::new(), mesh), class);
        node.transform_mut().translate(&translation(&Vec3::new(3.0, 3.0, 0.0)));
        SceneNode::Collidable(node)
    }

    fn registry() -> SceneRegistry {
        let mut registry = SceneRegistry::new();
        registry.insert("tank_template", template("tank", CollisionClass::Fuel)).unwrap();
        registry.insert("coin_template", template("coin", CollisionClass::Currency)).unwrap();
        registry
    }

    fn config() -> SpawnConfig {
        SpawnConfig { seed: Some(9), ..SpawnConfig::default() }
    }

    #[test]
    fn test_templates_leave_registry() {
        let mut registry = registry();
        Spawner::from_registry(&mut registry, config()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_template_is_error() {
        let mut registry = SceneRegistry::new();
        let err = Spawner::from_registry(&mut registry, config()).unwrap_err();
        assert_eq!(err, SceneError::MissingTemplate("tank_template".to_string()));
    }

    #[test]
    fn test_weighted_pick_roughly_matches() {
        let mut registry = registry();
        let mut spawner = Spawner::from_registry(&mut registry, config()).unwrap();
        let fuel = (0..2000).filter(|_| spawner.pick_class() == CollisionClass::Fuel).count();
        assert!((450..750).contains(&fuel), "fuel share {fuel}");
    }

    #[test]
    fn test_spawn_places_instance_at_position() {
        let mut registry = registry();
        let mut spawner = Spawner::from_registry(&mut registry, config()).unwrap();
        let name = spawner.spawn(&mut registry, Vec3::new(0.0, 8.0, 1.0)).unwrap().unwrap();
        let boxes = registry.get(&name).unwrap().world_bounding_boxes();
        assert_relative_eq!(boxes[0].center(), Vec3::new(0.0, 8.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_spawn_respects_live_cap() {
        let mut registry = registry();
        let mut spawner =
            Spawner::from_registry(&mut registry, SpawnConfig { max_live_pickups: Some(3), ..config() }).unwrap();
        let spawned = (0..10)
            .filter_map(|_| spawner.spawn(&mut registry, Vec3::zeros()).unwrap())
            .count();
        assert_eq!(spawned, 3);
        assert_eq!(Spawner::live_pickups(&registry), 3);
    }

    #[test]
    fn test_placement_leads_around_circuit() {
        let mut registry = registry();
        let mut spawner = Spawner::from_registry(
            &mut registry,
            SpawnConfig { lead_degrees: 90.0, lateral_spread: 0.0, ..config() },
        )
        .unwrap();
        let target = spawner.placement(Vec3::new(0.0, -8.0, 0.0), Vec3::x(), Vec3::z());
        assert_relative_eq!(target, Vec3::new(8.0, 0.0, 0.0), epsilon = 1e-5);
    }
}
