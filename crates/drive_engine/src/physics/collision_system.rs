//! Per-tick collision sweep
//!
//! Runs once per tick after every transform mutation of that tick. The actor's
//! boxes are computed once and tested against the boxes of every other
//! collidable. Pickups are removed from the registry the moment they are hit,
//! before any further box pair is tested, so no pickup is scored twice.
//!
//! Every overlapping candidate is resolved, so the report depends only on the
//! set of overlaps and never on storage order. When several obstacles are hit
//! in one tick the lexicographically smallest name is reported.

use crate::physics::collision::Aabb;
use crate::scene::{CollisionClass, NodeKey, SceneRegistry};

/// What one sweep found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Fuel pickups consumed
    pub fuel_pickups: u32,
    /// Currency pickups consumed
    pub currency_pickups: u32,
    /// Names of every consumed node
    pub consumed: Vec<String>,
    /// Name of the obstacle hit, if any
    pub fatal: Option<String>,
}

impl SweepReport {
    /// Whether nothing was hit
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.fatal.is_none()
    }
}

/// Actor-against-world AABB sweep
pub struct CollisionSweep;

impl CollisionSweep {
    /// Sweep `actor` against every other collidable in `registry`
    ///
    /// Fuel and currency hits are removed from the registry. An obstacle hit
    /// (or a collidable without a pickup class) is recorded as fatal and kept
    /// in the registry; pickups overlapping in the same tick are still consumed.
    pub fn run(registry: &mut SceneRegistry, actor: NodeKey) -> SweepReport {
        let mut report = SweepReport::default();

        let Some(actor_boxes) = registry.node(actor).map(|node| node.world_bounding_boxes()) else {
            log::warn!("Collision sweep skipped, actor is not in the registry");
            return report;
        };

        let candidates: Vec<NodeKey> = registry
            .collidable_keys()
            .into_iter()
            .filter(|&key| key != actor)
            .collect();

        for key in candidates {
            // Skip anything removed earlier in this sweep
            let Some(node) = registry.node(key) else {
                continue;
            };
            if !Self::any_overlap(&actor_boxes, &node.world_bounding_boxes()) {
                continue;
            }

            let class = node.collision_class();
            match class {
                Some(CollisionClass::Fuel | CollisionClass::Currency) => {
                    let Some((name, _)) = registry.remove_key(key) else {
                        continue;
                    };
                    log::debug!("Consumed {name}");
                    if class == Some(CollisionClass::Fuel) {
                        report.fuel_pickups += 1;
                    } else {
                        report.currency_pickups += 1;
                    }
                    report.consumed.push(name);
                }
                Some(CollisionClass::Obstacle) | None => {
                    let name = registry.name_of(key).unwrap_or_default();
                    log::info!("Fatal collision with {name}");
                    if !matches!(report.fatal.as_deref(), Some(current) if current <= name) {
                        report.fatal = Some(name.to_string());
                    }
                }
            }
        }

        report.consumed.sort_unstable();
        if !report.is_empty() {
            log::trace!("Sweep report: {report:?}");
        }
        report
    }

    /// Whether any box of `a` overlaps any box of `b`
    pub fn any_overlap(a: &[Aabb], b: &[Aabb]) -> bool {
        a.iter().any(|lhs| b.iter().any(|rhs| lhs.intersects(rhs)))
    }
}
