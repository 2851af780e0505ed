//! Headless ray-cast backend: rays against sphere colliders
//!
//! Enough for the headless runner, tests and server-side validation.
//! Engine builds plug their physics in through `RayCaster` instead.

use bevy::prelude::*;

use super::hit::{HitResult, RayCaster};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
    /// Collision layers (bitmask tested against the weapon's mask)
    pub layers: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SphereRayCaster {
    colliders: Vec<SphereCollider>,
}

impl SphereRayCaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collider(mut self, entity: Entity, center: Vec3, radius: f32, layers: u32) -> Self {
        self.insert(entity, center, radius, layers);
        self
    }

    /// Add or replace the collider of `entity`
    pub fn insert(&mut self, entity: Entity, center: Vec3, radius: f32, layers: u32) {
        self.remove(entity);
        self.colliders.push(SphereCollider {
            entity,
            center,
            radius,
            layers,
        });
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|collider| collider.entity != entity);
        self.colliders.len() != before
    }

    pub fn colliders(&self) -> &[SphereCollider] {
        &self.colliders
    }

    /// Distance along the (unit) ray to the first surface hit, if any
    fn intersect(collider: &SphereCollider, origin: Vec3, direction: Vec3) -> Option<f32> {
        let offset = origin - collider.center;
        let b = offset.dot(direction);
        let c = offset.length_squared() - collider.radius * collider.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        // Origin inside the sphere → exit point
        let distance = if near >= 0.0 { near } else { -b + root };
        (distance >= 0.0).then_some(distance)
    }
}

impl RayCaster for SphereRayCaster {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        collision_mask: u32,
    ) -> HitResult<Entity> {
        let Some(direction) = direction.try_normalize() else {
            return HitResult::miss();
        };

        let nearest = self
            .colliders
            .iter()
            .filter(|collider| collider.layers & collision_mask != 0)
            .filter_map(|collider| {
                Self::intersect(collider, origin, direction).map(|distance| (collider, distance))
            })
            .filter(|(_, distance)| *distance <= max_range)
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        match nearest {
            Some((collider, distance)) => {
                let position = origin + direction * distance;
                let normal = (position - collider.center).try_normalize().unwrap_or(-direction);
                HitResult::hit(position, normal, collider.entity)
            }
            None => HitResult::miss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_hits_nearest_sphere() {
        let caster = SphereRayCaster::new()
            .with_collider(entity(1), Vec3::new(0.0, 0.0, 10.0), 1.0, 1)
            .with_collider(entity(2), Vec3::new(0.0, 0.0, 5.0), 1.0, 1);

        let hit = caster.cast_ray(Vec3::ZERO, Vec3::Z, 100.0, 1);

        assert!(hit.did_hit);
        assert_eq!(hit.target, Some(entity(2)));
        assert!((hit.position - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_respects_range() {
        let caster = SphereRayCaster::new().with_collider(entity(1), Vec3::new(0.0, 0.0, 50.0), 1.0, 1);

        assert!(!caster.cast_ray(Vec3::ZERO, Vec3::Z, 10.0, 1).did_hit);
        assert!(caster.cast_ray(Vec3::ZERO, Vec3::Z, 49.0, 1).did_hit);
    }

    #[test]
    fn test_respects_collision_mask() {
        let caster = SphereRayCaster::new().with_collider(entity(1), Vec3::new(0.0, 0.0, 5.0), 1.0, 0b10);

        assert!(!caster.cast_ray(Vec3::ZERO, Vec3::Z, 100.0, 0b01).did_hit);
        assert!(caster.cast_ray(Vec3::ZERO, Vec3::Z, 100.0, 0b11).did_hit);
    }

    #[test]
    fn test_behind_origin_and_zero_direction_miss() {
        let caster = SphereRayCaster::new().with_collider(entity(1), Vec3::new(0.0, 0.0, -5.0), 1.0, 1);

        assert!(!caster.cast_ray(Vec3::ZERO, Vec3::Z, 100.0, 1).did_hit);
        assert!(!caster.cast_ray(Vec3::ZERO, Vec3::ZERO, 100.0, 1).did_hit);
    }

    #[test]
    fn test_insert_replaces_and_remove() {
        let mut caster = SphereRayCaster::new();
        caster.insert(entity(1), Vec3::new(0.0, 0.0, 5.0), 1.0, 1);
        caster.insert(entity(1), Vec3::new(0.0, 0.0, 8.0), 1.0, 1);
        assert_eq!(caster.colliders().len(), 1);

        assert!(caster.remove(entity(1)));
        assert!(!caster.remove(entity(1)));
        assert!(!caster.cast_ray(Vec3::ZERO, Vec3::Z, 100.0, 1).did_hit);
    }
}
