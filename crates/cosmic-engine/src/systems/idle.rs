//! Idle motion: slow constant rotation of lit bodies and the star field.
//!
//! Accumulates into `Entity::spin`, never into the timeline pose, so the
//! scrubbed transforms stay a pure function of progress.

use glam::Vec3;

use crate::api::types::EntityKind;
use crate::core::scene::Scene;

/// Reference frame length the per-frame increments are defined for.
const REFERENCE_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleSpin {
    /// Radians per reference frame around Y for lit bodies.
    pub body: f32,
    /// Radians per reference frame around Y for the star field.
    pub stars: f32,
}

impl IdleSpin {
    pub fn new(body: f32, stars: f32) -> Self {
        Self { body, stars }
    }

    /// Advance one frame. `dt` in seconds scales the constant per-frame
    /// increment so a 30 Hz display spins at the same speed as a 60 Hz one.
    pub fn tick(&self, scene: &mut Scene, dt: f32) {
        let frames = dt.max(0.0) / REFERENCE_DT;
        for entity in scene.iter_mut() {
            let rate = match entity.kind {
                EntityKind::LitBody => self.body,
                EntityKind::StarField => self.stars,
                _ => continue,
            };
            entity.spin += Vec3::Y * rate * frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::entity::Entity;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1), EntityKind::LitBody).with_name("planet"));
        scene.spawn(Entity::new(EntityId(2), EntityKind::StarField).with_name("stars"));
        scene.spawn(Entity::new(EntityId(3), EntityKind::PicturePlane).with_name("plane"));
        scene
    }

    #[test]
    fn spins_bodies_and_stars_only() {
        let mut scene = scene();
        let spin = IdleSpin::new(0.0005, 0.0001);
        for _ in 0..60 {
            spin.tick(&mut scene, REFERENCE_DT);
        }
        let planet = scene.by_name("planet").unwrap();
        assert!((planet.spin.y - 0.03).abs() < 1e-5);
        let stars = scene.by_name("stars").unwrap();
        assert!((stars.spin.y - 0.006).abs() < 1e-6);
        assert_eq!(scene.by_name("plane").unwrap().spin, Vec3::ZERO);
    }

    #[test]
    fn spin_does_not_touch_pose() {
        let mut scene = scene();
        IdleSpin::new(0.1, 0.1).tick(&mut scene, REFERENCE_DT);
        let planet = scene.by_name("planet").unwrap();
        assert_eq!(planet.pose.rotation, Vec3::ZERO);
        assert!((planet.rotation().y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn frame_rate_independent() {
        let mut a = scene();
        let mut b = scene();
        let spin = IdleSpin::new(0.0005, 0.0001);
        for _ in 0..60 {
            spin.tick(&mut a, 1.0 / 60.0);
        }
        for _ in 0..30 {
            spin.tick(&mut b, 1.0 / 30.0);
        }
        let ya = a.by_name("planet").unwrap().spin.y;
        let yb = b.by_name("planet").unwrap().spin.y;
        assert!((ya - yb).abs() < 1e-6);
    }
}
