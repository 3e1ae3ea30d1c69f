//! Pointer picking: cast a ray from the camera through the pointer and
//! return the nearest pickable picture plane it hits.

use glam::{Vec2, Vec3};

use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::components::mesh::Geometry;
use crate::core::scene::Scene;
use crate::renderer::camera::{PerspectiveCamera, Ray};

const PARALLEL_EPSILON: f32 = 1e-6;

/// Entity under the pointer (surface pixels), nearest first hit only.
/// Entities outside `pickables` are ignored even if they occlude.
pub fn pick(pointer: Vec2, camera: &PerspectiveCamera, scene: &Scene, pickables: &[EntityId]) -> Option<EntityId> {
    let ray = camera.ray_through(camera.pixels_to_ndc(pointer));
    let mut nearest: Option<(EntityId, f32)> = None;
    for entity in pickables.iter().filter_map(|&id| scene.get(id)) {
        if !entity.active {
            continue;
        }
        let Some(t) = intersect_plane(&ray, entity) else {
            continue;
        };
        if nearest.map_or(true, |(_, best)| t < best) {
            nearest = Some((entity.id, t));
        }
    }
    nearest.map(|(id, _)| id)
}

/// Distance along `ray` to the entity's plane quad, if the ray crosses it.
/// The quad lies in local XY and is hit from either side.
pub fn intersect_plane(ray: &Ray, entity: &Entity) -> Option<f32> {
    let Geometry::Plane { width, height } = entity.geometry else {
        return None;
    };
    let to_local = entity.world_matrix().inverse();
    let origin = to_local.transform_point3(ray.origin);
    let dir = to_local.transform_vector3(ray.direction);

    if dir.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -origin.z / dir.z;
    if t < 0.0 {
        return None;
    }
    let hit: Vec3 = origin + dir * t;
    if hit.x.abs() <= width * 0.5 && hit.y.abs() <= height * 0.5 {
        Some(t)
    } else {
        None
    }
}
