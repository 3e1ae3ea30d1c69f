use glam::Vec3;

use crate::core::rng::Rng;

/// Procedural point cloud, sampled once at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct StarField {
    pub positions: Vec<Vec3>,
}

impl StarField {
    /// Sample `count` points uniformly in a cube of the given half-extent.
    pub fn generate(count: usize, half_extent: f32, rng: &mut Rng) -> Self {
        let width = half_extent * 2.0;
        let positions = (0..count).map(|_| rng.centered_vec3(width)).collect();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` slice for upload.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_inside_cube() {
        let mut rng = Rng::new(5);
        let stars = StarField::generate(2000, 100.0, &mut rng);
        assert_eq!(stars.len(), 2000);
        assert!(stars.positions.iter().all(|p| p.abs().max_element() <= 100.0));
    }

    #[test]
    fn flat_view_has_three_floats_per_star() {
        let mut rng = Rng::new(5);
        let stars = StarField::generate(10, 1.0, &mut rng);
        let flat = stars.as_floats();
        assert_eq!(flat.len(), 30);
        assert_eq!(flat[3], stars.positions[1].x);
    }
}
