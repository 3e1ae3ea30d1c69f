use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec2, Vec3};

use crate::components::entity::euler_quat;

/// Perspective camera for the 3D journey.
/// Right-handed, looking down -Z at zero rotation, GL clip conventions.
///
/// Mutated only by the timeline; everything else reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Output size in pixels.
    pub viewport: Vec2,
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// xyz = world position, w = unused.
    pub position: [f32; 4],
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f32, viewport: Vec2, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_deg,
            aspect: 1.0,
            near,
            far,
            viewport: Vec2::ONE,
        };
        camera.resize(viewport.x, viewport.y);
        camera
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Resize the output (e.g. on window resize). Keeps the vertical FOV
    /// and updates the aspect ratio. Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("camera: ignoring degenerate viewport {}x{}", width, height);
            return;
        }
        self.viewport = Vec2::new(width, height);
        self.aspect = width / height;
    }

    pub fn orientation(&self) -> Quat {
        euler_quat(self.rotation)
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Project a world point to normalized device coordinates.
    /// Returns the NDC point and the clip-space w (negative = behind camera).
    pub fn project(&self, point: Vec3) -> (Vec3, f32) {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w.abs() < f32::EPSILON {
            return (Vec3::ZERO, clip.w);
        }
        (clip.truncate() / clip.w, clip.w)
    }

    /// NDC → pixel coordinates. Screen Y grows downward, NDC Y upward.
    pub fn ndc_to_pixels(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) / 2.0 * self.viewport.x,
            (1.0 - ndc.y) / 2.0 * self.viewport.y,
        )
    }

    /// Pixel coordinates → NDC (inverse of `ndc_to_pixels`).
    pub fn pixels_to_ndc(&self, pixels: Vec2) -> Vec2 {
        Vec2::new(
            pixels.x / self.viewport.x * 2.0 - 1.0,
            -(pixels.y / self.viewport.y) * 2.0 + 1.0,
        )
    }

    /// Ray from the camera through an NDC point.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let target = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.position,
            direction: (target - self.position).normalize_or(self.forward()),
        }
    }
}
