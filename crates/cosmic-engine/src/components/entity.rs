use std::collections::BTreeMap;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::api::types::{EntityId, EntityKind};
use crate::components::light::LightComponent;
use crate::components::mesh::{Geometry, Material};
use crate::components::starfield::StarField;

/// Position, Euler rotation (XYZ order) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    pub fn quat(&self) -> Quat {
        euler_quat(self.rotation)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
pub(crate) fn euler_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

/// A value in an entity's free-form attribute bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Float(f32),
    Vec3(Vec3),
    Text(String),
}

/// Well-known attribute keys.
pub mod attr {
    /// Light intensity of a lit body, read by the illumination client.
    pub const LIGHT_INTENSITY: &str = "lightIntensity";
    /// Manifest position before any scroll-driven drift.
    pub const BASE_POSITION: &str = "basePosition";
    /// Per-body drift drawn once when the timeline is bound.
    pub const SCROLL_OFFSET: &str = "scrollOffset";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<String, Attribute>,
}

impl Attributes {
    pub fn set(&mut self, key: impl Into<String>, value: Attribute) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.values.get(key)
    }

    pub fn float(&self, key: &str) -> Option<f32> {
        match self.values.get(key) {
            Some(Attribute::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vec3(&self, key: &str) -> Option<Vec3> {
        match self.values.get(key) {
            Some(Attribute::Vec3(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Attribute::Text(v)) => Some(v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fat Entity: a single struct with optional components.
///
/// The transform is split in two: `pose` is written only by the timeline
/// and is a pure function of scroll progress, `spin` accumulates idle
/// rotation from the render loop. The drawn rotation is their sum.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Stable manifest name, e.g. "hero-planet".
    pub name: String,
    pub kind: EntityKind,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Scroll-driven transform.
    pub pose: Transform,
    /// Accumulated idle rotation (Euler, radians).
    pub spin: Vec3,
    pub geometry: Geometry,
    pub material: Option<Material>,
    pub light: Option<LightComponent>,
    pub stars: Option<StarField>,
    pub attributes: Attributes,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            name: String::new(),
            kind,
            active: true,
            pose: Transform::IDENTITY,
            spin: Vec3::ZERO,
            geometry: Geometry::None,
            material: None,
            light: None,
            stars: None,
            attributes: Attributes::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.pose.rotation = rotation;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_light(mut self, light: LightComponent) -> Self {
        self.light = Some(light);
        self
    }

    pub fn with_stars(mut self, stars: StarField) -> Self {
        self.stars = Some(stars);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Attribute) -> Self {
        self.attributes.set(key, value);
        self
    }

    // -- Derived state --

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Rotation as drawn: timeline pose plus idle spin.
    pub fn rotation(&self) -> Vec3 {
        self.pose.rotation + self.spin
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.pose.scale,
            euler_quat(self.rotation()),
            self.pose.position,
        )
    }

    /// `lightIntensity` attribute, 1.0 when absent.
    pub fn light_intensity(&self) -> f32 {
        self.attributes.float(attr::LIGHT_INTENSITY).unwrap_or(1.0)
    }

    /// `basePosition` attribute, falling back to the current position.
    pub fn base_position(&self) -> Vec3 {
        self.attributes
            .vec3(attr::BASE_POSITION)
            .unwrap_or(self.pose.position)
    }
}
