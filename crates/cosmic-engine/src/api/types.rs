use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// What role an entity plays in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    StarField,
    /// Planet or moon; a light-intensity reference for overlay readability.
    LitBody,
    /// Flat gallery image; the only pickable kind.
    PicturePlane,
    Light,
    Camera,
}

impl EntityKind {
    /// Numeric code written into the render instance buffer.
    pub fn code(self) -> f32 {
        match self {
            EntityKind::StarField => 0.0,
            EntityKind::LitBody => 1.0,
            EntityKind::PicturePlane => 2.0,
            EntityKind::Light => 3.0,
            EntityKind::Camera => 4.0,
        }
    }
}

/// Index of an overlay in manifest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayIndex(pub usize);
