use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Declarative description of a journey: the bodies, gallery images and
/// narrative overlays to build. Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Lit bodies in manifest order. Order matters: nearest-body ties
    /// resolve to the earlier entry.
    pub bodies: Vec<BodyDescriptor>,
    /// Catalog ids of gallery images, one picture plane each.
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub overlays: Vec<OverlayDescriptor>,
    /// World-space anchor of the join form, if the page has one.
    #[serde(default)]
    pub join_anchor: Option<Vec3>,
}

/// A planet or moon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub id: String,
    /// Sphere radius in world units.
    pub size: f32,
    pub position: Vec3,
    /// Catalog id of the surface texture (default: the body id).
    #[serde(default)]
    pub texture: Option<String>,
    /// Catalog id of a displacement map; turns the body into the rough variant.
    #[serde(default)]
    pub displacement: Option<String>,
    #[serde(default = "default_intensity")]
    pub light_intensity: f32,
}

impl BodyDescriptor {
    pub fn new(id: impl Into<String>, size: f32, position: Vec3) -> Self {
        Self {
            id: id.into(),
            size,
            position,
            texture: None,
            displacement: None,
            light_intensity: default_intensity(),
        }
    }

    pub fn texture_id(&self) -> &str {
        self.texture.as_deref().unwrap_or(&self.id)
    }
}

/// A narrative section rendered as 2D UI over the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayDescriptor {
    pub id: String,
    pub title: String,
    /// Body markup; opaque to the engine.
    #[serde(default)]
    pub body: String,
    pub base_font_size: f32,
    pub anchor: Vec3,
}

impl OverlayDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, base_font_size: f32, anchor: Vec3) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            base_font_size,
            anchor,
        }
    }
}

fn default_intensity() -> f32 {
    1.0
}

impl SceneManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
