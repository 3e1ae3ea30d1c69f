/// Shape of a drawable entity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Geometry {
    /// Not drawn as a mesh (lights, camera).
    #[default]
    None,
    Sphere { radius: f32, segments: u32 },
    /// Flat quad in the local XY plane, centred on the origin.
    Plane { width: f32, height: f32 },
    /// Point cloud; positions live in the entity's `StarField`.
    Points,
}

impl Geometry {
    /// Bounding radius used for the instance scale field.
    pub fn extent(&self) -> f32 {
        match *self {
            Geometry::Sphere { radius, .. } => radius,
            Geometry::Plane { width, height } => width.max(height) * 0.5,
            Geometry::None | Geometry::Points => 1.0,
        }
    }
}

/// A texture the host renderer must load.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    /// Index into `Scene::textures()`.
    pub slot: u32,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    pub texture: TextureRef,
    pub scale: f32,
}

/// Appearance descriptor. Textures are optional everywhere: a missing
/// texture leaves the material untextured instead of failing the build.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Lit PBR-style surface used by planets and moons.
    Standard {
        color: [f32; 3],
        roughness: f32,
        metalness: f32,
        map: Option<TextureRef>,
        displacement: Option<Displacement>,
    },
    /// Unlit surface used by gallery planes.
    Basic {
        map: Option<TextureRef>,
        double_sided: bool,
    },
    Points {
        size: f32,
        color: [f32; 3],
        opacity: f32,
    },
}

impl Material {
    /// Numeric code written into the render instance buffer.
    pub fn code(&self) -> f32 {
        match self {
            Material::Standard { .. } => 0.0,
            Material::Basic { .. } => 1.0,
            Material::Points { .. } => 2.0,
        }
    }

    pub fn map(&self) -> Option<&TextureRef> {
        match self {
            Material::Standard { map, .. } | Material::Basic { map, .. } => map.as_ref(),
            Material::Points { .. } => None,
        }
    }

    pub fn is_textured(&self) -> bool {
        self.map().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_extent_is_half_longest_side() {
        let g = Geometry::Plane { width: 4.0, height: 3.0 };
        assert_eq!(g.extent(), 2.0);
    }

    #[test]
    fn untextured_material_reports_no_map() {
        let m = Material::Basic { map: None, double_sided: true };
        assert!(!m.is_textured());
        let m = Material::Basic {
            map: Some(TextureRef { slot: 0, url: "a.png".into() }),
            double_sided: true,
        };
        assert_eq!(m.map().map(|t| t.slot), Some(0));
    }
}
