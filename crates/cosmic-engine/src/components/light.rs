//! Light emitters attached to entities.

/// A light attached to an entity. Positional lights take the entity's
/// position; ambient lights have none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightComponent {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Falloff distance in world units. `None` for ambient light.
    pub range: Option<f32>,
}

impl LightComponent {
    pub fn ambient(color: [f32; 3], intensity: f32) -> Self {
        Self { color, intensity, range: None }
    }

    pub fn point(color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self { color, intensity, range: Some(range) }
    }

    pub fn is_ambient(&self) -> bool {
        self.range.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_has_no_range() {
        assert!(LightComponent::ambient([1.0; 3], 0.2).is_ambient());
        assert!(!LightComponent::point([1.0; 3], 2.0, 200.0).is_ambient());
    }
}
