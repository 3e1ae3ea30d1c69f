// timeline/track.rs
//
// A keyframe track: one property of one subject, interpolated from a start
// keyframe at progress 0 to an end keyframe at progress 1.

use glam::Vec3;

use crate::api::types::EntityId;
use super::easing::{ease_vec3, Easing};

/// What a track writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSubject {
    Camera,
    Entity(EntityId),
}

/// Which property a track animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackProperty {
    Position,
    /// Euler rotation (XYZ), radians.
    Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub subject: TrackSubject,
    pub property: TrackProperty,
    /// Value at progress 0.
    pub from: Vec3,
    /// Value at progress 1.
    pub to: Vec3,
    pub easing: Easing,
}

impl Track {
    pub fn position(subject: TrackSubject, from: Vec3, to: Vec3) -> Self {
        Self {
            subject,
            property: TrackProperty::Position,
            from,
            to,
            easing: Easing::default(),
        }
    }

    pub fn rotation(subject: TrackSubject, from: Vec3, to: Vec3) -> Self {
        Self {
            subject,
            property: TrackProperty::Rotation,
            from,
            to,
            easing: Easing::default(),
        }
    }

    // -- Builder methods --

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value at `progress` (clamped to [0, 1]).
    pub fn sample(&self, progress: f32) -> Vec3 {
        ease_vec3(self.from, self.to, progress, self.easing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_hits_keyframes() {
        let track = Track::position(TrackSubject::Camera, Vec3::Z * 15.0, Vec3::Z * -105.0)
            .with_easing(Easing::QuadInOut);
        assert_eq!(track.sample(0.0), Vec3::Z * 15.0);
        assert!((track.sample(1.0) - Vec3::Z * -105.0).length() < 1e-4);
        assert!((track.sample(0.5).z - -45.0).abs() < 1e-4);
    }

    #[test]
    fn sample_clamps_out_of_range_progress() {
        let track = Track::rotation(TrackSubject::Entity(EntityId(3)), Vec3::ZERO, Vec3::ONE);
        assert_eq!(track.sample(-1.0), Vec3::ZERO);
        assert!((track.sample(2.0) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn default_easing_is_quad_out() {
        let track = Track::position(TrackSubject::Camera, Vec3::ZERO, Vec3::X);
        assert_eq!(track.easing, Easing::QuadOut);
        assert!(track.sample(0.5).x > 0.5);
    }
}
