// timeline/easing.rs
//
// Quadratic easing curves for keyframe tracks.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// power1.out, the default for tracks that name no curve.
    #[default]
    QuadOut,
    /// power1.inOut, used on the dominant camera tracks.
    QuadInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Both curves are monotonic and map 0 to 0 and 1 to 1.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Interpolate Vec3 with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    a.lerp(b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 2] = [Easing::QuadOut, Easing::QuadInOut];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", easing);
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut prev = easing.apply(0.0);
            for i in 1..=200 {
                let v = easing.apply(i as f32 / 200.0);
                assert!(v >= prev - 1e-6, "{:?} decreased at step {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(Easing::QuadOut.apply(-0.5), 0.0);
        assert_eq!(Easing::QuadInOut.apply(1.5), 1.0);
    }

    #[test]
    fn quad_in_out_is_symmetric() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::QuadInOut.apply(0.2);
        let b = Easing::QuadInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_vec3_interpolates() {
        let v = ease_vec3(Vec3::ZERO, Vec3::new(10.0, 20.0, -30.0), 0.5, Easing::QuadOut);
        assert!((v - Vec3::new(7.5, 15.0, -22.5)).length() < 1e-5);
    }
}
