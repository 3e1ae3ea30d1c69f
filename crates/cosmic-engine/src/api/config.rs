use serde::{Deserialize, Serialize};

/// Linear opacity falloff with distance to the camera.
///
/// `opacity = clamp(1 - (distance - near) / range, floor, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    pub near: f32,
    pub range: f32,
    pub floor: f32,
}

impl Falloff {
    pub const fn new(near: f32, range: f32, floor: f32) -> Self {
        Self { near, range, floor }
    }

    pub fn opacity(&self, distance: f32) -> f32 {
        if self.range <= 0.0 {
            return if distance <= self.near { 1.0 } else { self.floor };
        }
        (1.0 - (distance - self.near) / self.range).clamp(self.floor, 1.0)
    }
}

/// Engine-wide constants. Every field has a default, so a host can
/// override a handful of values with a partial JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scroll distance (px) mapped onto timeline progress 0..1.
    pub scroll_window: f32,
    /// Seconds the play-head lags behind the scroll target. 0 = no smoothing.
    pub scrub_lag: f32,
    /// Per-overlay leading-edge throttle window for adjustment requests.
    pub adjust_cooldown_ms: f64,
    /// In-flight adjustment requests older than this are aborted.
    pub adjust_timeout_ms: f64,
    pub overlay_falloff: Falloff,
    pub join_falloff: Falloff,
    /// Join form accepts pointer input above this opacity.
    pub join_interactive_opacity: f32,
    /// Scroll hint is visible while the scroll offset is at or below this.
    pub scroll_hint_threshold: f32,

    pub star_count: usize,
    pub star_half_extent: f32,
    pub star_size: f32,
    pub star_opacity: f32,

    /// Full width of the per-axis random drift applied to lit bodies.
    pub body_drift: f32,
    /// Full width of the depth jitter applied to gallery planes.
    pub gallery_jitter: f32,

    pub camera_fov_deg: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_start_z: f32,
    pub camera_end_z: f32,
    /// Camera yaw at the end of the journey, in radians.
    pub camera_end_yaw: f32,
    pub point_light_end: [f32; 3],

    /// Radians added to each lit body's yaw every frame.
    pub body_spin: f32,
    /// Radians added to the star field's yaw every frame.
    pub star_spin: f32,

    pub seed: u64,
    pub max_instances: usize,
    pub max_overlays: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll_window: 6000.0,
            scrub_lag: 1.5,
            adjust_cooldown_ms: 500.0,
            adjust_timeout_ms: 5000.0,
            overlay_falloff: Falloff::new(10.0, 15.0, 0.1),
            join_falloff: Falloff::new(10.0, 10.0, 0.0),
            join_interactive_opacity: 0.5,
            scroll_hint_threshold: 100.0,
            star_count: 10_000,
            star_half_extent: 100.0,
            star_size: 0.05,
            star_opacity: 0.8,
            body_drift: 10.0,
            gallery_jitter: 4.0,
            camera_fov_deg: 75.0,
            camera_near: 0.1,
            camera_far: 1000.0,
            camera_start_z: 15.0,
            camera_end_z: -105.0,
            camera_end_yaw: std::f32::consts::PI * 0.1,
            point_light_end: [-20.0, -5.0, -40.0],
            body_spin: 0.0005,
            star_spin: 0.0001,
            seed: 42,
            max_instances: 64,
            max_overlays: 16,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "scroll_window": 3000, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.scroll_window, 3000.0);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.adjust_cooldown_ms, 500.0);
        assert_eq!(cfg.overlay_falloff, Falloff::new(10.0, 15.0, 0.1));
    }

    #[test]
    fn falloff_boundaries() {
        let f = Falloff::new(10.0, 15.0, 0.1);
        assert_eq!(f.opacity(0.0), 1.0);
        assert_eq!(f.opacity(10.0), 1.0);
        assert_eq!(f.opacity(25.0), 0.1);
        assert_eq!(f.opacity(400.0), 0.1);
        assert!((f.opacity(17.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn join_falloff_reaches_zero() {
        let f = EngineConfig::default().join_falloff;
        assert_eq!(f.opacity(20.0), 0.0);
        assert_eq!(f.opacity(30.0), 0.0);
    }
}
