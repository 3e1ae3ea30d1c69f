// timeline/mod.rs
//
// Scroll-scrubbed keyframe timeline. Every track runs from progress 0 to
// progress 1; the play-head is set from the scroll offset, never from
// elapsed time, so scrolling backward replays the journey in reverse.

pub mod easing;
pub mod scrub;
pub mod track;

pub use easing::{ease_vec3, Easing};
pub use scrub::{ScrollWindow, ScrubState};
pub use track::{Track, TrackProperty, TrackSubject};

use std::f32::consts::PI;

use glam::Vec3;

use crate::api::config::EngineConfig;
use crate::components::entity::{attr, Attribute};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::renderer::camera::PerspectiveCamera;
use crate::systems::builder::SceneHandles;

/// End rotation of every lit body (x, y).
const BODY_END_ROTATION: Vec3 = Vec3::new(PI * 0.5, PI * 2.0, 0.0);

pub struct Timeline {
    tracks: Vec<Track>,
    window: ScrollWindow,
    scrub: ScrubState,
    /// Progress last applied to the scene.
    applied: Option<f32>,
}

impl Timeline {
    /// Build the journey's tracks from the scene's start state.
    ///
    /// Each lit body's random drift is drawn here, once, and recorded on
    /// the entity as `scrollOffset`, so repeated scrubbing is deterministic.
    pub fn bind(
        scene: &mut Scene,
        camera: &PerspectiveCamera,
        handles: &SceneHandles,
        config: &EngineConfig,
        rng: &mut Rng,
    ) -> Self {
        let mut tracks = Vec::new();

        let camera_end = Vec3::new(camera.position.x, camera.position.y, config.camera_end_z);
        tracks.push(
            Track::position(TrackSubject::Camera, camera.position, camera_end)
                .with_easing(Easing::QuadInOut),
        );
        let yaw_end = Vec3::new(camera.rotation.x, config.camera_end_yaw, camera.rotation.z);
        tracks.push(
            Track::rotation(TrackSubject::Camera, camera.rotation, yaw_end)
                .with_easing(Easing::QuadInOut),
        );

        for &id in &handles.bodies {
            let Some(body) = scene.get_mut(id) else {
                log::warn!("timeline: body {:?} not in scene", id);
                continue;
            };
            let offset = rng.centered_vec3(config.body_drift);
            body.attributes.set(attr::SCROLL_OFFSET, Attribute::Vec3(offset));

            let rotation_end = Vec3::new(BODY_END_ROTATION.x, BODY_END_ROTATION.y, body.pose.rotation.z);
            tracks.push(Track::rotation(TrackSubject::Entity(id), body.pose.rotation, rotation_end));

            let base = body.base_position();
            tracks.push(Track::position(TrackSubject::Entity(id), base, base + offset));
        }

        if let Some(id) = handles.point_light {
            if let Some(light) = scene.get(id) {
                let base = light.base_position();
                let end = Vec3::from_array(config.point_light_end);
                tracks.push(Track::position(TrackSubject::Entity(id), base, end));
            }
        }

        log::debug!("timeline: bound {} tracks", tracks.len());

        Self {
            tracks,
            window: ScrollWindow::new(config.scroll_window),
            scrub: ScrubState::new(config.scrub_lag),
            applied: None,
        }
    }

    /// Record a new scroll offset. Takes effect through `advance`.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scrub.set_target(self.window.progress(offset));
    }

    /// Move the smoothed play-head one frame and apply it if it changed.
    /// Returns whether any transform was written.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene, camera: &mut PerspectiveCamera) -> bool {
        let progress = self.scrub.advance(dt);
        if self.applied == Some(progress) {
            return false;
        }
        self.seek(progress, scene, camera);
        true
    }

    /// Write every track's value at `progress`. Pure in `progress`: the
    /// same progress always produces the same transforms.
    pub fn seek(&mut self, progress: f32, scene: &mut Scene, camera: &mut PerspectiveCamera) {
        let progress = progress.clamp(0.0, 1.0);
        for track in &self.tracks {
            let value = track.sample(progress);
            match (track.subject, track.property) {
                (TrackSubject::Camera, TrackProperty::Position) => camera.position = value,
                (TrackSubject::Camera, TrackProperty::Rotation) => camera.rotation = value,
                (TrackSubject::Entity(id), property) => {
                    if let Some(entity) = scene.get_mut(id) {
                        match property {
                            TrackProperty::Position => entity.pose.position = value,
                            TrackProperty::Rotation => entity.pose.rotation = value,
                        }
                    }
                }
            }
        }
        // mirror the camera into its scene entity for name-index readers
        if let Some(entity) = scene.by_name_mut(crate::systems::builder::CAMERA) {
            entity.pose.position = camera.position;
            entity.pose.rotation = camera.rotation;
        }
        self.applied = Some(progress);
    }

    pub fn window(&self) -> ScrollWindow {
        self.window
    }

    /// Raw scroll-derived progress (before smoothing).
    pub fn target_progress(&self) -> f32 {
        self.scrub.target()
    }

    /// Progress currently applied to the scene.
    pub fn progress(&self) -> f32 {
        self.applied.unwrap_or(0.0)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::ContentCatalog;
    use crate::assets::manifest::{BodyDescriptor, SceneManifest};
    use crate::systems::builder::{self, SceneGraph, POINT_LIGHT};
    use glam::Vec2;

    fn setup(seed: u64) -> (SceneGraph, Timeline) {
        let config = EngineConfig {
            star_count: 10,
            scrub_lag: 0.0,
            seed,
            ..EngineConfig::default()
        };
        let manifest = SceneManifest {
            bodies: vec![
                BodyDescriptor::new("hero-planet", 5.0, Vec3::ZERO),
                BodyDescriptor::new("events-planet", 4.0, Vec3::new(15.0, 5.0, -50.0)),
            ],
            gallery: Vec::new(),
            overlays: Vec::new(),
            join_anchor: None,
        };
        let mut rng = Rng::new(seed);
        let mut graph = builder::build(&manifest, &ContentCatalog::new(), &config, Vec2::new(800.0, 600.0), &mut rng);
        let timeline = Timeline::bind(&mut graph.scene, &graph.camera, &graph.handles, &config, &mut rng);
        (graph, timeline)
    }

    fn snapshot(graph: &SceneGraph) -> Vec<Vec3> {
        let mut out = vec![graph.camera.position, graph.camera.rotation];
        for e in graph.scene.iter() {
            out.push(e.pose.position);
            out.push(e.pose.rotation);
        }
        out
    }

    #[test]
    fn endpoints_match_keyframes() {
        let (mut graph, mut timeline) = setup(1);
        timeline.seek(1.0, &mut graph.scene, &mut graph.camera);
        assert!((graph.camera.position.z - -105.0).abs() < 1e-3);
        assert!((graph.camera.rotation.y - PI * 0.1).abs() < 1e-5);

        let light = graph.scene.by_name(POINT_LIGHT).unwrap();
        assert!((light.position() - Vec3::new(-20.0, -5.0, -40.0)).length() < 1e-4);

        let hero = graph.scene.by_name("hero-planet").unwrap();
        let offset = hero.attributes.vec3(attr::SCROLL_OFFSET).unwrap();
        assert!((hero.position() - offset).length() < 1e-4);
        assert!((hero.pose.rotation - BODY_END_ROTATION).length() < 1e-4);

        timeline.seek(0.0, &mut graph.scene, &mut graph.camera);
        assert_eq!(graph.camera.position, Vec3::new(0.0, 0.0, 15.0));
        let hero = graph.scene.by_name("hero-planet").unwrap();
        assert_eq!(hero.position(), Vec3::ZERO);
    }

    #[test]
    fn scrubbing_is_reversible() {
        let (mut graph, mut timeline) = setup(2);
        timeline.seek(0.37, &mut graph.scene, &mut graph.camera);
        let first = snapshot(&graph);

        for p in [0.9, 0.05, 1.0, 0.0, 0.6] {
            timeline.seek(p, &mut graph.scene, &mut graph.camera);
        }
        timeline.seek(0.37, &mut graph.scene, &mut graph.camera);
        assert_eq!(snapshot(&graph), first);
    }

    #[test]
    fn transforms_are_continuous() {
        let (mut graph, mut timeline) = setup(3);
        timeline.seek(0.0, &mut graph.scene, &mut graph.camera);
        let mut prev = snapshot(&graph);
        for i in 1..=1000 {
            timeline.seek(i as f32 / 1000.0, &mut graph.scene, &mut graph.camera);
            let now = snapshot(&graph);
            for (a, b) in prev.iter().zip(&now) {
                // largest track delta is 120 units; no single step may jump
                assert!((*a - *b).length() < 0.5, "jump at step {}", i);
            }
            prev = now;
        }
    }

    #[test]
    fn camera_depth_is_monotonic() {
        let (mut graph, mut timeline) = setup(4);
        let mut last_z = f32::INFINITY;
        for i in 0..=100 {
            timeline.seek(i as f32 / 100.0, &mut graph.scene, &mut graph.camera);
            assert!(graph.camera.position.z <= last_z);
            last_z = graph.camera.position.z;
        }
    }

    #[test]
    fn drift_is_seeded() {
        let (graph_a, _) = setup(11);
        let (graph_b, _) = setup(11);
        let a = graph_a.scene.by_name("events-planet").unwrap().attributes.vec3(attr::SCROLL_OFFSET);
        let b = graph_b.scene.by_name("events-planet").unwrap().attributes.vec3(attr::SCROLL_OFFSET);
        assert!(a.is_some());
        assert_eq!(a, b);
        assert!(a.unwrap().abs().max_element() <= 5.0);
    }

    #[test]
    fn scroll_to_drives_progress() {
        let (mut graph, mut timeline) = setup(5);
        timeline.scroll_to(3000.0);
        assert_eq!(timeline.target_progress(), 0.5);
        assert!(timeline.advance(0.016, &mut graph.scene, &mut graph.camera));
        assert_eq!(timeline.progress(), 0.5);
        // nothing new to apply
        assert!(!timeline.advance(0.016, &mut graph.scene, &mut graph.camera));
    }

    #[test]
    fn camera_entity_mirrors_camera() {
        let (mut graph, mut timeline) = setup(6);
        timeline.seek(0.5, &mut graph.scene, &mut graph.camera);
        let entity = graph.scene.by_name(crate::systems::builder::CAMERA).unwrap();
        assert_eq!(entity.position(), graph.camera.position);
    }
}
