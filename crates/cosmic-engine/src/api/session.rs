//! One mounted journey: the scene, its timeline, the overlays and the
//! collaborators, driven by `tick` once per display frame.
//!
//! Single writer: only `tick` commits transforms. Overlay placement and
//! the illumination client read the scene after the frame's writes.

use futures::future::FutureExt;
use glam::{Vec2, Vec3};

use crate::api::config::EngineConfig;
use crate::api::types::EntityId;
use crate::assets::catalog::{ContentCatalog, ContentEntry};
use crate::assets::manifest::SceneManifest;
use crate::core::pending::PendingSet;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::error::Result;
use crate::forms::join::{submit_join, EmailValidator, JoinOutcome, JoinService};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::traits::Renderer;
use crate::systems::builder::{self, SceneHandles};
use crate::systems::idle::IdleSpin;
use crate::systems::illumination::{IlluminationClient, IlluminationService};
use crate::systems::overlay::{scroll_hint_visible, JoinPlacement, OverlaySet};
use crate::systems::picking::pick;
use crate::systems::render::draw_scene;
use crate::timeline::Timeline;

/// External collaborators a session talks to.
pub struct Services {
    pub illumination: Box<dyn IlluminationService>,
    pub join: Box<dyn JoinService>,
}

pub struct Session<R: Renderer> {
    config: EngineConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    handles: SceneHandles,
    timeline: Timeline,
    catalog: ContentCatalog,
    overlays: OverlaySet,
    join_anchor: Option<Vec3>,
    join_placement: Option<JoinPlacement>,
    illumination: IlluminationClient,
    join_service: Box<dyn JoinService>,
    validator: EmailValidator,
    /// Outcomes tagged with the submission they answer.
    join_pending: PendingSet<(u64, JoinOutcome)>,
    join_submitted: u64,
    join_outcome: Option<JoinOutcome>,
    renderer: R,
    input: InputQueue,
    clock: FrameClock,
    idle: IdleSpin,
    scroll_offset: f32,
    selection: Option<ContentEntry>,
    detached: bool,
}

impl<R: Renderer> Session<R> {
    pub fn new(
        manifest: &SceneManifest,
        catalog: ContentCatalog,
        config: EngineConfig,
        viewport: Vec2,
        mut renderer: R,
        services: Services,
    ) -> Result<Self> {
        let validator = EmailValidator::new()?;
        let mut rng = Rng::new(config.seed);
        let graph = builder::build(manifest, &catalog, &config, viewport, &mut rng);
        let mut scene = graph.scene;
        let mut camera = graph.camera;
        let handles = graph.handles;

        let mut timeline = Timeline::bind(&mut scene, &camera, &handles, &config, &mut rng);
        timeline.seek(0.0, &mut scene, &mut camera);

        let overlays = OverlaySet::from_descriptors(&manifest.overlays, &config.overlay_falloff);
        let illumination = IlluminationClient::new(services.illumination, overlays.len(), &config);
        renderer.resize(viewport.x as u32, viewport.y as u32);

        log::info!(
            "session: mounted with {} entities, {} overlays, renderer '{}'",
            scene.len(),
            overlays.len(),
            renderer.backend()
        );

        Ok(Self {
            idle: IdleSpin::new(config.body_spin, config.star_spin),
            join_anchor: manifest.join_anchor,
            join_placement: None,
            config,
            scene,
            camera,
            handles,
            timeline,
            catalog,
            overlays,
            illumination,
            join_service: services.join,
            validator,
            join_pending: PendingSet::new(),
            join_submitted: 0,
            join_outcome: None,
            renderer,
            input: InputQueue::new(),
            clock: FrameClock::new(),
            scroll_offset: 0.0,
            selection: None,
            detached: false,
        })
    }

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.detached {
            return;
        }
        self.input.push(event);
    }

    pub fn scroll(&mut self, offset: f32) {
        self.push_input(InputEvent::Scroll { offset });
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.push_input(InputEvent::Resize { width, height });
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.push_input(InputEvent::Click { x, y });
    }

    /// Run one display frame of `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.detached {
            return;
        }
        for event in self.input.drain() {
            self.handle_input(event);
        }
        self.clock.advance(dt_ms);
        let dt = self.clock.dt();
        let now_ms = self.clock.now_ms();

        self.timeline.advance(dt, &mut self.scene, &mut self.camera);
        self.idle.tick(&mut self.scene, dt);

        draw_scene(&mut self.renderer, &self.scene, &self.camera);

        self.overlays.place_all(&self.camera, &self.config.overlay_falloff);
        self.join_placement = self
            .join_anchor
            .map(|anchor| JoinPlacement::place(anchor, &self.camera, &self.config));

        self.illumination
            .update(&mut self.overlays, &self.scene, &self.handles.bodies, now_ms);

        for (submission, outcome) in self.join_pending.poll_ready() {
            if submission == self.join_submitted {
                log::info!("join: outcome error={}", outcome.error);
                self.join_outcome = Some(outcome);
            } else {
                log::debug!("join: discarding outcome of superseded submission {}", submission);
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Scroll { offset } => {
                self.scroll_offset = offset;
                self.timeline.scroll_to(offset);
            }
            InputEvent::Resize { width, height } => {
                self.camera.resize(width, height);
                if width > 0.0 && height > 0.0 {
                    self.renderer.resize(width as u32, height as u32);
                }
            }
            InputEvent::Click { x, y } => {
                self.select_at(Vec2::new(x, y));
            }
        }
    }

    /// Pick at a surface pixel and surface the hit's catalog content.
    pub fn select_at(&mut self, pointer: Vec2) -> Option<EntityId> {
        let id = pick(pointer, &self.camera, &self.scene, &self.handles.gallery)?;
        let name = self.scene.get(id).map(|e| e.name.as_str()).unwrap_or_default();
        match self.catalog.get(name) {
            Some(entry) => {
                log::info!("picker: selected '{}'", name);
                self.selection = Some(entry.clone());
            }
            None => log::debug!("picker: '{}' has no catalog content", name),
        }
        Some(id)
    }

    pub fn selection(&self) -> Option<&ContentEntry> {
        self.selection.as_ref()
    }

    /// The detail dialog closed.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Start a join submission; its outcome shows up via
    /// `take_join_outcome` on a later frame. Only the latest submission's
    /// outcome is surfaced.
    pub fn submit_join(&mut self, email: &str) {
        if self.detached {
            return;
        }
        self.join_submitted += 1;
        let submission = self.join_submitted;
        let future = submit_join(email, &self.validator, self.join_service.as_ref())
            .map(move |outcome| (submission, outcome));
        self.join_pending.push(future);
    }

    pub fn take_join_outcome(&mut self) -> Option<JoinOutcome> {
        self.join_outcome.take()
    }

    /// Unmount: free renderer resources and stop every later frame, input
    /// and completion from touching state. In-flight calls are not aborted.
    pub fn teardown(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.illumination.detach();
        self.renderer.release();
        self.input.clear();
        self.scene.clear();
        log::info!("session: torn down after {} frames", self.clock.frames());
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    // -- Read access for the host --

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn join_placement(&self) -> Option<JoinPlacement> {
        self.join_placement
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn scroll_hint_visible(&self) -> bool {
        scroll_hint_visible(self.scroll_offset, self.config.scroll_hint_threshold)
    }

    pub fn illumination(&self) -> &IlluminationClient {
        &self.illumination
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::OverlayIndex;
    use crate::assets::catalog::ContentEntry;
    use crate::assets::manifest::{BodyDescriptor, OverlayDescriptor};
    use crate::error::ServiceError;
    use crate::forms::join::JoinRequest;
    use crate::systems::illumination::{AdjustmentRequest, AdjustmentResponse};
    use crate::systems::render::BufferRenderer;
    use futures::channel::oneshot;
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Reply = oneshot::Sender<std::result::Result<AdjustmentResponse, ServiceError>>;

    #[derive(Clone, Default)]
    struct Illumination {
        calls: Rc<RefCell<Vec<(AdjustmentRequest, Option<Reply>)>>>,
    }

    impl IlluminationService for Illumination {
        fn adjust(
            &self,
            request: AdjustmentRequest,
        ) -> LocalBoxFuture<'static, std::result::Result<AdjustmentResponse, ServiceError>> {
            let (tx, rx) = oneshot::channel();
            self.calls.borrow_mut().push((request, Some(tx)));
            async move { rx.await.unwrap_or(Err(ServiceError::Dropped)) }.boxed_local()
        }
    }

    impl Illumination {
        fn reply_all(&self, size: f32, color: &str) {
            for (_, reply) in self.calls.borrow_mut().iter_mut() {
                if let Some(tx) = reply.take() {
                    let _ = tx.send(Ok(AdjustmentResponse {
                        adjusted_font_size: size,
                        text_color: color.into(),
                    }));
                }
            }
        }
    }

    #[derive(Clone, Default)]
    struct Join {
        calls: Rc<RefCell<Vec<JoinRequest>>>,
    }

    impl JoinService for Join {
        fn subscribe(
            &self,
            request: JoinRequest,
        ) -> LocalBoxFuture<'static, std::result::Result<JoinOutcome, ServiceError>> {
            self.calls.borrow_mut().push(request);
            futures::future::ready(Ok(JoinOutcome::welcome())).boxed_local()
        }
    }

    struct Harness {
        session: Session<BufferRenderer>,
        illumination: Illumination,
        join: Join,
    }

    fn harness() -> Harness {
        let manifest = SceneManifest {
            bodies: vec![BodyDescriptor::new("hero-planet", 5.0, Vec3::ZERO)],
            gallery: vec!["gallery-image-1".into()],
            overlays: vec![OverlayDescriptor::new("hero", "Cosmic Scroll", 32.0, Vec3::new(0.0, 0.0, 5.0))],
            join_anchor: Some(Vec3::new(-10.0, -2.0, -95.0)),
        };
        let catalog = ContentCatalog::from_entries(vec![ContentEntry {
            id: "gallery-image-1".into(),
            image_url: "https://img.test/nebula.jpg".into(),
            description: "Orion Nebula".into(),
            image_hint: "nebula".into(),
        }]);
        let config = EngineConfig {
            star_count: 50,
            scrub_lag: 0.0,
            gallery_jitter: 0.0,
            ..EngineConfig::default()
        };
        let illumination = Illumination::default();
        let join = Join::default();
        let session = Session::new(
            &manifest,
            catalog,
            config,
            Vec2::new(800.0, 600.0),
            BufferRenderer::new(32),
            Services {
                illumination: Box::new(illumination.clone()),
                join: Box::new(join.clone()),
            },
        )
        .unwrap();
        Harness { session, illumination, join }
    }

    #[test]
    fn tick_draws_places_and_requests() {
        let mut h = harness();
        h.session.tick(16.0);
        assert_eq!(h.session.renderer().frames(), 1);
        assert!(h.session.renderer().buffer().instance_count() > 0);

        let hero = h.session.overlays().get(OverlayIndex(0)).unwrap();
        assert!(hero.placement.is_some());
        assert_eq!(hero.style.opacity, 1.0);
        assert_eq!(h.illumination.calls.borrow().len(), 1);

        let join = h.session.join_placement().unwrap();
        assert!(!join.interactive);
    }

    #[test]
    fn completion_lands_on_a_later_frame() {
        let mut h = harness();
        h.session.tick(16.0);
        h.illumination.reply_all(30.0, "#EEEEFF");
        h.session.tick(16.0);
        let hero = h.session.overlays().get(OverlayIndex(0)).unwrap();
        assert_eq!(hero.style.font_size, 30.0);
        assert_eq!(hero.style.color, "#EEEEFF");
    }

    #[test]
    fn scroll_moves_camera_and_hides_hint() {
        let mut h = harness();
        assert!(h.session.scroll_hint_visible());
        h.session.scroll(6000.0);
        h.session.tick(16.0);
        assert!((h.session.camera().position.z - -105.0).abs() < 1e-3);
        assert!(!h.session.scroll_hint_visible());

        h.session.scroll(0.0);
        h.session.tick(16.0);
        assert_eq!(h.session.camera().position.z, 15.0);
    }

    #[test]
    fn resize_updates_camera_and_renderer() {
        let mut h = harness();
        h.session.resize(1200.0, 600.0);
        h.session.tick(16.0);
        assert!((h.session.camera().aspect - 2.0).abs() < 1e-6);
        assert_eq!(h.session.renderer().size(), (1200, 600));
    }

    #[test]
    fn click_on_gallery_plane_selects_catalog_entry() {
        let mut h = harness();
        // halfway: the gallery sits ahead of the camera
        h.session.scroll(3000.0);
        h.session.tick(16.0);

        let plane = h.session.scene().by_name("gallery-image-1").unwrap().position();
        let (ndc, _) = h.session.camera().project(plane);
        let pointer = h.session.camera().ndc_to_pixels(Vec2::new(ndc.x, ndc.y));
        h.session.click(pointer.x, pointer.y);
        h.session.tick(16.0);

        let selection = h.session.selection().unwrap();
        assert_eq!(selection.description, "Orion Nebula");
        h.session.clear_selection();
        assert!(h.session.selection().is_none());
    }

    #[test]
    fn join_outcome_arrives_through_tick() {
        let mut h = harness();
        h.session.submit_join("not-an-email");
        h.session.tick(16.0);
        assert!(h.session.take_join_outcome().unwrap().error);
        assert!(h.join.calls.borrow().is_empty());

        h.session.submit_join("a@b.com");
        h.session.tick(16.0);
        assert!(!h.session.take_join_outcome().unwrap().error);
        assert_eq!(h.join.calls.borrow().len(), 1);
    }

    #[test]
    fn only_the_latest_join_submission_is_surfaced() {
        let mut h = harness();
        h.session.submit_join("a@b.com");
        h.session.submit_join("not-an-email");
        h.session.tick(16.0);
        let outcome = h.session.take_join_outcome().unwrap();
        assert!(outcome.error);
        assert_eq!(outcome.message, crate::forms::join::INVALID_EMAIL_MESSAGE);
        assert_eq!(h.join.calls.borrow().len(), 1);

        h.session.tick(16.0);
        assert!(h.session.take_join_outcome().is_none());

        h.session.submit_join("not-an-email");
        h.session.submit_join("c@d.org");
        h.session.tick(16.0);
        assert!(!h.session.take_join_outcome().unwrap().error);
        assert_eq!(h.join.calls.borrow().len(), 2);
    }

    #[test]
    fn teardown_stops_everything() {
        let mut h = harness();
        h.session.tick(16.0);
        h.session.teardown();
        assert!(h.session.is_detached());
        assert!(h.session.renderer().is_released());

        h.illumination.reply_all(30.0, "#EEEEFF");
        h.session.scroll(3000.0);
        h.session.tick(16.0);
        let hero = h.session.overlays().get(OverlayIndex(0)).unwrap();
        assert_eq!(hero.style.font_size, 32.0);
        assert_eq!(h.session.renderer().frames(), 1);
        assert_eq!(h.session.scroll_offset(), 0.0);
    }
}
