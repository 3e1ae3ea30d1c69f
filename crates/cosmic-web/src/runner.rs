use cosmic_engine::bridge::protocol::FrameSnapshot;
use cosmic_engine::{
    BufferRenderer, ContentCatalog, EngineConfig, EngineError, ProtocolLayout, SceneManifest, Services,
    Session, Vec2,
};

use crate::outbound::{AdjustmentOutbox, HostIllumination, HostJoin, JoinOutbox, Outbox};

/// Wires one journey session to the browser.
///
/// The concrete page creates a `thread_local!` JourneyRunner through
/// `export_journey!` and exports free functions via `#[wasm_bindgen]`,
/// because wasm-bindgen cannot export the generic session directly.
pub struct JourneyRunner {
    session: Session<BufferRenderer>,
    adjustments: AdjustmentOutbox,
    joins: JoinOutbox,
    layout: ProtocolLayout,
    /// Flat frame buffer read by the host through `buffer_ptr`.
    shared: Vec<f32>,
    /// Star positions, copied out once for the host to upload.
    stars: Vec<f32>,
}

impl JourneyRunner {
    /// Build from the page's manifest, catalog and (possibly empty) config JSON.
    pub fn new(
        manifest_json: &str,
        catalog_json: &str,
        config_json: &str,
        width: f32,
        height: f32,
    ) -> Result<Self, EngineError> {
        let manifest = SceneManifest::from_json(manifest_json)?;
        let catalog = ContentCatalog::from_json(catalog_json)?;
        let config = if config_json.trim().is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig::from_json(config_json)?
        };
        let layout = ProtocolLayout::from_config(&config);

        let adjustments = Outbox::shared();
        let joins = Outbox::shared();
        let services = Services {
            illumination: Box::new(HostIllumination(adjustments.clone())),
            join: Box::new(HostJoin(joins.clone())),
        };
        let renderer = BufferRenderer::new(config.max_instances);
        let session = Session::new(
            &manifest,
            catalog,
            config,
            Vec2::new(width, height),
            renderer,
            services,
        )?;

        let stars = session
            .handles()
            .star_field
            .and_then(|id| session.scene().get(id))
            .and_then(|e| e.stars.as_ref())
            .map(|s| s.as_floats().to_vec())
            .unwrap_or_default();

        Ok(Self {
            shared: layout.allocate(),
            session,
            adjustments,
            joins,
            layout,
            stars,
        })
    }

    /// Run one frame and pack it into the shared buffer.
    pub fn tick(&mut self, dt_ms: f64) {
        self.session.tick(dt_ms);
        self.pack();
    }

    fn pack(&mut self) {
        let renderer = self.session.renderer();
        let overlays = self.session.overlays().records();
        let frame = FrameSnapshot {
            frame: self.session.clock().frames(),
            camera: renderer.camera(),
            instances: renderer.buffer(),
            overlays: &overlays,
            viewport: self.session.camera().viewport,
            released: renderer.is_released(),
            scroll_hint: self.session.scroll_hint_visible(),
            join: self.session.join_placement(),
        };
        self.layout.write(&mut self.shared, &frame);
    }

    pub fn scroll(&mut self, offset: f32) {
        self.session.scroll(offset);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.session.click(x, y);
    }

    /// Unmount. The host must also cancel its animation frame.
    pub fn teardown(&mut self) {
        self.session.teardown();
        self.pack();
        self.stars = Vec::new();
    }

    // ---- Illumination service round-trip ----

    pub fn drain_adjustment_requests(&self) -> String {
        self.adjustments.borrow_mut().drain_json()
    }

    pub fn resolve_adjustment(&self, id: u32, json: &str) {
        self.adjustments.borrow_mut().resolve_json(id, json);
    }

    pub fn fail_adjustment(&self, id: u32, message: &str) {
        self.adjustments.borrow_mut().fail(id, message);
    }

    // ---- Join form round-trip ----

    pub fn submit_join(&mut self, email: &str) {
        self.session.submit_join(email);
    }

    pub fn drain_join_requests(&self) -> String {
        self.joins.borrow_mut().drain_json()
    }

    pub fn resolve_join(&self, id: u32, json: &str) {
        self.joins.borrow_mut().resolve_json(id, json);
    }

    pub fn fail_join(&self, id: u32, message: &str) {
        self.joins.borrow_mut().fail(id, message);
    }

    /// `{ message, error }` once the latest submission settled, else "".
    pub fn take_join_outcome(&mut self) -> String {
        self.session
            .take_join_outcome()
            .and_then(|outcome| to_json(&outcome))
            .unwrap_or_default()
    }

    // ---- UI state ----

    pub fn overlay_styles(&self) -> String {
        to_json(&self.session.overlays().views()).unwrap_or_else(|| "[]".to_string())
    }

    /// Selected gallery entry as JSON, or "" when nothing is selected.
    pub fn selection(&self) -> String {
        self.session
            .selection()
            .and_then(to_json)
            .unwrap_or_default()
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    pub fn scroll_hint_visible(&self) -> bool {
        self.session.scroll_hint_visible()
    }

    /// `[{ slot, url }]` for every texture the scene references.
    pub fn textures(&self) -> String {
        let textures: Vec<serde_json::Value> = self
            .session
            .scene()
            .textures()
            .iter()
            .map(|t| serde_json::json!({ "slot": t.slot, "url": t.url }))
            .collect();
        to_json(&textures).unwrap_or_else(|| "[]".to_string())
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.shared.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    /// Star positions, 3 floats per star; empty after teardown.
    pub fn star_positions(&self) -> &[f32] {
        &self.stars
    }

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_overlays(&self) -> u32 {
        self.layout.max_overlays as u32
    }

    pub fn is_detached(&self) -> bool {
        self.session.is_detached()
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(err) => {
            log::warn!("runner: serialization failed: {}", err);
            None
        }
    }
}
