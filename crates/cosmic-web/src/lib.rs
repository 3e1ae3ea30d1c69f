pub mod outbound;
pub mod runner;

pub use outbound::{HostIllumination, HostJoin, Outbox};
pub use runner::JourneyRunner;

// Re-exported so `export_journey!` expands without extra deps in the page crate.
pub use console_error_panic_hook;
pub use console_log;
pub use js_sys;
pub use log;
pub use web_sys;

/// Generate all `#[wasm_bindgen]` exports for a journey page.
///
/// Generates:
/// - `thread_local!` storage for the JourneyRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input, service round-trips, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// cosmic_web::export_journey!("my-page");
///
/// // or, with the page's manifest and catalog compiled in:
/// cosmic_web::export_journey!(
///     "my-page",
///     manifest = include_str!("../assets/journey.json"),
///     catalog = include_str!("../assets/catalog.json")
/// );
/// ```
#[macro_export]
macro_rules! export_journey {
    ($page_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::JourneyRunner>> = RefCell::new(None);
        }

        /// Run `f` against the mounted runner; `None` before init.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::JourneyRunner) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        $crate::log::warn!("{}: journey not initialized; call journey_init() first", $page_name);
                        None
                    }
                }
            })
        }

        /// Mount a journey. Returns false (and logs) if any document fails to parse.
        #[wasm_bindgen]
        pub fn journey_init(manifest_json: &str, catalog_json: &str, config_json: &str, width: f32, height: f32) -> bool {
            $crate::console_error_panic_hook::set_once();
            let _ = $crate::console_log::init_with_level($crate::log::Level::Info);

            match $crate::JourneyRunner::new(manifest_json, catalog_json, config_json, width, height) {
                Ok(runner) => {
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some(runner);
                    });
                    $crate::log::info!("{}: initialized", $page_name);
                    true
                }
                Err(err) => {
                    $crate::web_sys::console::error_1(&format!("{}: init failed: {}", $page_name, err).into());
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn journey_tick(dt_ms: f64) {
            with_runner(|r| r.tick(dt_ms));
        }

        #[wasm_bindgen]
        pub fn journey_scroll(offset: f32) {
            with_runner(|r| r.scroll(offset));
        }

        #[wasm_bindgen]
        pub fn journey_resize(width: f32, height: f32) {
            with_runner(|r| r.resize(width, height));
        }

        #[wasm_bindgen]
        pub fn journey_click(x: f32, y: f32) {
            with_runner(|r| r.click(x, y));
        }

        /// Unmount. The host cancels its animation frame alongside this call.
        #[wasm_bindgen]
        pub fn journey_teardown() {
            with_runner(|r| r.teardown());
        }

        // ---- Illumination service ----

        #[wasm_bindgen]
        pub fn journey_drain_adjustments() -> String {
            with_runner(|r| r.drain_adjustment_requests()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn journey_resolve_adjustment(id: u32, response_json: &str) {
            with_runner(|r| r.resolve_adjustment(id, response_json));
        }

        #[wasm_bindgen]
        pub fn journey_fail_adjustment(id: u32, message: &str) {
            with_runner(|r| r.fail_adjustment(id, message));
        }

        // ---- Join form ----

        #[wasm_bindgen]
        pub fn journey_submit_join(email: &str) {
            with_runner(|r| r.submit_join(email));
        }

        #[wasm_bindgen]
        pub fn journey_drain_joins() -> String {
            with_runner(|r| r.drain_join_requests()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn journey_resolve_join(id: u32, outcome_json: &str) {
            with_runner(|r| r.resolve_join(id, outcome_json));
        }

        #[wasm_bindgen]
        pub fn journey_fail_join(id: u32, message: &str) {
            with_runner(|r| r.fail_join(id, message));
        }

        #[wasm_bindgen]
        pub fn journey_take_join_outcome() -> String {
            with_runner(|r| r.take_join_outcome()).unwrap_or_default()
        }

        // ---- UI state ----

        #[wasm_bindgen]
        pub fn journey_overlay_styles() -> String {
            with_runner(|r| r.overlay_styles()).unwrap_or_else(|| "[]".to_string())
        }

        #[wasm_bindgen]
        pub fn journey_selection() -> String {
            with_runner(|r| r.selection()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn journey_clear_selection() {
            with_runner(|r| r.clear_selection());
        }

        #[wasm_bindgen]
        pub fn journey_scroll_hint() -> bool {
            with_runner(|r| r.scroll_hint_visible()).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn journey_textures() -> String {
            with_runner(|r| r.textures()).unwrap_or_else(|| "[]".to_string())
        }

        /// Copy of the star positions (xyz per star) for a one-time upload.
        #[wasm_bindgen]
        pub fn journey_star_positions() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.star_positions()))
            .unwrap_or_else(|| $crate::js_sys::Float32Array::new_with_length(0))
        }

        // ---- Shared buffer accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_ptr() -> *const f32 {
            with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_overlays() -> u32 {
            with_runner(|r| r.max_overlays()).unwrap_or(0)
        }
    };

    // Variant with the page's documents compiled in
    ($page_name:literal, manifest = $manifest:expr, catalog = $catalog:expr) => {
        $crate::export_journey!($page_name);

        /// Mount the compiled-in journey with an optional config override.
        #[wasm_bindgen]
        pub fn journey_init_embedded(config_json: &str, width: f32, height: f32) -> bool {
            journey_init($manifest, $catalog, config_json, width, height)
        }
    };
}
