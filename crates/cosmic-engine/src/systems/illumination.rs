//! Illumination adjustment client.
//!
//! Each overlay asks an external service how its text should look given
//! how close it is to the nearest lit body. Requests are rate-limited per
//! overlay by a leading-edge throttle and tagged with a per-overlay token;
//! a completion is applied only if its token is still the overlay's latest.
//! Failures and timeouts leave the current style untouched.

use futures::future::{AbortHandle, FutureExt, LocalBoxFuture};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::config::EngineConfig;
use crate::api::types::{EntityId, OverlayIndex};
use crate::components::entity::Entity;
use crate::core::pending::PendingSet;
use crate::core::scene::Scene;
use crate::error::ServiceError;
use crate::systems::overlay::{Overlay, OverlaySet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequest {
    pub text: String,
    pub planet_distance: f32,
    pub planet_light_intensity: f32,
    pub base_font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentResponse {
    /// Pixels.
    pub adjusted_font_size: f32,
    /// Hex `#RRGGBB`.
    pub text_color: String,
}

impl AdjustmentResponse {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !(self.adjusted_font_size.is_finite() && self.adjusted_font_size > 0.0) {
            return Err(ServiceError::Malformed(format!(
                "adjustedFontSize {}",
                self.adjusted_font_size
            )));
        }
        if !is_hex_color(&self.text_color) {
            return Err(ServiceError::Malformed(format!(
                "textColor '{}'",
                self.text_color
            )));
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// The external adjustment computation.
pub trait IlluminationService {
    fn adjust(
        &self,
        request: AdjustmentRequest,
    ) -> LocalBoxFuture<'static, Result<AdjustmentResponse, ServiceError>>;
}

/// Nearest lit body to `anchor` by current position. Ties go to the body
/// listed first in `bodies`.
pub fn nearest_body<'a>(anchor: Vec3, scene: &'a Scene, bodies: &[EntityId]) -> Option<(&'a Entity, f32)> {
    let mut best: Option<(&Entity, f32)> = None;
    for entity in bodies.iter().filter_map(|&id| scene.get(id)) {
        let distance = anchor.distance(entity.position());
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((entity, distance)),
        }
    }
    best
}

/// Leading-edge throttle: the first call in a burst passes, later calls
/// are suppressed until `cooldown_ms` has elapsed since the one that passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    last_issued_at: Option<f64>,
    cooldown_ms: f64,
}

impl Throttle {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            last_issued_at: None,
            cooldown_ms,
        }
    }

    /// Whether a call at `now_ms` may go out. Records it if so.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_issued_at {
            if now_ms - last < self.cooldown_ms {
                return false;
            }
        }
        self.last_issued_at = Some(now_ms);
        true
    }

    pub fn last_issued_at(&self) -> Option<f64> {
        self.last_issued_at
    }
}

#[derive(Debug, Clone, Copy)]
struct Channel {
    throttle: Throttle,
    /// Token of the most recently issued request; 0 before the first.
    latest_token: u64,
}

struct Completion {
    overlay: OverlayIndex,
    token: u64,
    result: Result<AdjustmentResponse, ServiceError>,
}

struct InFlight {
    overlay: OverlayIndex,
    token: u64,
    issued_at: f64,
    abort: AbortHandle,
}

/// Counters for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    pub issued: u32,
    pub suppressed: u32,
    pub applied: u32,
    pub stale: u32,
    pub failed: u32,
    pub timed_out: u32,
}

pub struct IlluminationClient {
    service: Box<dyn IlluminationService>,
    channels: Vec<Channel>,
    pending: PendingSet<Completion>,
    in_flight: Vec<InFlight>,
    timeout_ms: f64,
    detached: bool,
    stats: ClientStats,
}

impl IlluminationClient {
    pub fn new(service: Box<dyn IlluminationService>, overlay_count: usize, config: &EngineConfig) -> Self {
        let channel = Channel {
            throttle: Throttle::new(config.adjust_cooldown_ms),
            latest_token: 0,
        };
        Self {
            service,
            channels: vec![channel; overlay_count],
            pending: PendingSet::new(),
            in_flight: Vec::new(),
            timeout_ms: config.adjust_timeout_ms,
            detached: false,
            stats: ClientStats::default(),
        }
    }

    /// Issue a request for one overlay unless throttled. Returns the new
    /// token when a request went out.
    pub fn request_adjustment(
        &mut self,
        index: OverlayIndex,
        overlay: &Overlay,
        scene: &Scene,
        bodies: &[EntityId],
        now_ms: f64,
    ) -> Option<u64> {
        if self.detached {
            return None;
        }
        let (body, distance) = nearest_body(overlay.anchor, scene, bodies)?;
        let channel = self.channels.get_mut(index.0)?;
        if !channel.throttle.try_acquire(now_ms) {
            self.stats.suppressed += 1;
            return None;
        }
        channel.latest_token += 1;
        let token = channel.latest_token;

        let request = AdjustmentRequest {
            text: overlay.title.clone(),
            planet_distance: distance,
            planet_light_intensity: body.light_intensity(),
            base_font_size: overlay.base_font_size,
        };
        log::debug!(
            "illumination: overlay '{}' token {} (nearest '{}' at {:.2})",
            overlay.id,
            token,
            body.name,
            distance
        );
        let future = self
            .service
            .adjust(request)
            .map(move |result| Completion { overlay: index, token, result });
        let abort = self.pending.push(future);
        self.in_flight.push(InFlight {
            overlay: index,
            token,
            issued_at: now_ms,
            abort,
        });
        self.stats.issued += 1;
        Some(token)
    }

    /// One frame: offer every overlay a request, then apply what came back.
    pub fn update(&mut self, overlays: &mut OverlaySet, scene: &Scene, bodies: &[EntityId], now_ms: f64) {
        if self.detached {
            return;
        }
        for (index, overlay) in overlays.iter() {
            self.request_adjustment(index, overlay, scene, bodies, now_ms);
        }
        self.poll(overlays, now_ms);
    }

    /// Expire timed-out requests and apply completed ones.
    /// Returns how many styles changed.
    pub fn poll(&mut self, overlays: &mut OverlaySet, now_ms: f64) -> usize {
        if self.detached {
            return 0;
        }
        let timeout_ms = self.timeout_ms;
        let stats = &mut self.stats;
        self.in_flight.retain(|f| {
            if now_ms - f.issued_at < timeout_ms {
                return true;
            }
            f.abort.abort();
            stats.timed_out += 1;
            log::warn!(
                "illumination: overlay {} token {}: {}",
                f.overlay.0,
                f.token,
                ServiceError::TimedOut { after_ms: timeout_ms }
            );
            false
        });

        let mut applied = 0;
        for completion in self.pending.poll_ready() {
            self.in_flight
                .retain(|f| !(f.overlay == completion.overlay && f.token == completion.token));
            if self.apply(completion, overlays) {
                applied += 1;
            }
        }
        applied
    }

    fn apply(&mut self, completion: Completion, overlays: &mut OverlaySet) -> bool {
        let Completion { overlay: index, token, result } = completion;
        let latest = self.channels.get(index.0).map_or(0, |c| c.latest_token);
        if token != latest {
            self.stats.stale += 1;
            log::debug!(
                "illumination: discarding stale token {} for overlay {} (latest {})",
                token,
                index.0,
                latest
            );
            return false;
        }
        let response = match result.and_then(|r| r.validate().map(|_| r)) {
            Ok(response) => response,
            Err(err) => {
                self.stats.failed += 1;
                log::warn!("illumination: overlay {} token {}: {}", index.0, token, err);
                return false;
            }
        };
        let Some(overlay) = overlays.get_mut(index) else {
            return false;
        };
        overlay
            .style
            .apply_adjustment(response.adjusted_font_size, &response.text_color);
        self.stats.applied += 1;
        true
    }

    /// Stop applying anything. In-flight calls are left to finish; their
    /// results are dropped.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn latest_token(&self, index: OverlayIndex) -> u64 {
        self.channels.get(index.0).map_or(0, |c| c.latest_token)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> ClientStats {
        self.stats
    }
}
