//! Projection of world anchors onto the screen and the per-overlay style
//! state the DOM layer reads.
//!
//! Placement is recomputed every frame from the current camera, so text
//! tracks the scene even while a style adjustment is pending or failed.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::api::config::{EngineConfig, Falloff};
use crate::api::types::OverlayIndex;
use crate::assets::manifest::OverlayDescriptor;
use crate::renderer::camera::PerspectiveCamera;

/// Colour of un-adjusted overlay text.
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

/// Glow layers derived from the text colour: (blur px, alpha hex suffix).
const GLOW_LAYERS: [(u32, &str); 3] = [(8, "aa"), (16, "55"), (24, "33")];

/// Derived, ephemeral styling of one overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    /// Pixels.
    pub font_size: f32,
    /// Hex `#RRGGBB`.
    pub color: String,
    /// CSS `text-shadow` value, empty for none.
    pub text_shadow: String,
    /// Distance-based opacity, rewritten every frame.
    pub opacity: f32,
}

impl OverlayStyle {
    pub fn initial(base_font_size: f32, falloff: &Falloff) -> Self {
        Self {
            font_size: base_font_size,
            color: DEFAULT_TEXT_COLOR.to_string(),
            text_shadow: String::new(),
            opacity: falloff.floor,
        }
    }

    /// Adopt an adjustment result: font size, colour and the glow derived
    /// from that colour. Opacity is left to the positioner.
    pub fn apply_adjustment(&mut self, font_size: f32, color: &str) {
        self.font_size = font_size;
        self.color = color.to_string();
        self.text_shadow = text_shadow(color);
    }
}

/// Three-layer glow for `color`, e.g. `0 0 8px #EEEEFFaa, ...`.
pub fn text_shadow(color: &str) -> String {
    GLOW_LAYERS
        .iter()
        .map(|(blur, alpha)| format!("0 0 {}px {}{}", blur, color, alpha))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where an anchor lands on screen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Pixels, origin top-left, Y down.
    pub screen: Vec2,
    pub opacity: f32,
    /// Anchor is in front of the camera (clip w > 0).
    pub in_front: bool,
}

impl Placement {
    pub fn record(&self) -> PlacementRecord {
        PlacementRecord {
            x: self.screen.x,
            y: self.screen.y,
            opacity: self.opacity,
            in_front: if self.in_front { 1.0 } else { 0.0 },
        }
    }
}

/// Wire form of a placement: 4 floats per overlay.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PlacementRecord {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub in_front: f32,
}

impl PlacementRecord {
    pub const FLOATS: usize = 4;
}

/// Project `anchor` through `camera` and fade it by distance.
pub fn project(anchor: Vec3, camera: &PerspectiveCamera, falloff: &Falloff) -> Placement {
    let (ndc, w) = camera.project(anchor);
    let screen = camera.ndc_to_pixels(Vec2::new(ndc.x, ndc.y));
    let distance = anchor.distance(camera.position);
    Placement {
        screen,
        opacity: falloff.opacity(distance),
        in_front: w > 0.0,
    }
}

/// The join form's placement plus whether it accepts input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPlacement {
    pub placement: Placement,
    pub interactive: bool,
}

impl JoinPlacement {
    pub fn place(anchor: Vec3, camera: &PerspectiveCamera, config: &EngineConfig) -> Self {
        let placement = project(anchor, camera, &config.join_falloff);
        Self {
            interactive: placement.opacity > config.join_interactive_opacity,
            placement,
        }
    }
}

/// Whether the "scroll down" hint should still show.
pub fn scroll_hint_visible(offset: f32, threshold: f32) -> bool {
    offset <= threshold
}

/// One narrative section: fixed content plus derived style and placement.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub id: String,
    pub title: String,
    pub body: String,
    pub base_font_size: f32,
    /// World-space anchor, fixed at creation.
    pub anchor: Vec3,
    pub style: OverlayStyle,
    pub placement: Option<Placement>,
}

impl Overlay {
    pub fn from_descriptor(desc: &OverlayDescriptor, falloff: &Falloff) -> Self {
        Self {
            id: desc.id.clone(),
            title: desc.title.clone(),
            body: desc.body.clone(),
            base_font_size: desc.base_font_size,
            anchor: desc.anchor,
            style: OverlayStyle::initial(desc.base_font_size, falloff),
            placement: None,
        }
    }
}

/// Snapshot of one overlay for the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    #[serde(flatten)]
    pub style: &'a OverlayStyle,
    pub x: f32,
    pub y: f32,
    pub in_front: bool,
}

/// All overlays of a journey, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct OverlaySet {
    overlays: Vec<Overlay>,
}

impl OverlaySet {
    pub fn from_descriptors(descriptors: &[OverlayDescriptor], falloff: &Falloff) -> Self {
        Self {
            overlays: descriptors
                .iter()
                .map(|d| Overlay::from_descriptor(d, falloff))
                .collect(),
        }
    }

    /// Re-place every overlay for the current camera.
    pub fn place_all(&mut self, camera: &PerspectiveCamera, falloff: &Falloff) {
        for overlay in &mut self.overlays {
            let placement = project(overlay.anchor, camera, falloff);
            overlay.style.opacity = placement.opacity;
            overlay.placement = Some(placement);
        }
    }

    pub fn get(&self, index: OverlayIndex) -> Option<&Overlay> {
        self.overlays.get(index.0)
    }

    pub fn get_mut(&mut self, index: OverlayIndex) -> Option<&mut Overlay> {
        self.overlays.get_mut(index.0)
    }

    pub fn by_id(&self, id: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlayIndex, &Overlay)> {
        self.overlays
            .iter()
            .enumerate()
            .map(|(i, o)| (OverlayIndex(i), o))
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Wire records in overlay order; unplaced overlays are zeroed.
    pub fn records(&self) -> Vec<PlacementRecord> {
        self.overlays
            .iter()
            .map(|o| o.placement.map(|p| p.record()).unwrap_or_default())
            .collect()
    }

    pub fn views(&self) -> Vec<OverlayView<'_>> {
        self.overlays
            .iter()
            .map(|o| {
                let p = o.placement.unwrap_or(Placement {
                    screen: Vec2::ZERO,
                    opacity: o.style.opacity,
                    in_front: false,
                });
                OverlayView {
                    id: &o.id,
                    title: &o.title,
                    style: &o.style,
                    x: p.screen.x,
                    y: p.screen.y,
                    in_front: p.in_front,
                }
            })
            .collect()
    }
}
