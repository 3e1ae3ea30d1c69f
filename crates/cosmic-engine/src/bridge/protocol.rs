/// Shared frame buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 20 floats]  view-projection (column-major) + position
/// [Instances: max_instances × 12 floats]
/// [Overlays: max_overlays × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use glam::Vec2;

use crate::api::config::EngineConfig;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{RenderBuffer, RenderInstance};
use crate::systems::overlay::{JoinPlacement, PlacementRecord};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_LIGHT_COUNT: usize = 4;
pub const HEADER_MAX_OVERLAYS: usize = 5;
pub const HEADER_OVERLAY_COUNT: usize = 6;
pub const HEADER_VIEWPORT_WIDTH: usize = 7;
pub const HEADER_VIEWPORT_HEIGHT: usize = 8;
pub const HEADER_PROTOCOL_VERSION: usize = 9;
pub const HEADER_RELEASED: usize = 10;
pub const HEADER_SCROLL_HINT: usize = 11;
pub const HEADER_JOIN_X: usize = 12;
pub const HEADER_JOIN_Y: usize = 13;
pub const HEADER_JOIN_OPACITY: usize = 14;
pub const HEADER_JOIN_INTERACTIVE: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera section: 4×4 matrix + xyzw position.
pub const CAMERA_FLOATS: usize = 20;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_overlays: usize,

    /// Offset (in floats) where camera data begins.
    pub camera_offset: usize,
    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Offset (in floats) where overlay placements begin.
    pub overlay_data_offset: usize,
    /// Size of overlay data section in floats.
    pub overlay_data_floats: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_overlays: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CAMERA_FLOATS;
        let instance_data_floats = max_instances * RenderInstance::FLOATS;
        let overlay_data_offset = instance_data_offset + instance_data_floats;
        let overlay_data_floats = max_overlays * PlacementRecord::FLOATS;
        let buffer_total_floats = overlay_data_offset + overlay_data_floats;

        Self {
            max_instances,
            max_overlays,
            camera_offset,
            instance_data_offset,
            instance_data_floats,
            overlay_data_offset,
            overlay_data_floats,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_instances, config.max_overlays)
    }

    /// A zeroed buffer of the right size with capacities and version filled in.
    pub fn allocate(&self) -> Vec<f32> {
        let mut buffer = vec![0.0; self.buffer_total_floats];
        buffer[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        buffer[HEADER_MAX_OVERLAYS] = self.max_overlays as f32;
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buffer
    }

    /// Write one frame into a buffer from `allocate`. Instances and
    /// overlays beyond capacity are dropped.
    pub fn write(&self, buffer: &mut [f32], frame: &FrameSnapshot) {
        if buffer.len() < self.buffer_total_floats {
            log::warn!(
                "protocol: buffer holds {} floats, layout needs {}",
                buffer.len(),
                self.buffer_total_floats
            );
            return;
        }

        let instance_count = frame.instances.instances.len().min(self.max_instances);
        if instance_count < frame.instances.instances.len() {
            log::warn!(
                "protocol: {} instances exceed capacity {}",
                frame.instances.instances.len(),
                self.max_instances
            );
        }
        let overlay_count = frame.overlays.len().min(self.max_overlays);

        buffer[HEADER_FRAME_COUNTER] = frame.frame as f32;
        buffer[HEADER_INSTANCE_COUNT] = instance_count as f32;
        buffer[HEADER_LIGHT_COUNT] = (frame.instances.light_count as usize).min(instance_count) as f32;
        buffer[HEADER_OVERLAY_COUNT] = overlay_count as f32;
        buffer[HEADER_VIEWPORT_WIDTH] = frame.viewport.x;
        buffer[HEADER_VIEWPORT_HEIGHT] = frame.viewport.y;
        buffer[HEADER_RELEASED] = flag(frame.released);
        buffer[HEADER_SCROLL_HINT] = flag(frame.scroll_hint);
        let join = frame.join.map(|j| (j.placement.screen, j.placement.opacity, j.interactive));
        let (join_screen, join_opacity, join_interactive) = join.unwrap_or((Vec2::ZERO, 0.0, false));
        buffer[HEADER_JOIN_X] = join_screen.x;
        buffer[HEADER_JOIN_Y] = join_screen.y;
        buffer[HEADER_JOIN_OPACITY] = join_opacity;
        buffer[HEADER_JOIN_INTERACTIVE] = flag(join_interactive);

        let camera: &[f32] = bytemuck::cast_slice(std::slice::from_ref(frame.camera));
        buffer[self.camera_offset..self.camera_offset + CAMERA_FLOATS].copy_from_slice(camera);

        let instances = &frame.instances.as_floats()[..instance_count * RenderInstance::FLOATS];
        buffer[self.instance_data_offset..self.instance_data_offset + instances.len()].copy_from_slice(instances);

        let overlays: &[f32] = bytemuck::cast_slice(&frame.overlays[..overlay_count]);
        buffer[self.overlay_data_offset..self.overlay_data_offset + overlays.len()].copy_from_slice(overlays);
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Everything written into the shared buffer for one frame.
pub struct FrameSnapshot<'a> {
    pub frame: u64,
    pub camera: &'a CameraUniform,
    pub instances: &'a RenderBuffer,
    pub overlays: &'a [PlacementRecord],
    pub viewport: Vec2,
    pub released: bool,
    pub scroll_hint: bool,
    pub join: Option<JoinPlacement>,
}
