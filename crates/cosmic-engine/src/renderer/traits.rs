//! Renderer seam.
//!
//! The session never talks to a graphics API directly: it hands a
//! `FrameData` snapshot to whatever implements `Renderer`. On the web that
//! is `BufferRenderer`, which packs the frame for the TypeScript side.

use crate::core::scene::Scene;
use super::camera::PerspectiveCamera;

/// Read-only view of the state to draw this frame.
pub struct FrameData<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
}

pub trait Renderer {
    /// Backend identifier (e.g. "buffer", "webgl").
    fn backend(&self) -> &'static str;

    /// Draw one frame.
    fn draw(&mut self, frame: &FrameData);

    /// Output surface changed size, in pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Free every GPU-side resource (geometries, materials, textures).
    /// No draw follows a release.
    fn release(&mut self);
}
