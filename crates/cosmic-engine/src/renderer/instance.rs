use bytemuck::{Pod, Zeroable};

/// Per-entity render data handed to the host renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// World-space position.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Drawn Euler rotation (XYZ, radians): timeline pose plus idle spin.
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    /// Sphere radius, plane width, point size or light range.
    pub size: f32,
    /// `EntityKind::code`.
    pub kind: f32,
    /// `Material::code`, -1 for lights.
    pub material: f32,
    /// Texture slot of the colour map, -1 when untextured.
    pub texture: f32,
    /// Opacity for points, 1.0 otherwise.
    pub opacity: f32,
    /// Light intensity for lights, displacement slot for rough bodies, -1 if unused.
    pub param: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Everything the host needs to draw one frame.
pub struct RenderBuffer {
    /// Lights first, then drawables.
    pub instances: Vec<RenderInstance>,
    /// Instances `[0..light_count)` are lights.
    pub light_count: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            light_count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.light_count = 0;
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn set_light_count(&mut self, count: u32) {
        self.light_count = count;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
