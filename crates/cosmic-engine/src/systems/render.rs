use crate::api::types::EntityKind;
use crate::components::entity::Entity;
use crate::components::mesh::{Geometry, Material};
use crate::core::scene::Scene;
use crate::renderer::camera::{CameraUniform, PerspectiveCamera};
use crate::renderer::instance::{RenderBuffer, RenderInstance};
use crate::renderer::traits::{FrameData, Renderer};

const UNUSED: f32 = -1.0;

/// Build the render buffer from a set of entities.
/// Lights go first and `light_count` marks the boundary; cameras and
/// inactive entities are skipped.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut lights: Vec<RenderInstance> = Vec::new();
    let mut drawables: Vec<RenderInstance> = Vec::new();

    for entity in entities {
        if !entity.active || entity.kind == EntityKind::Camera {
            continue;
        }
        if let Some(light) = &entity.light {
            let p = entity.position();
            lights.push(RenderInstance {
                x: p.x,
                y: p.y,
                z: p.z,
                size: light.range.unwrap_or(0.0),
                kind: entity.kind.code(),
                material: UNUSED,
                texture: UNUSED,
                opacity: 1.0,
                param: light.intensity,
                ..Default::default()
            });
            continue;
        }
        let Some(material) = &entity.material else {
            continue;
        };
        drawables.push(instance_for(entity, material));
    }

    buffer.set_light_count(lights.len() as u32);
    for inst in lights.into_iter().chain(drawables) {
        buffer.push(inst);
    }
}

fn instance_for(entity: &Entity, material: &Material) -> RenderInstance {
    let p = entity.position();
    let r = entity.rotation();
    let size = match (entity.geometry, material) {
        (Geometry::Sphere { radius, .. }, _) => radius,
        (Geometry::Plane { width, .. }, _) => width,
        (_, Material::Points { size, .. }) => *size,
        (geometry, _) => geometry.extent(),
    };
    let opacity = match material {
        Material::Points { opacity, .. } => *opacity,
        _ => 1.0,
    };
    let param = match material {
        Material::Standard { displacement: Some(d), .. } => d.texture.slot as f32,
        _ => UNUSED,
    };
    RenderInstance {
        x: p.x,
        y: p.y,
        z: p.z,
        rot_x: r.x,
        rot_y: r.y,
        rot_z: r.z,
        size,
        kind: entity.kind.code(),
        material: material.code(),
        texture: material.map().map_or(UNUSED, |t| t.slot as f32),
        opacity,
        param,
    }
}

/// Renderer that packs each frame into a `RenderBuffer` for the host.
pub struct BufferRenderer {
    buffer: RenderBuffer,
    camera: CameraUniform,
    width: u32,
    height: u32,
    frames: u64,
    released: bool,
}

impl BufferRenderer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RenderBuffer::with_capacity(capacity),
            camera: CameraUniform {
                view_projection: [[0.0; 4]; 4],
                position: [0.0; 4],
            },
            width: 0,
            height: 0,
            frames: 0,
            released: false,
        }
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    pub fn camera(&self) -> &CameraUniform {
        &self.camera
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Renderer for BufferRenderer {
    fn backend(&self) -> &'static str {
        "buffer"
    }

    fn draw(&mut self, frame: &FrameData) {
        if self.released {
            return;
        }
        build_render_buffer(frame.scene.iter(), &mut self.buffer);
        self.camera = frame.camera.uniform();
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn release(&mut self) {
        self.buffer.clear();
        self.buffer.instances.shrink_to_fit();
        self.released = true;
        log::info!("renderer: released after {} frames", self.frames);
    }
}

/// Draw `scene` through any renderer.
pub fn draw_scene(renderer: &mut dyn Renderer, scene: &Scene, camera: &PerspectiveCamera) {
    renderer.draw(&FrameData { scene, camera });
}
