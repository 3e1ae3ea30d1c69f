//! Scene builder: turns a `SceneManifest` into a populated `Scene`.
//!
//! Construction never fails on content: a texture the catalog does not know
//! is logged as `AssetMissing` and the material stays untextured.

use glam::{Vec2, Vec3};

use crate::api::config::EngineConfig;
use crate::api::types::{EntityId, EntityKind};
use crate::assets::catalog::ContentCatalog;
use crate::assets::manifest::{BodyDescriptor, SceneManifest};
use crate::components::entity::{attr, Attribute, Entity};
use crate::components::light::LightComponent;
use crate::components::mesh::{Displacement, Geometry, Material, TextureRef};
use crate::components::starfield::StarField;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::renderer::camera::PerspectiveCamera;

pub const CAMERA: &str = "camera";
pub const AMBIENT_LIGHT: &str = "ambient-light";
pub const POINT_LIGHT: &str = "point-light";
pub const STAR_FIELD: &str = "star-field";

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const AMBIENT_INTENSITY: f32 = 0.2;
const POINT_INTENSITY: f32 = 2.0;
const POINT_RANGE: f32 = 200.0;
const POINT_LIGHT_START: Vec3 = Vec3::new(10.0, 10.0, 20.0);

const SPHERE_SEGMENTS: u32 = 64;
const BODY_ROUGHNESS: f32 = 0.8;
const BODY_METALNESS: f32 = 0.1;
const ROUGH_BODY_ROUGHNESS: f32 = 0.9;
const DISPLACEMENT_SCALE: f32 = 0.1;

const PLANE_SIZE: Vec2 = Vec2::new(4.0, 3.0);
const GALLERY_SPACING: f32 = 5.0;
const GALLERY_Y: f32 = -12.0;
const GALLERY_Z: f32 = -82.0;

/// Ids of the entities other systems address directly.
#[derive(Debug, Clone, Default)]
pub struct SceneHandles {
    pub camera: Option<EntityId>,
    pub point_light: Option<EntityId>,
    pub star_field: Option<EntityId>,
    /// Lit bodies in manifest order.
    pub bodies: Vec<EntityId>,
    /// Picture planes in manifest order.
    pub gallery: Vec<EntityId>,
}

pub struct SceneGraph {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub handles: SceneHandles,
}

struct IdAllocator(u32);

impl IdAllocator {
    fn next(&mut self) -> EntityId {
        self.0 += 1;
        EntityId(self.0)
    }
}

/// Build the scene graph described by `manifest`.
pub fn build(
    manifest: &SceneManifest,
    catalog: &ContentCatalog,
    config: &EngineConfig,
    viewport: Vec2,
    rng: &mut Rng,
) -> SceneGraph {
    let mut scene = Scene::new();
    let mut ids = IdAllocator(0);
    let mut handles = SceneHandles::default();

    let camera = PerspectiveCamera::new(config.camera_fov_deg, viewport, config.camera_near, config.camera_far)
        .with_position(Vec3::new(0.0, 0.0, config.camera_start_z));
    handles.camera = Some(scene.spawn(
        Entity::new(ids.next(), EntityKind::Camera)
            .with_name(CAMERA)
            .with_position(camera.position),
    ));

    scene.spawn(
        Entity::new(ids.next(), EntityKind::Light)
            .with_name(AMBIENT_LIGHT)
            .with_light(LightComponent::ambient(WHITE, AMBIENT_INTENSITY)),
    );

    handles.point_light = Some(scene.spawn(
        Entity::new(ids.next(), EntityKind::Light)
            .with_name(POINT_LIGHT)
            .with_position(POINT_LIGHT_START)
            .with_light(LightComponent::point(WHITE, POINT_INTENSITY, POINT_RANGE))
            .with_attribute(attr::BASE_POSITION, Attribute::Vec3(POINT_LIGHT_START)),
    ));

    let stars = StarField::generate(config.star_count, config.star_half_extent, rng);
    handles.star_field = Some(scene.spawn(
        Entity::new(ids.next(), EntityKind::StarField)
            .with_name(STAR_FIELD)
            .with_geometry(Geometry::Points)
            .with_material(Material::Points {
                size: config.star_size,
                color: WHITE,
                opacity: config.star_opacity,
            })
            .with_stars(stars),
    ));

    for body in &manifest.bodies {
        let material = body_material(body, catalog, &mut scene);
        let entity = Entity::new(ids.next(), EntityKind::LitBody)
            .with_name(body.id.as_str())
            .with_position(body.position)
            .with_geometry(Geometry::Sphere {
                radius: body.size,
                segments: SPHERE_SEGMENTS,
            })
            .with_material(material)
            .with_attribute(attr::LIGHT_INTENSITY, Attribute::Float(body.light_intensity))
            .with_attribute(attr::BASE_POSITION, Attribute::Vec3(body.position));
        handles.bodies.push(scene.spawn(entity));
    }

    for (i, image_id) in manifest.gallery.iter().enumerate() {
        let slot = (i + 1) as f32;
        let position = Vec3::new(
            (slot - 2.5) * GALLERY_SPACING,
            GALLERY_Y,
            GALLERY_Z + rng.centered(config.gallery_jitter),
        );
        let map = texture(image_id, catalog, &mut scene);
        let entity = Entity::new(ids.next(), EntityKind::PicturePlane)
            .with_name(image_id.as_str())
            .with_position(position)
            .with_geometry(Geometry::Plane {
                width: PLANE_SIZE.x,
                height: PLANE_SIZE.y,
            })
            .with_material(Material::Basic { map, double_sided: true })
            .with_attribute(attr::BASE_POSITION, Attribute::Vec3(position));
        handles.gallery.push(scene.spawn(entity));
    }

    log::info!(
        "builder: {} bodies, {} gallery planes, {} stars, {} textures",
        handles.bodies.len(),
        handles.gallery.len(),
        config.star_count,
        scene.textures().len()
    );

    SceneGraph { scene, camera, handles }
}

fn body_material(body: &BodyDescriptor, catalog: &ContentCatalog, scene: &mut Scene) -> Material {
    let map = texture(body.texture_id(), catalog, scene);
    let (roughness, displacement) = match &body.displacement {
        Some(id) => {
            let displacement = texture(id, catalog, scene).map(|texture| Displacement {
                texture,
                scale: DISPLACEMENT_SCALE,
            });
            (ROUGH_BODY_ROUGHNESS, displacement)
        }
        None => (BODY_ROUGHNESS, None),
    };
    Material::Standard {
        color: WHITE,
        roughness,
        metalness: BODY_METALNESS,
        map,
        displacement,
    }
}

/// Resolve a catalog id to a registered texture, degrading to `None`.
fn texture(id: &str, catalog: &ContentCatalog, scene: &mut Scene) -> Option<TextureRef> {
    match catalog.texture_url(id) {
        Ok(url) => Some(scene.register_texture(url)),
        Err(err) => {
            log::warn!("builder: {}; using untextured material", err);
            None
        }
    }
}
