pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod timeline;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod forms;
pub mod error;

// Re-export key types at crate root for convenience
pub use glam::{Vec2, Vec3};
pub use api::config::{EngineConfig, Falloff};
pub use api::session::{Services, Session};
pub use api::types::{EntityId, EntityKind, OverlayIndex};
pub use assets::catalog::{ContentCatalog, ContentEntry};
pub use assets::manifest::{BodyDescriptor, OverlayDescriptor, SceneManifest};
pub use components::entity::{Attribute, Entity, Transform};
pub use components::light::LightComponent;
pub use components::mesh::{Geometry, Material, TextureRef};
pub use components::starfield::StarField;
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use error::{EngineError, Result, ServiceError};
pub use forms::join::{EmailValidator, JoinOutcome, JoinRequest, JoinService};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use renderer::camera::{CameraUniform, PerspectiveCamera, Ray};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use renderer::traits::{FrameData, Renderer};
pub use systems::illumination::{
    AdjustmentRequest, AdjustmentResponse, IlluminationClient, IlluminationService, Throttle,
};
pub use systems::overlay::{JoinPlacement, Overlay, OverlayStyle, Placement, PlacementRecord};
pub use systems::render::BufferRenderer;
pub use timeline::{Easing, Timeline};
