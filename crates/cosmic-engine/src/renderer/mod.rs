pub mod camera;
pub mod instance;
pub mod traits;

pub use camera::{CameraUniform, PerspectiveCamera, Ray};
pub use instance::{RenderBuffer, RenderInstance};
pub use traits::{FrameData, Renderer};
