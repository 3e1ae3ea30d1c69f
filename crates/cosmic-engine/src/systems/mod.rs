pub mod builder;
pub mod idle;
pub mod illumination;
pub mod overlay;
pub mod picking;
pub mod render;
