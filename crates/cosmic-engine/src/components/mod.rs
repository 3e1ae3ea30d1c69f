pub mod entity;
pub mod light;
pub mod mesh;
pub mod starfield;
