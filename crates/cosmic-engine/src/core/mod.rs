pub mod pending;
pub mod rng;
pub mod scene;
pub mod time;
