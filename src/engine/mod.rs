pub mod config;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod shader;
