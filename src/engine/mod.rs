// Engine module - tile grid, orbit camera, picking and selection
// Everything except debug_overlay and mesh is GPU-free and unit tested

pub mod camera;
pub mod debug_overlay;
pub mod error;
pub mod grid;
pub mod input;
pub mod mesh;
pub mod picking;
pub mod raycast;
pub mod selection;
