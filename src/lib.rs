// Tile grid viewer core: orbit camera, cursor picking and tile selection,
// plus the wgpu renderer the binary drives.

pub mod engine;
pub mod game;
pub mod renderer;
