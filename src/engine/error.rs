// Construction-time errors. Per-frame operations are total and never fail:
// out-of-range input is normalized to `Tile::NONE` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero (got {width} x {height})")]
    EmptyDimension { width: u32, height: u32 },
    #[error("grid dimensions {width} x {height} exceed the tile coordinate range")]
    TooLarge { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("camera setting `{name}` must be finite (got {value})")]
    NonFinite { name: &'static str, value: f32 },
    #[error("field of view must be in (0, 180) degrees (got {0})")]
    FieldOfView(f32),
    #[error("clip planes must satisfy 0 < near < far (got near {near}, far {far})")]
    ClipPlanes { near: f32, far: f32 },
    #[error("distance limits must satisfy 0 < min <= max (got min {min}, max {max})")]
    DistanceLimits { min: f32, max: f32 },
    #[error("pitch must be strictly between -90 and 90 degrees (got {0})")]
    Pitch(f32),
    #[error("camera {0} matrix is not invertible")]
    SingularMatrix(&'static str),
}

/// Anything that can stop the application before or while the window runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] winit::error::EventLoopError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] winit::error::EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("failed to create render surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}
