//! Error types shared across the crate

use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a placeable model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Failed to read model '{path}': {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("Model '{0}' contains no geometry")]
    Empty(PathBuf),
    #[error("Model source not found: {0}")]
    NotFound(String),
    #[error("Loader worker stopped before answering")]
    WorkerGone,
}

/// Rendering setup and per-frame failures
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("No compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("Pipeline '{0}' failed: {1}")]
    Pipeline(String, String),
    #[error("GPU out of memory")]
    OutOfMemory,
}

/// Failures that end the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
