//! Error taxonomy for the GPU core.
//!
//! Every failure here is fatal for the caller: setup errors abort before the
//! first frame, `FrameSubmission` ends the session. Application code wraps
//! these in `anyhow` at the runtime boundary.

use thiserror::Error;

use crate::binding::BindingMismatch;

/// Result alias used by every fallible core operation.
pub type Result<T> = std::result::Result<T, GpuError>;

#[derive(Debug, Error)]
pub enum GpuError {
    /// The adapter refused to hand out a logical device.
    #[error("no GPU device available: {0}")]
    NoDevice(#[from] wgpu::RequestDeviceError),

    /// No physical adapter satisfies the request.
    #[error("no suitable GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// The host provides no drawable target (or one with no usable format).
    #[error("no drawable surface: {0}")]
    NoSurface(String),

    #[error("shader `{label}` failed to compile: {message}")]
    ShaderCompile { label: String, message: String },

    /// Shader stages compiled but could not be linked into a pipeline.
    #[error("pipeline `{label}` could not be created: {message}")]
    PipelineCreation { label: String, message: String },

    #[error("binding set does not satisfy the pipeline layout: {0}")]
    BindingMismatch(#[from] BindingMismatch),

    #[error("frame submission failed: {0}")]
    FrameSubmission(#[from] wgpu::SurfaceError),

    /// GPU buffers must hold at least one element.
    #[error("buffer `{0}` would be empty")]
    EmptyBuffer(String),

    #[error("buffer `{label}` is {size} bytes, over the {limit}-byte binding limit")]
    BufferTooLarge { label: String, size: u64, limit: u64 },

    /// In-place overwrites must match the allocated size exactly.
    #[error("buffer `{label}` holds {expected} bytes, upload has {found}")]
    UploadSizeMismatch {
        label: String,
        expected: u64,
        found: u64,
    },

    #[error("texture `{label}` is invalid: {reason}")]
    InvalidTexture { label: String, reason: String },

    /// Copying a rendered image back to host memory failed.
    #[error("readback of `{label}` failed: {message}")]
    Readback { label: String, message: String },
}
