//! Render pipeline construction.
//!
//! A pipeline links a vertex/fragment shader pair with a vertex layout (from
//! the [`Vertex`](crate::resources::Vertex) type), an optional explicit binding
//! layout and a primitive topology. Shaders are compiled and link-checked on
//! the host before anything is created on the device.

mod builder;
mod shader;

pub use builder::{Pipeline, PipelineBuilder};
pub use shader::ShaderStage;
