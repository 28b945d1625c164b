//! GPU resource allocation and upload.
//!
//! Every constructor allocates and queues its upload in one step, so a
//! resource handle that exists has already been written on the queue that will
//! later draw with it.

mod buffer;
pub mod control_points;
mod texture;
mod vertex;

pub use buffer::{ParameterBuffer, VertexBuffer};
pub use control_points::UNIFORM_ARRAY_STRIDE;
pub use texture::{Sampler, Texture2d, TextureData, TEXTURE_FORMAT};
pub use vertex::{PositionVertex, TexturedVertex, Vertex};
