use bytemuck::{Pod, Zeroable};

/// A host-side vertex with a fixed GPU layout.
///
/// `ATTRS` is the ordered list of `{shader location, byte offset, format}`
/// describing how one stride of raw buffer bytes decodes into shader inputs.
pub trait Vertex: Pod + Zeroable {
    const ATTRS: &'static [wgpu::VertexAttribute];

    /// Byte distance between consecutive vertices.
    fn stride() -> u64 {
        std::mem::size_of::<Self>() as u64
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRS,
        }
    }
}

/// Position-only vertex (xyz).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

impl Vertex for PositionVertex {
    const ATTRS: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![0 => Float32x3];
}

/// Position + texture coordinate vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    #[inline]
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

impl Vertex for TexturedVertex {
    const ATTRS: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // uv
    ];
}
