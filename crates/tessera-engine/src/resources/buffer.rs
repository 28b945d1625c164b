use std::marker::PhantomData;

use crate::binding::{BindingEntry, BindingResource};
use crate::error::{GpuError, Result};
use crate::render::RenderCtx;

use super::Vertex;

/// Allocates a buffer of exactly `bytes.len()` bytes and queues the upload.
///
/// `COPY_DST` is always added so the buffer can receive later overwrites.
fn create_and_upload(
    ctx: &RenderCtx<'_>,
    label: &str,
    bytes: &[u8],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: bytes.len() as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    ctx.queue.write_buffer(&buffer, 0, bytes);
    log::debug!("allocated `{label}` ({} bytes, {usage:?})", bytes.len());
    buffer
}

/// Vertex data living on the GPU.
///
/// Typed by the vertex so it can only be drawn by a pipeline built for the same
/// layout. The allocation never grows: [`VertexBuffer::write`] overwrites the
/// contents in place.
pub struct VertexBuffer<V: Vertex> {
    buffer: wgpu::Buffer,
    label: String,
    vertex_count: u32,
    _vertex: PhantomData<V>,
}

impl<V: Vertex> VertexBuffer<V> {
    /// Allocates a buffer sized to `vertices` and uploads them immediately.
    pub fn new(ctx: &RenderCtx<'_>, label: &str, vertices: &[V]) -> Result<Self> {
        if vertices.is_empty() {
            return Err(GpuError::EmptyBuffer(label.to_string()));
        }

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let buffer = create_and_upload(ctx, label, bytes, wgpu::BufferUsages::VERTEX);

        Ok(Self {
            buffer,
            label: label.to_string(),
            vertex_count: (bytes.len() as u64 / V::stride()) as u32,
            _vertex: PhantomData,
        })
    }

    /// Queues an overwrite of the whole buffer.
    ///
    /// Commands submitted after this call observe the new contents.
    pub fn write(&self, queue: &wgpu::Queue, vertices: &[V]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        check_same_size(&self.label, self.size(), bytes.len() as u64)?;
        queue.write_buffer(&self.buffer, 0, bytes);
        Ok(())
    }

    /// Number of vertices (byte length / stride).
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn size(&self) -> u64 {
        self.buffer.size()
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Flat `f32` parameters bound as a uniform buffer.
///
/// Uploaded once and treated as immutable for the session. The values are
/// uploaded as given: matching the shader's uniform layout (for example the
/// 16-byte stride of `array<vec4<f32>, N>`) is up to the caller.
pub struct ParameterBuffer {
    buffer: wgpu::Buffer,
    len: usize,
}

impl ParameterBuffer {
    pub fn new(ctx: &RenderCtx<'_>, label: &str, values: &[f32]) -> Result<Self> {
        let size = std::mem::size_of_val(values) as u64;
        let limit = ctx.device.limits().max_uniform_buffer_binding_size as u64;
        check_uniform_size(label, size, limit)?;

        let buffer = create_and_upload(
            ctx,
            label,
            bytemuck::cast_slice(values),
            wgpu::BufferUsages::UNIFORM,
        );

        Ok(Self {
            buffer,
            len: values.len(),
        })
    }

    /// Number of `f32` values held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn binding(&self, slot: u32) -> BindingEntry<'_> {
        BindingEntry::new(slot, BindingResource::Buffer(&self.buffer))
    }
}

fn check_same_size(label: &str, expected: u64, found: u64) -> Result<()> {
    if expected != found {
        return Err(GpuError::UploadSizeMismatch {
            label: label.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn check_uniform_size(label: &str, size: u64, limit: u64) -> Result<()> {
    if size == 0 {
        return Err(GpuError::EmptyBuffer(label.to_string()));
    }
    if size > limit {
        return Err(GpuError::BufferTooLarge {
            label: label.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_accepts_exact_overwrite() {
        assert!(check_same_size("vbo", 36, 36).is_ok());
    }

    #[test]
    fn same_size_rejects_growth() {
        let err = check_same_size("vbo", 36, 48).unwrap_err();
        assert!(matches!(
            err,
            GpuError::UploadSizeMismatch { expected: 36, found: 48, .. }
        ));
    }

    #[test]
    fn uniform_size_rejects_empty() {
        assert!(matches!(
            check_uniform_size("points", 0, 65536),
            Err(GpuError::EmptyBuffer(_))
        ));
    }

    #[test]
    fn uniform_size_accepts_single_float() {
        // `var<uniform> t: f32` binds 4 bytes.
        assert!(check_uniform_size("time", 4, 65536).is_ok());
    }

    #[test]
    fn uniform_size_rejects_over_limit() {
        assert!(matches!(
            check_uniform_size("points", 65552, 65536),
            Err(GpuError::BufferTooLarge { .. })
        ));
    }

    #[test]
    fn uniform_size_accepts_hundred_points() {
        // 100 points * 2 floats * 4 bytes
        assert!(check_uniform_size("points", 800, 65536).is_ok());
    }
}
