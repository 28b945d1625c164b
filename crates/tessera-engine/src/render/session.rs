use std::ops::Range;

use crate::binding::{BindingMismatch, BindingSet};
use crate::device::Gpu;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::resources::{Vertex, VertexBuffer};

use super::RenderTarget;

/// Clear color of every frame: opaque black.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// The single draw a session issues per frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
    pub topology: wgpu::PrimitiveTopology,
    pub indexed: bool,
}

impl DrawCall {
    /// Non-indexed, single-instance draw of `vertex_count` vertices.
    pub fn vertices(vertex_count: u32, topology: wgpu::PrimitiveTopology) -> Self {
        Self {
            vertices: 0..vertex_count,
            instances: 0..1,
            topology,
            indexed: false,
        }
    }
}

/// Every GPU handle one demo draws with, plus the per-frame protocol.
///
/// Built once at setup; only the vertex buffer contents may change afterwards.
pub struct RenderSession<V: Vertex> {
    pipeline: Pipeline<V>,
    vertex_buffer: VertexBuffer<V>,
    binding_set: Option<BindingSet>,
}

impl<V: Vertex> RenderSession<V> {
    /// Assembles a session, checking the binding set against the pipeline.
    pub fn new(
        pipeline: Pipeline<V>,
        vertex_buffer: VertexBuffer<V>,
        binding_set: Option<BindingSet>,
    ) -> Result<Self> {
        match (&binding_set, pipeline.binding_layout().is_empty()) {
            (None, false) => return Err(BindingMismatch::Unbound.into()),
            (Some(_), true) => return Err(BindingMismatch::NoLayout.into()),
            (Some(set), false) if set.layout_id() != pipeline.layout_id() => {
                return Err(BindingMismatch::ForeignLayout.into());
            }
            _ => {}
        }

        Ok(Self {
            pipeline,
            vertex_buffer,
            binding_set,
        })
    }

    pub fn pipeline(&self) -> &Pipeline<V> {
        &self.pipeline
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer<V> {
        &self.vertex_buffer
    }

    /// Queues new vertex contents; the next recorded frame draws with them.
    pub fn upload_vertices(&self, queue: &wgpu::Queue, vertices: &[V]) -> Result<()> {
        self.vertex_buffer.write(queue, vertices)
    }

    pub fn draw_call(&self) -> DrawCall {
        DrawCall::vertices(self.vertex_buffer.vertex_count(), self.pipeline.topology())
    }

    /// Records one clear + draw render pass into `target` and returns the
    /// draw it issued.
    pub fn record(&self, target: &mut RenderTarget<'_>) -> DrawCall {
        let draw = self.draw_call();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.pipeline.raw());
        rpass.set_vertex_buffer(0, self.vertex_buffer.raw().slice(..));
        if let Some(set) = &self.binding_set {
            rpass.set_bind_group(0, set.raw(), &[]);
        }
        rpass.draw(draw.vertices.clone(), draw.instances.clone());
        draw
    }

    /// Acquires the surface image, records the frame and submits it.
    ///
    /// Any failure aborts the whole frame; nothing is partially submitted.
    pub fn render_frame(&self, gpu: &Gpu<'_>) -> Result<()> {
        let mut frame = gpu.begin_frame()?;

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.record(&mut target);
        }

        gpu.submit(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_draw_is_three_vertex_strip() {
        let d = DrawCall::vertices(3, wgpu::PrimitiveTopology::TriangleStrip);
        assert_eq!(d.vertices, 0..3);
        assert_eq!(d.instances, 0..1);
        assert!(!d.indexed);
    }

    #[test]
    fn clear_color_is_opaque_black() {
        assert_eq!(
            CLEAR_COLOR,
            wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0
            }
        );
    }
}
