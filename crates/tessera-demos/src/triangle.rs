//! Animated triangle: one red triangle whose top vertex orbits the origin.

use anyhow::{Context, Result};

use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::pipeline::{PipelineBuilder, ShaderStage};
use tessera_engine::render::{RenderCtx, RenderSession};
use tessera_engine::resources::{PositionVertex, VertexBuffer};

const VERTEX_SHADER: &str = include_str!("shaders/triangle.vert.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/red.frag.wgsl");

/// Vertex positions before the first frame.
pub const INITIAL_VERTICES: [PositionVertex; 3] = [
    PositionVertex::new(0.0, 1.0, 0.0),
    PositionVertex::new(-0.5, -0.5, 0.0),
    PositionVertex::new(0.5, -0.5, 0.0),
];

/// Moves vertex 0 to `(sin t, cos t, 0)`. The other vertices are left alone.
pub fn animate(vertices: &mut [PositionVertex; 3], now: f32) {
    vertices[0].position = [now.sin(), now.cos(), 0.0];
}

/// Triangle demo state.
pub struct TriangleDemo {
    vertices: [PositionVertex; 3],
    session: Option<RenderSession<PositionVertex>>,
}

impl TriangleDemo {
    pub fn new() -> Self {
        Self {
            vertices: INITIAL_VERTICES,
            session: None,
        }
    }
}

impl Default for TriangleDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl App for TriangleDemo {
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let pipeline = PipelineBuilder::<PositionVertex>::new(
            "triangle pipeline",
            ShaderStage::wgsl("triangle.vert", VERTEX_SHADER, "vs_main"),
            ShaderStage::wgsl("red.frag", FRAGMENT_SHADER, "fs_main"),
        )
        .build(ctx)
        .context("failed to build triangle pipeline")?;

        let vertex_buffer = VertexBuffer::new(ctx, "triangle vertices", &self.vertices)
            .context("failed to create triangle vertex buffer")?;

        self.session = Some(RenderSession::new(pipeline, vertex_buffer, None)?);
        log::info!("triangle demo ready");
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let session = self
            .session
            .as_ref()
            .context("frame requested before setup")?;

        animate(&mut self.vertices, ctx.now());
        session.upload_vertices(ctx.gpu.queue(), &self.vertices)?;
        session.render_frame(ctx.gpu)?;

        Ok(AppControl::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPS)
    }

    // ── animate ──────────────────────────────────────────────────────────

    #[test]
    fn at_zero_vertex_zero_is_top() {
        let mut v = INITIAL_VERTICES;
        animate(&mut v, 0.0);
        assert!(close(v[0].position, [0.0, 1.0, 0.0]));
    }

    #[test]
    fn at_quarter_turn_vertex_zero_is_right() {
        let mut v = INITIAL_VERTICES;
        animate(&mut v, std::f32::consts::FRAC_PI_2);
        assert!(close(v[0].position, [1.0, 0.0, 0.0]));
    }

    #[test]
    fn other_vertices_never_move() {
        let mut v = INITIAL_VERTICES;
        for t in [0.0, 0.7, 3.0, 100.0] {
            animate(&mut v, t);
            assert_eq!(v[1], INITIAL_VERTICES[1]);
            assert_eq!(v[2], INITIAL_VERTICES[2]);
        }
    }

    #[test]
    fn vertex_zero_stays_on_unit_circle() {
        let mut v = INITIAL_VERTICES;
        animate(&mut v, 2.5);
        let [x, y, z] = v[0].position;
        assert!((x.hypot(y) - 1.0).abs() < EPS);
        assert_eq!(z, 0.0);
    }

    // ── shaders ──────────────────────────────────────────────────────────

    #[test]
    fn shaders_link_against_position_layout() {
        let builder = PipelineBuilder::<PositionVertex>::new(
            "triangle pipeline",
            ShaderStage::wgsl("triangle.vert", VERTEX_SHADER, "vs_main"),
            ShaderStage::wgsl("red.frag", FRAGMENT_SHADER, "fs_main"),
        );
        builder.validate().expect("triangle shaders validate");
    }
}
