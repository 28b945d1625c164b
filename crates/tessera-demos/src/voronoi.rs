//! Voronoi mosaic: a full-screen quad whose fragment stage colours each cell
//! with the image texel under the cell's control point.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use tessera_engine::binding::{BindingSet, BindingSlot};
use tessera_engine::coords::Vec2;
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::pipeline::{PipelineBuilder, ShaderStage};
use tessera_engine::render::{RenderCtx, RenderSession};
use tessera_engine::resources::control_points::{
    control_point_rng, generate_control_points, pack_control_points, RadialBias,
};
use tessera_engine::resources::{
    ParameterBuffer, Sampler, Texture2d, TexturedVertex, VertexBuffer,
};

use crate::assets::{gradient_image, load_image};

const VERTEX_SHADER: &str = include_str!("shaders/quad.vert.wgsl");
const FRAGMENT_TEMPLATE: &str = include_str!("shaders/voronoi.frag.wgsl");

/// Placeholder in the fragment shader for the uniform array length.
const PAIRS_PLACEHOLDER: &str = "{{PAIRS}}";

/// Side of the procedural texture used when no image is given.
const FALLBACK_TEXTURE_SIZE: u32 = 256;

/// Environment variable holding an optional `u64` control-point seed.
pub const SEED_ENV: &str = "TESSERA_SEED";

/// Two triangles covering clip space, as a 4-vertex strip. UV origin is the
/// top-left corner of the image.
pub const FULLSCREEN_QUAD: [TexturedVertex; 4] = [
    TexturedVertex::new([1.0, 1.0, 0.0], [1.0, 0.0]),
    TexturedVertex::new([-1.0, 1.0, 0.0], [0.0, 0.0]),
    TexturedVertex::new([1.0, -1.0, 0.0], [1.0, 1.0]),
    TexturedVertex::new([-1.0, -1.0, 0.0], [0.0, 1.0]),
];

/// `@group(0)` of the Voronoi fragment shader.
pub const VORONOI_BINDINGS: [BindingSlot; 3] = [
    BindingSlot::uniform_buffer(0, wgpu::ShaderStages::FRAGMENT),
    BindingSlot::sampler(1, wgpu::ShaderStages::FRAGMENT),
    BindingSlot::texture(2, wgpu::ShaderStages::FRAGMENT),
];

/// Voronoi demo configuration.
#[derive(Debug, Clone)]
pub struct VoronoiConfig {
    /// Number of control points (cells).
    pub num_points: usize,
    pub bias: RadialBias,
    /// Fixed RNG seed; `None` draws a fresh one each run.
    pub seed: Option<u64>,
    /// Image to tile; `None` uses a procedural gradient.
    pub image_path: Option<PathBuf>,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            num_points: 100,
            bias: RadialBias::default(),
            seed: None,
            image_path: None,
        }
    }
}

impl VoronoiConfig {
    /// Reads the image path from the first argument (after the program name)
    /// and the seed from the value of [`SEED_ENV`].
    pub fn from_args<I>(args: I, seed_var: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let image_path = args.into_iter().nth(1).map(PathBuf::from);

        let seed = seed_var
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{SEED_ENV}={s:?} is not a u64"))
            })
            .transpose()?;

        Ok(Self {
            image_path,
            seed,
            ..Self::default()
        })
    }

    /// Rejects configurations that cannot produce a Voronoi diagram.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_points > 0, "voronoi needs at least one control point");
        Ok(())
    }
}

/// Control points for `config`, plus the seed that produced them.
pub fn generate_points(config: &VoronoiConfig) -> (Vec<Vec2>, u64) {
    let (mut rng, seed) = control_point_rng(config.seed);
    let points = generate_control_points(&mut rng, config.num_points, &config.bias);
    (points, seed)
}

/// Fragment shader source for a uniform array of `pairs` vec4 slots.
pub fn fragment_source(pairs: usize) -> String {
    FRAGMENT_TEMPLATE.replace(PAIRS_PLACEHOLDER, &pairs.to_string())
}

/// Pipeline builder for the quad + Voronoi shaders sized for `pairs` slots.
pub fn pipeline_builder(pairs: usize) -> PipelineBuilder<TexturedVertex> {
    PipelineBuilder::new(
        "voronoi pipeline",
        ShaderStage::wgsl("quad.vert", VERTEX_SHADER, "vs_main"),
        ShaderStage::wgsl("voronoi.frag", fragment_source(pairs), "fs_main"),
    )
    .binding_layout(VORONOI_BINDINGS)
}

/// GPU objects that must outlive the binding set referencing them.
struct VoronoiResources {
    _points: ParameterBuffer,
    _texture: Texture2d,
    _sampler: Sampler,
}

/// Voronoi demo state.
pub struct VoronoiDemo {
    config: VoronoiConfig,
    session: Option<RenderSession<TexturedVertex>>,
    _resources: Option<VoronoiResources>,
}

impl VoronoiDemo {
    pub fn new(config: VoronoiConfig) -> Self {
        Self {
            config,
            session: None,
            _resources: None,
        }
    }
}

impl App for VoronoiDemo {
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.config.validate()?;

        let (points, seed) = generate_points(&self.config);
        log::info!("generated {} control points (seed {seed})", points.len());

        let packed = pack_control_points(&points);
        let pairs = packed.len() / 4;

        let image = match &self.config.image_path {
            Some(path) => load_image(path)?,
            None => {
                log::info!("no image given, using a procedural gradient");
                gradient_image(FALLBACK_TEXTURE_SIZE, FALLBACK_TEXTURE_SIZE)
            }
        };

        let pipeline = pipeline_builder(pairs)
            .build(ctx)
            .context("failed to build voronoi pipeline")?;

        let params = ParameterBuffer::new(ctx, "voronoi control points", &packed)
            .context("failed to upload control points")?;
        let texture = Texture2d::from_rgba(ctx, "voronoi image", image.as_texture_data())
            .context("failed to upload image")?;
        let sampler = Sampler::linear(ctx, "voronoi sampler");

        let binding_set = BindingSet::bind(
            ctx,
            &pipeline,
            &[params.binding(0), sampler.binding(1), texture.binding(2)],
        )?;

        let vertex_buffer = VertexBuffer::new(ctx, "fullscreen quad", &FULLSCREEN_QUAD)?;

        self.session = Some(RenderSession::new(
            pipeline,
            vertex_buffer,
            Some(binding_set),
        )?);
        self._resources = Some(VoronoiResources {
            _points: params,
            _texture: texture,
            _sampler: sampler,
        });

        log::info!("voronoi demo ready ({pairs} uniform slots)");
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let session = self
            .session
            .as_ref()
            .context("frame requested before setup")?;

        session.render_frame(ctx.gpu)?;
        Ok(AppControl::Continue)
    }
}
