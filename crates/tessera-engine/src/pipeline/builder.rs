use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::binding::BindingSlot;
use crate::error::{GpuError, Result};
use crate::render::RenderCtx;
use crate::resources::Vertex;

use super::shader::{input_locations, ShaderStage};

static NEXT_LAYOUT_ID: AtomicU64 = AtomicU64::new(1);

/// Compiled render pipeline for vertices of type `V`.
///
/// Immutable once built; reused for every frame. The vertex type parameter
/// ties the pipeline to buffers with the same layout.
pub struct Pipeline<V: Vertex> {
    raw: wgpu::RenderPipeline,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    slots: Vec<BindingSlot>,
    topology: wgpu::PrimitiveTopology,
    layout_id: u64,
    label: String,
    _vertex: PhantomData<V>,
}

impl<V: Vertex> Pipeline<V> {
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.raw
    }

    /// Declared binding slots for `@group(0)`; empty when the layout is inferred.
    pub fn binding_layout(&self) -> &[BindingSlot] {
        &self.slots
    }

    pub(crate) fn bind_group_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.bind_group_layout.as_ref()
    }

    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }

    /// Process-unique id shared with every binding set built against this pipeline.
    pub fn layout_id(&self) -> u64 {
        self.layout_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Builds a [`Pipeline`] from a vertex/fragment shader pair.
///
/// Both stages are required up front; layout and topology are optional and
/// default to an inferred layout and a triangle strip.
pub struct PipelineBuilder<V: Vertex> {
    label: String,
    vertex: ShaderStage,
    fragment: ShaderStage,
    slots: Vec<BindingSlot>,
    topology: wgpu::PrimitiveTopology,
    _vertex: PhantomData<V>,
}

impl<V: Vertex> PipelineBuilder<V> {
    pub fn new(label: impl Into<String>, vertex: ShaderStage, fragment: ShaderStage) -> Self {
        Self {
            label: label.into(),
            vertex,
            fragment,
            slots: Vec::new(),
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            _vertex: PhantomData,
        }
    }

    /// Explicit `@group(0)` layout. Without one, wgpu infers it from the shaders.
    pub fn binding_layout(mut self, slots: impl Into<Vec<BindingSlot>>) -> Self {
        self.slots = slots.into();
        self
    }

    pub fn topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Compiles both stages and checks they link against `V`'s layout.
    pub fn validate(&self) -> Result<()> {
        let link_error = |message: String| GpuError::PipelineCreation {
            label: self.label.clone(),
            message,
        };

        let vs_module = self.vertex.compile()?;
        let fs_module = self.fragment.compile()?;

        let vs_entry = self
            .vertex
            .entry(&vs_module, naga::ShaderStage::Vertex)
            .ok_or_else(|| {
                link_error(format!(
                    "`{}` has no vertex entry point `{}`",
                    self.vertex.label, self.vertex.entry_point
                ))
            })?;
        self.fragment
            .entry(&fs_module, naga::ShaderStage::Fragment)
            .ok_or_else(|| {
                link_error(format!(
                    "`{}` has no fragment entry point `{}`",
                    self.fragment.label, self.fragment.entry_point
                ))
            })?;

        for location in input_locations(&vs_module, vs_entry) {
            if !V::ATTRS.iter().any(|a| a.shader_location == location) {
                return Err(link_error(format!(
                    "vertex input @location({location}) is not provided by the vertex layout"
                )));
            }
        }

        let mut seen = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            if seen.contains(&slot.binding) {
                return Err(link_error(format!(
                    "binding {} is declared twice",
                    slot.binding
                )));
            }
            seen.push(slot.binding);
        }

        Ok(())
    }

    /// Compiles the stages and creates the pipeline for `ctx.surface_format`.
    pub fn build(self, ctx: &RenderCtx<'_>) -> Result<Pipeline<V>> {
        self.validate()?;

        let vs = create_module(ctx, &self.vertex);
        let fs = create_module(ctx, &self.fragment);

        let bind_group_layout = (!self.slots.is_empty()).then(|| {
            let entries: Vec<wgpu::BindGroupLayoutEntry> =
                self.slots.iter().map(BindingSlot::layout_entry).collect();
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} bgl", self.label)),
                    entries: &entries,
                })
        });

        let pipeline_layout = bind_group_layout.as_ref().map(|bgl| {
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(&format!("{} pipeline layout", self.label)),
                    bind_group_layouts: &[bgl],
                    immediate_size: 0,
                })
        });

        let raw = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&self.label),
            layout: pipeline_layout.as_ref(),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(self.vertex.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &[V::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(self.fragment.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let layout_id = NEXT_LAYOUT_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "built pipeline `{}` (id {layout_id}, {:?}, {} binding slots)",
            self.label,
            self.topology,
            self.slots.len()
        );

        Ok(Pipeline {
            raw,
            bind_group_layout,
            slots: self.slots,
            topology: self.topology,
            layout_id,
            label: self.label,
            _vertex: PhantomData,
        })
    }
}

fn create_module(ctx: &RenderCtx<'_>, stage: &ShaderStage) -> wgpu::ShaderModule {
    ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&stage.label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(stage.source.as_ref())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{PositionVertex, TexturedVertex};

    const VS_POS: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
"#;

    const VS_UV: &str = r#"
struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    return VsOut(vec4<f32>(position, 1.0), uv);
}
"#;

    const FS_RED: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
"#;

    fn stages(vs: &'static str, fs: &'static str) -> (ShaderStage, ShaderStage) {
        (
            ShaderStage::wgsl("vs", vs, "vs_main"),
            ShaderStage::wgsl("fs", fs, "fs_main"),
        )
    }

    #[test]
    fn position_pipeline_validates() {
        let (vs, fs) = stages(VS_POS, FS_RED);
        assert!(PipelineBuilder::<PositionVertex>::new("tri", vs, fs).validate().is_ok());
    }

    #[test]
    fn default_topology_is_triangle_strip() {
        let (vs, fs) = stages(VS_POS, FS_RED);
        let b = PipelineBuilder::<PositionVertex>::new("tri", vs, fs);
        assert_eq!(b.topology, wgpu::PrimitiveTopology::TriangleStrip);
    }

    #[test]
    fn uv_input_requires_uv_attribute() {
        let (vs, fs) = stages(VS_UV, FS_RED);
        assert!(PipelineBuilder::<TexturedVertex>::new("quad", vs.clone(), fs.clone())
            .validate()
            .is_ok());
        assert!(matches!(
            PipelineBuilder::<PositionVertex>::new("quad", vs, fs).validate(),
            Err(GpuError::PipelineCreation { .. })
        ));
    }

    #[test]
    fn missing_entry_point_is_link_error() {
        let vs = ShaderStage::wgsl("vs", VS_POS, "main");
        let fs = ShaderStage::wgsl("fs", FS_RED, "fs_main");
        assert!(matches!(
            PipelineBuilder::<PositionVertex>::new("tri", vs, fs).validate(),
            Err(GpuError::PipelineCreation { .. })
        ));
    }

    #[test]
    fn broken_fragment_is_compile_error() {
        let vs = ShaderStage::wgsl("vs", VS_POS, "vs_main");
        let fs = ShaderStage::wgsl("fs", "fn fs_main( {", "fs_main");
        assert!(matches!(
            PipelineBuilder::<PositionVertex>::new("tri", vs, fs).validate(),
            Err(GpuError::ShaderCompile { label, .. }) if label == "fs"
        ));
    }

    #[test]
    fn duplicate_binding_slot_is_rejected() {
        let (vs, fs) = stages(VS_POS, FS_RED);
        let frag = wgpu::ShaderStages::FRAGMENT;
        let b = PipelineBuilder::<PositionVertex>::new("tri", vs, fs).binding_layout(vec![
            BindingSlot::sampler(1, frag),
            BindingSlot::texture(1, frag),
        ]);
        assert!(matches!(b.validate(), Err(GpuError::PipelineCreation { .. })));
    }
}
