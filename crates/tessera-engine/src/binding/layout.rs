use std::fmt;

/// Resource kind a binding slot expects.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindingKind {
    UniformBuffer,
    Sampler,
    Texture,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BindingKind::UniformBuffer => "uniform buffer",
            BindingKind::Sampler => "sampler",
            BindingKind::Texture => "texture view",
        };
        f.write_str(s)
    }
}

/// One declared slot of a binding layout (`@group(0) @binding(n)`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindingSlot {
    pub binding: u32,
    pub kind: BindingKind,
    pub visibility: wgpu::ShaderStages,
}

impl BindingSlot {
    #[inline]
    pub const fn new(binding: u32, kind: BindingKind, visibility: wgpu::ShaderStages) -> Self {
        Self {
            binding,
            kind,
            visibility,
        }
    }

    pub const fn uniform_buffer(binding: u32, visibility: wgpu::ShaderStages) -> Self {
        Self::new(binding, BindingKind::UniformBuffer, visibility)
    }

    /// Filtering sampler.
    pub const fn sampler(binding: u32, visibility: wgpu::ShaderStages) -> Self {
        Self::new(binding, BindingKind::Sampler, visibility)
    }

    /// Filterable 2D float texture.
    pub const fn texture(binding: u32, visibility: wgpu::ShaderStages) -> Self {
        Self::new(binding, BindingKind::Texture, visibility)
    }

    pub(crate) fn layout_entry(&self) -> wgpu::BindGroupLayoutEntry {
        let ty = match self.kind {
            BindingKind::UniformBuffer => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingKind::Sampler => {
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
            }
            BindingKind::Texture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
        };

        wgpu::BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility,
            ty,
            count: None,
        }
    }
}
