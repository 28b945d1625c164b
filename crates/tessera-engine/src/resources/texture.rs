use crate::binding::{BindingEntry, BindingResource};
use crate::error::{GpuError, Result};
use crate::render::RenderCtx;

/// Fixed 8-bit-per-channel color format used for every sampled texture.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Decoded image pixels, tightly packed RGBA8 rows.
#[derive(Debug, Copy, Clone)]
pub struct TextureData<'a> {
    pub width: u32,
    pub height: u32,
    pub rgba: &'a [u8],
}

impl<'a> TextureData<'a> {
    #[inline]
    pub fn new(width: u32, height: u32, rgba: &'a [u8]) -> Self {
        Self { width, height, rgba }
    }

    fn validate(&self, label: &str, max_dimension: u32) -> Result<()> {
        let invalid = |reason: String| GpuError::InvalidTexture {
            label: label.to_string(),
            reason,
        };

        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!("zero extent {}x{}", self.width, self.height)));
        }
        if self.width > max_dimension || self.height > max_dimension {
            return Err(invalid(format!(
                "{}x{} exceeds the {max_dimension}px limit",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(invalid(format!(
                "expected {expected} bytes of RGBA8, got {}",
                self.rgba.len()
            )));
        }
        Ok(())
    }
}

/// A 2D texture populated once from decoded pixels.
///
/// Draw calls only ever read it through [`Texture2d::view`].
pub struct Texture2d {
    view: wgpu::TextureView,
    size: wgpu::Extent3d,
}

impl Texture2d {
    /// Allocates a texture matching `data` and copies the pixels in one upload.
    pub fn from_rgba(ctx: &RenderCtx<'_>, label: &str, data: TextureData<'_>) -> Result<Self> {
        data.validate(label, ctx.device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("uploaded texture `{label}` ({}x{})", data.width, data.height);

        Ok(Self { view, size })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.size
    }

    pub fn binding(&self, slot: u32) -> BindingEntry<'_> {
        BindingEntry::new(slot, BindingResource::TextureView(&self.view))
    }
}

/// Texture sampler with a single filter mode for magnification and minification.
pub struct Sampler {
    raw: wgpu::Sampler,
}

impl Sampler {
    pub fn new(ctx: &RenderCtx<'_>, label: &str, filter: wgpu::FilterMode) -> Self {
        let raw = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        Self { raw }
    }

    /// Bilinear sampler, the only one the demos use.
    pub fn linear(ctx: &RenderCtx<'_>, label: &str) -> Self {
        Self::new(ctx, label, wgpu::FilterMode::Linear)
    }

    pub fn binding(&self, slot: u32) -> BindingEntry<'_> {
        BindingEntry::new(slot, BindingResource::Sampler(&self.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_data_accepts_packed_rgba() {
        let px = vec![0u8; 2 * 3 * 4];
        assert!(TextureData::new(2, 3, &px).validate("t", 8192).is_ok());
    }

    #[test]
    fn texture_data_rejects_zero_extent() {
        assert!(matches!(
            TextureData::new(0, 4, &[]).validate("t", 8192),
            Err(GpuError::InvalidTexture { .. })
        ));
    }

    #[test]
    fn texture_data_rejects_short_pixels() {
        let px = vec![0u8; 15];
        assert!(TextureData::new(2, 2, &px).validate("t", 8192).is_err());
    }

    #[test]
    fn texture_data_rejects_oversized() {
        let px = vec![0u8; 4 * 4];
        assert!(TextureData::new(4, 1, &px).validate("t", 2).is_err());
    }
}
