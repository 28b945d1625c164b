use std::sync::mpsc;

use crate::error::{GpuError, Result};

use super::{RenderCtx, RenderTarget};

/// Bytes per texel of the 8-bit RGBA/BGRA formats the core renders to.
const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch of a texture-to-buffer copy of `width` texels, rounded up to
/// [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`].
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// A color texture to render into without a window, whose pixels can be
/// copied back to the host.
pub struct OffscreenTarget {
    label: String,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: wgpu::Extent3d,
}

impl OffscreenTarget {
    /// Allocates a `width` x `height` target in `ctx.surface_format`.
    pub fn new(ctx: &RenderCtx<'_>, label: &str, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            label: label.to_string(),
            texture,
            view,
            size,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.size
    }

    /// Encodes `record` against this target and submits it.
    pub fn render<R, F>(&self, ctx: &RenderCtx<'_>, record: F) -> R
    where
        F: FnOnce(&mut RenderTarget<'_>) -> R,
    {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("offscreen encoder"),
            });

        let out = {
            let mut target = RenderTarget::new(&mut encoder, &self.view);
            record(&mut target)
        };

        ctx.queue.submit(std::iter::once(encoder.finish()));
        out
    }

    /// Copies the current contents back and returns tightly packed rows of
    /// 4-byte texels, top row first. Blocks until the GPU is done.
    pub fn read_pixels(&self, ctx: &RenderCtx<'_>) -> Result<Vec<u8>> {
        let padded = padded_bytes_per_row(self.size.width);
        let unpadded = (self.size.width * BYTES_PER_PIXEL) as usize;

        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("offscreen readback"),
            size: padded as u64 * self.size.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("offscreen readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.size.height),
                },
            },
            self.size,
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });

        ctx.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| self.readback_error(e.to_string()))?;

        rx.recv()
            .map_err(|e| self.readback_error(e.to_string()))?
            .map_err(|e| self.readback_error(e.to_string()))?;

        let pixels = {
            let mapped = slice.get_mapped_range();
            mapped
                .chunks(padded as usize)
                .flat_map(|row| &row[..unpadded])
                .copied()
                .collect()
        };
        staging.unmap();

        log::debug!(
            "read back `{}` ({}x{})",
            self.label,
            self.size.width,
            self.size.height
        );
        Ok(pixels)
    }

    fn readback_error(&self, message: String) -> GpuError {
        GpuError::Readback {
            label: self.label.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_rows_pad_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(8), 256);
    }

    #[test]
    fn aligned_rows_are_not_padded() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(128), 512);
    }

    #[test]
    fn odd_rows_round_up() {
        assert_eq!(padded_bytes_per_row(65), 512);
    }
}
