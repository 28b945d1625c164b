//! Texture sources for the Voronoi demo.

use std::path::Path;

use anyhow::Context;

use tessera_engine::resources::TextureData;

/// Decoded RGBA8 image, row-major, 4 bytes per texel.
#[derive(Debug, Clone)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// Borrowed view for [`Texture2d::from_rgba`](tessera_engine::resources::Texture2d::from_rgba).
    pub fn as_texture_data(&self) -> TextureData<'_> {
        TextureData::new(self.width, self.height, &self.pixels)
    }
}

/// Reads and decodes an image file (PNG, JPEG, BMP, GIF or WebP) to RGBA8.
pub fn load_image(path: &Path) -> anyhow::Result<RgbaImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image `{}`", path.display()))?;
    decode_image(&bytes).with_context(|| format!("failed to decode image `{}`", path.display()))
}

/// Decodes in-memory image bytes to RGBA8.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let img = image::load_from_memory(bytes).context("unsupported or corrupt image data")?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::debug!("decoded {width}x{height} image");

    Ok(RgbaImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Procedural stand-in when no image is given: red rises left to right,
/// green top to bottom, blue fixed at half. Fully opaque.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    let width = width.max(1);
    let height = height.max(1);

    let ramp = |i: u32, n: u32| -> u8 {
        if n <= 1 {
            0
        } else {
            ((i as f32 / (n - 1) as f32) * 255.0).round() as u8
        }
    };

    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[ramp(x, width), ramp(y, height), 128, 255]);
        }
    }

    RgbaImage {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── gradient ─────────────────────────────────────────────────────────

    #[test]
    fn gradient_has_four_bytes_per_texel() {
        let img = gradient_image(16, 8);
        assert_eq!(img.pixels.len(), 16 * 8 * 4);
    }

    #[test]
    fn gradient_corners() {
        let img = gradient_image(4, 4);
        let texel = |x: u32, y: u32| {
            let i = ((y * img.width + x) * 4) as usize;
            &img.pixels[i..i + 4]
        };
        assert_eq!(texel(0, 0), &[0, 0, 128, 255]);
        assert_eq!(texel(3, 3), &[255, 255, 128, 255]);
    }

    #[test]
    fn gradient_clamps_zero_size() {
        let img = gradient_image(0, 0);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.pixels.len(), 4);
    }

    // ── decoding ─────────────────────────────────────────────────────────

    #[test]
    fn rejects_garbage_bytes() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn decodes_png() {
        let mut png = Vec::new();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode png");

        let img = decode_image(&png).expect("decode png");
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(&img.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_image(Path::new("/nonexistent/tessera.png")).unwrap_err();
        assert!(format!("{err:#}").contains("tessera.png"));
    }
}
