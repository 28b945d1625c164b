use winit::dpi::PhysicalSize;

/// Returns the drawable size in physical pixels for a client area of
/// `width × height` logical pixels at the given scale factor.
///
/// Each axis is rounded half away from zero and clamped to at least one pixel,
/// since a surface cannot be configured with a zero extent.
pub fn surface_size(width: f64, height: f64, scale_factor: f64) -> PhysicalSize<u32> {
    let axis = |v: f64| (v * scale_factor).round().max(1.0) as u32;
    PhysicalSize::new(axis(width), axis(height))
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    caps.formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}
