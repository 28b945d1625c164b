//! Renders the Voronoi shaders offscreen and checks cell colors. Every test
//! returns early when no adapter is available.

use tessera_demos::voronoi::{pipeline_builder, FULLSCREEN_QUAD};
use tessera_engine::binding::BindingSet;
use tessera_engine::coords::Vec2;
use tessera_engine::device::{acquire, GpuInit};
use tessera_engine::render::{OffscreenTarget, RenderCtx, RenderSession};
use tessera_engine::resources::control_points::pack_control_points;
use tessera_engine::resources::{ParameterBuffer, Sampler, Texture2d, TextureData, VertexBuffer};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const SIDE: u32 = 64;

/// 2x2 image: red, green / blue, white.
#[rustfmt::skip]
const QUADRANTS: [u8; 16] = [
    255, 0, 0, 255,    0, 255, 0, 255,
    0, 0, 255, 255,    255, 255, 255, 255,
];

fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    match pollster::block_on(acquire(&instance, None, &GpuInit::default())) {
        Ok((_adapter, device, queue)) => Some((device, queue)),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

/// Draws one Voronoi frame for `points` over [`QUADRANTS`] and reads it back.
fn render(ctx: &RenderCtx<'_>, points: &[Vec2]) -> Vec<u8> {
    let packed = pack_control_points(points);
    let pipeline = pipeline_builder(packed.len() / 4)
        .build(ctx)
        .expect("voronoi pipeline");

    let params = ParameterBuffer::new(ctx, "points", &packed).expect("params");
    let texture =
        Texture2d::from_rgba(ctx, "image", TextureData::new(2, 2, &QUADRANTS)).expect("texture");
    let sampler = Sampler::linear(ctx, "sampler");
    let set = BindingSet::bind(
        ctx,
        &pipeline,
        &[params.binding(0), sampler.binding(1), texture.binding(2)],
    )
    .expect("binding set");

    let vb = VertexBuffer::new(ctx, "quad", &FULLSCREEN_QUAD).expect("quad");
    let session = RenderSession::new(pipeline, vb, Some(set)).expect("session");

    let target = OffscreenTarget::new(ctx, "voronoi target", SIDE, SIDE);
    target.render(ctx, |t| session.record(t));
    target.read_pixels(ctx).expect("readback")
}

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * SIDE + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

#[test]
fn corners_take_the_texel_under_their_nearest_point() {
    let Some((device, queue)) = device() else { return };
    let ctx = RenderCtx::new(&device, &queue, FORMAT);

    let pixels = render(&ctx, &[Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.9)]);

    assert_eq!(pixel(&pixels, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(&pixels, SIDE - 1, SIDE - 1), [255, 255, 255, 255]);
}

#[test]
fn coincident_points_darken_as_a_border() {
    let Some((device, queue)) = device() else { return };
    let ctx = RenderCtx::new(&device, &queue, FORMAT);

    // Every fragment is equidistant from both points, so it lies on their
    // shared edge and is drawn at the border shade.
    let pixels = render(&ctx, &[Vec2::new(0.1, 0.1), Vec2::new(0.1, 0.1)]);

    let [r, g, b, a] = pixel(&pixels, 0, 0);
    assert!((80..=100).contains(&r), "border red channel was {r}");
    assert_eq!((g, b, a), (0, 0, 255));
}
