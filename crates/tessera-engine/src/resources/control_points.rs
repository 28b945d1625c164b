//! Voronoi control-point generation.
//!
//! Points are drawn uniformly in the unit square and then pulled toward a
//! center with a radial bias: `d = p - c`, `m = |d|^exponent`, `p' = c + d * m`.
//! With the default exponent of 4 the density falls off quartically with
//! distance, so cells near the center are small and cells at the edges large.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::coords::Vec2;

/// Element stride in bytes of a WGSL uniform array (`array<vec4<f32>, N>`).
pub const UNIFORM_ARRAY_STRIDE: u64 = 16;

/// Radial bias toward `center`.
///
/// The defaults reproduce the reference look; changing either value changes
/// the cell-size distribution.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RadialBias {
    pub center: Vec2,
    pub exponent: i32,
}

impl Default for RadialBias {
    fn default() -> Self {
        Self {
            center: Vec2::new(0.4, 0.4),
            exponent: 4,
        }
    }
}

impl RadialBias {
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        radial_bias(p, self.center, self.exponent)
    }
}

/// One-shot radial remap of `p` around `center`.
#[inline]
pub fn radial_bias(p: Vec2, center: Vec2, exponent: i32) -> Vec2 {
    let d = p - center;
    let m = d.length().powi(exponent);
    center + d * m
}

/// Draws `n` points uniformly in `[0, 1)²` and applies `bias` to each.
pub fn generate_control_points<R: RngExt>(rng: &mut R, n: usize, bias: &RadialBias) -> Vec<Vec2> {
    (0..n)
        .map(|_| {
            let p = Vec2::new(rng.random_range(0.0..1.0f32), rng.random_range(0.0..1.0f32));
            bias.apply(p)
        })
        .collect()
}

/// RNG for control points; a fixed seed reproduces the same diagram.
pub fn control_point_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (StdRng::seed_from_u64(seed), seed)
}

/// Flattens points to `[x0, y0, x1, y1, ...]` for upload as a uniform array.
///
/// The result is padded by repeating the last point until its byte length is a
/// multiple of the uniform array stride. A duplicated point leaves the Voronoi
/// partition unchanged.
pub fn pack_control_points(points: &[Vec2]) -> Vec<f32> {
    let mut out: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();

    if let Some(last) = points.last() {
        let floats_per_stride = (UNIFORM_ARRAY_STRIDE / 4) as usize;
        while out.len() % floats_per_stride != 0 {
            out.extend_from_slice(&[last.x, last.y]);
        }
    }
    out
}
