//! Equidistant points along an Archimedean spiral.
//!
//! The spiral `r(θ) = a·θ` is sampled finely for `θ ∈ [1e-4, n_coils·2π)` with step `1e-3`,
//! and `a` is chosen so that the outermost sample sits at `0.85·max_dither`. Its arc length
//! has the closed form
//!
//! ```text
//! s(θ) = a/2 · (θ·√(1 + θ²) + asinh θ)
//! ```
//!
//! `num_points` targets are placed at equal arc-length steps `i·s_max/num_points`, and each
//! target takes the nearest fine sample. Offsets are therefore emitted from the centre
//! outwards, which matters for sequential assignment: early groups get small offsets.
use nalgebra::Vector2;

use crate::constants::{Radian, DPI};

use super::OffsetSequence;

const THETA_START: f64 = 1e-4;
const THETA_STEP: f64 = 1e-3;

/// Fraction of `max_dither` reached by the last coil.
const SPIRAL_EXTENT: f64 = 0.85;

/// Build `num_points` offsets equally spaced along an `n_coils` Archimedean spiral.
///
/// Arguments
/// -----------------
/// * `max_dither`: maximum dither in radians, the spiral ends at `0.85·max_dither`.
/// * `num_points`: number of offsets.
/// * `n_coils`: number of turns of the spiral.
///
/// Return
/// ----------
/// * The offsets, in increasing arc length. Empty if `num_points` or `n_coils` is zero.
pub fn spiral_offsets(max_dither: Radian, num_points: usize, n_coils: usize) -> OffsetSequence {
    let theta_end = n_coils as f64 * DPI;
    let n_samples = ((theta_end - THETA_START) / THETA_STEP).ceil().max(0.0) as usize;
    if n_samples == 0 || num_points == 0 {
        return OffsetSequence::default();
    }

    let theta: Vec<f64> = (0..n_samples)
        .map(|k| THETA_START + k as f64 * THETA_STEP)
        .collect();
    let theta_max = theta[n_samples - 1];
    let a = SPIRAL_EXTENT * max_dither / theta_max;

    let arc: Vec<f64> = theta
        .iter()
        .map(|&t| a / 2.0 * (t * (1.0 + t * t).sqrt() + t.asinh()))
        .collect();
    let step = arc[n_samples - 1] / num_points as f64;

    let points = (0..num_points).map(|i| {
        let k = nearest_sample(&arc, i as f64 * step);
        let r = a * theta[k];
        let (sin, cos) = theta[k].sin_cos();
        Vector2::new(r * cos, r * sin)
    });

    OffsetSequence::from_points(points)
}

/// Index of the sample of the increasing table `arc` closest to `target`.
///
/// On a tie the lower index wins.
fn nearest_sample(arc: &[f64], target: f64) -> usize {
    let upper = arc.partition_point(|&s| s < target);
    if upper == 0 {
        return 0;
    }
    if upper == arc.len() {
        return arc.len() - 1;
    }
    let below = upper - 1;
    if target - arc[below] <= arc[upper] - target {
        below
    } else {
        upper
    }
}
