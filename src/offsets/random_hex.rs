//! Uniform random offsets inside the dither hexagon.
//!
//! Candidates are drawn area-uniformly in the disk of radius `max_dither`
//! (`r = √U·max_dither`, `θ = 2πU`) and rejected when they fall outside the flat-top hexagon.
//! The first `noffsets` survivors are kept, in the order they were drawn.
use nalgebra::Vector2;
use rand::Rng;
use tracing::debug;

use crate::{
    constants::{Radian, DPI},
    dither_errors::DitherError,
    geometry::Hexagon,
};

use super::OffsetSequence;

/// Draw `noffsets` random offsets inside the hexagon of half-diagonal `max_dither`.
///
/// Arguments
/// -----------------
/// * `max_dither`: half-diagonal of the hexagon, in radians.
/// * `noffsets`: number of offsets requested.
/// * `candidate_factor`: number of disk candidates drawn per requested offset.
/// * `rng`: random generator. All the radii are drawn before all the angles.
///
/// Return
/// ----------
/// * `Ok(OffsetSequence)` with exactly `noffsets` entries.
/// * `Err(DitherError::InsufficientRandomYield)` if fewer than `noffsets` candidates fell
///   inside the hexagon. The sequence is never returned truncated.
/// * `Err(DitherError::InvalidDitherParameter)` if the candidate count overflows.
pub fn random_hex_offsets(
    max_dither: Radian,
    noffsets: usize,
    candidate_factor: usize,
    rng: &mut impl Rng,
) -> Result<OffsetSequence, DitherError> {
    let num_points = noffsets.checked_mul(candidate_factor).ok_or_else(|| {
        DitherError::InvalidDitherParameter(format!(
            "{noffsets} offsets × candidate_factor {candidate_factor} overflows"
        ))
    })?;

    let radii: Vec<f64> = (0..num_points)
        .map(|_| rng.random::<f64>().sqrt() * max_dither)
        .collect();
    let thetas: Vec<f64> = (0..num_points)
        .map(|_| rng.random::<f64>() * DPI)
        .collect();

    let hexagon = Hexagon::new(max_dither);
    let accepted: Vec<Vector2<f64>> = radii
        .iter()
        .zip(&thetas)
        .map(|(r, theta)| {
            let (sin, cos) = theta.sin_cos();
            Vector2::new(r * cos, r * sin)
        })
        .filter(|p| hexagon.contains_strict(p.x, p.y))
        .take(noffsets)
        .collect();

    debug!(
        needed = noffsets,
        candidates = num_points,
        accepted = accepted.len(),
        "random hexagon offsets"
    );

    if accepted.len() < noffsets {
        return Err(DitherError::InsufficientRandomYield {
            needed: noffsets,
            accepted: accepted.len(),
        });
    }

    Ok(OffsetSequence::from_points(accepted))
}
