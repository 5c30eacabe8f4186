//! Plane and sphere geometry shared by the dither generators.
//!
//! Overview
//! -----------------
//! * [`polygon_coords`] places the vertices of a regular polygon on a circle.
//! * [`Hexagon`] is the flat-top hexagon inscribed in the field of view, the region every
//!   random offset must fall into.
//! * [`wrap_ra_dec`] / [`wrap_ra`] bring dithered pointings back into
//!   `RA ∈ [0, 2π)` and `Dec ∈ [−π/2, π/2]`.
//!
//! All angles are in **radians**.
use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector2;

use crate::constants::{Radian, DPI, SQRT_3};

/// Vertices of a regular polygon centred on the origin.
///
/// Vertex `i` sits at angle `rotation + i·2π/n`, measured from the **y-axis**:
/// `x = sin(angle)·radius`, `y = cos(angle)·radius`.
///
/// Arguments
/// -----------------
/// * `nside`: number of vertices.
/// * `radius`: radius of the circumscribing circle.
/// * `rotation`: angle of the first vertex (radians).
///
/// Return
/// ----------
/// * The `nside` vertices, in increasing angle order.
pub fn polygon_coords(nside: usize, radius: f64, rotation: Radian) -> Vec<Vector2<f64>> {
    let each_angle = DPI / nside as f64;
    (0..nside)
        .map(|i| {
            let (sin, cos) = (each_angle * i as f64 + rotation).sin_cos();
            Vector2::new(sin * radius, cos * radius)
        })
        .collect()
}

/// Flat-top regular hexagon with half-diagonal `max_dither`, centred on the origin.
///
/// The hexagon is the intersection of six half-planes:
/// `|y| < h` with `h = √3/2·max_dither`, and the four slanted edges
/// `y ≶ ±√3·x ± √3·max_dither`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hexagon {
    max_dither: Radian,
}

impl Hexagon {
    pub fn new(max_dither: Radian) -> Self {
        Hexagon { max_dither }
    }

    pub fn max_dither(&self) -> Radian {
        self.max_dither
    }

    /// Half of the hexagon height (distance from the centre to the flat edges).
    pub fn half_height(&self) -> f64 {
        self.max_dither * SQRT_3 / 2.0
    }

    /// Strict containment, points lying on an edge are rejected.
    pub fn contains_strict(&self, x: f64, y: f64) -> bool {
        let b = SQRT_3 * self.max_dither;
        let h = self.half_height();
        y < SQRT_3 * x + b
            && y > SQRT_3 * x - b
            && y < -SQRT_3 * x + b
            && y > -SQRT_3 * x - b
            && y < h
            && y > -h
    }

    /// Inclusive containment, points lying on an edge are accepted.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let b = SQRT_3 * self.max_dither;
        let h = self.half_height();
        y <= SQRT_3 * x + b
            && y >= SQRT_3 * x - b
            && y <= -SQRT_3 * x + b
            && y >= -SQRT_3 * x - b
            && y <= h
            && y >= -h
    }
}

/// Wrap a single RA value into `[0, 2π)`.
#[inline]
pub fn wrap_ra(ra: Radian) -> Radian {
    let wrapped = ra.rem_euclid(DPI);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a pointing so that `RA ∈ [0, 2π)` and `Dec ∈ [−π/2, π/2]`.
///
/// A declination beyond a pole is reflected back over it and the right ascension is moved to
/// the other side of the sphere:
/// * `dec < −π/2` → `dec' = −(π + dec)`, `ra' = ra − π`
/// * `dec > π/2` → `dec' = π − dec`, `ra' = ra − π`
///
/// Declinations outside `[−π, π)` are first folded by whole turns, which describes the same
/// point on the sphere. Both reflected and untouched right ascensions then go through
/// [`wrap_ra`]. Values already in range are returned unchanged, so the function is idempotent.
///
/// Arguments
/// -----------------
/// * `ra`: right ascension (radians), any value.
/// * `dec`: declination (radians), any finite value.
///
/// Return
/// ----------
/// * `(ra, dec)` wrapped into range.
pub fn wrap_ra_dec(ra: Radian, dec: Radian) -> (Radian, Radian) {
    let mut ra = ra;
    let mut dec = dec;

    if !(-PI..PI).contains(&dec) {
        dec = (dec + PI).rem_euclid(DPI) - PI;
    }

    if dec < -FRAC_PI_2 {
        dec = -(PI + dec);
        ra -= PI;
    } else if dec > FRAC_PI_2 {
        dec = PI - dec;
        ra -= PI;
    }

    (wrap_ra(ra), dec)
}

/// Element-wise [`wrap_ra_dec`] over two parallel columns, in place.
///
/// Panics
/// ----------
/// * Debug builds only: panics if the slice lengths do not match.
pub fn wrap_ra_dec_slices(ra: &mut [Radian], dec: &mut [Radian]) {
    debug_assert_eq!(ra.len(), dec.len(), "RA/DEC length mismatch");
    for (r, d) in ra.iter_mut().zip(dec.iter_mut()) {
        (*r, *d) = wrap_ra_dec(*r, *d);
    }
}
