//! Small polygon offset sets, cycled season by season.
use std::f64::consts::{FRAC_PI_2, PI};
use std::iter;

use nalgebra::Vector2;

use crate::{constants::Radian, geometry::polygon_coords};

use super::OffsetSequence;

/// Radius divisor of the inner polygon.
const INNER_SCALE: f64 = 2.5;

/// Radius divisor of the outer pentagon.
const OUTER_SCALE: f64 = 1.3;

/// Two pentagons: an inner one (radius `max_dither/2.5`) followed by an inverted outer one
/// (radius `max_dither/1.3`, rotated by π).
///
/// The outer vertices are cycled by two positions, so the outer sequence starts on the
/// vertex lying between inner vertices 4 and 0. 10 offsets.
pub fn pentagon_offsets(max_dither: Radian) -> OffsetSequence {
    let inner = polygon_coords(5, max_dither / INNER_SCALE, 0.0);
    let mut outer = polygon_coords(5, max_dither / OUTER_SCALE, PI);
    outer.rotate_left(2);

    OffsetSequence::from_points(inner.into_iter().chain(outer))
}

/// The origin, an inner diamond (radius `max_dither/2.5`, rotated by π/2) and an outer
/// pentagon (radius `max_dither/1.3`). 10 offsets.
pub fn pentagon_diamond_offsets(max_dither: Radian) -> OffsetSequence {
    let diamond = polygon_coords(4, max_dither / INNER_SCALE, FRAC_PI_2);
    let pentagon = polygon_coords(5, max_dither / OUTER_SCALE, 0.0);

    OffsetSequence::from_points(
        iter::once(Vector2::zeros())
            .chain(diamond)
            .chain(pentagon),
    )
}
