//! Hexagonal lattice offsets, visited vertex by vertex.
//!
//! The lattice has `2^4 + 1 = 17` rows with row ids `−8..=8`. Row `i` holds `17 − |i|`
//! vertices centred horizontally, so the lattice outlines a hexagon. Rows are spaced by
//! `0.95·√3·max_dither/16` and vertices within a row by `0.95·2·max_dither/16`.
//! The grid has 217 vertices whatever the size of the data.
use nalgebra::Vector2;

use crate::constants::{Radian, SQRT_3};

use super::OffsetSequence;

/// Refinement level of the lattice, `2^DITH_LEVEL` row spacings across.
const DITH_LEVEL: u32 = 4;

/// Shrink factor keeping the outer vertices off the hexagon edges.
const GRID_SHRINK: f64 = 0.95;

/// Lattice offsets, emitted row by row in increasing row id (increasing `y`), left to right.
pub fn sequential_hex_offsets(max_dither: Radian) -> OffsetSequence {
    let nrows = 2_i64.pow(DITH_LEVEL);
    let halfrows = nrows / 2;
    let dith_size_x = GRID_SHRINK * max_dither * 2.0 / nrows as f64;
    let dith_size_y = GRID_SHRINK * SQRT_3 * max_dither / nrows as f64;

    let points = (-halfrows..=halfrows).flat_map(move |row| {
        let vert_in_row = nrows + 1 - row.abs();
        (0..vert_in_row).map(move |j| {
            Vector2::new(
                dith_size_x * (j as f64 - (vert_in_row - 1) as f64 / 2.0),
                dith_size_y * row as f64,
            )
        })
    });

    OffsetSequence::from_points(points)
}
