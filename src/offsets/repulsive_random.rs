//! Repulsive-random offsets inside the dither hexagon.
//!
//! Strategy
//! -----------------
//! 1. Tile the square circumscribing the hexagon (side `2·max_dither`) with a fine grid of
//!    square tiles, and keep the tiles whose centre lies strictly inside the hexagon.
//! 2. Repeatedly pick one of the remaining tiles uniformly at random, draw a point uniformly
//!    inside it, and remove the tile from the pool.
//!
//! No two offsets share a tile, so the offsets are spread out at least on the scale of the
//! tile size. The pool removal is a `swap_remove`, each draw costs O(1).
//!
//! Tiling resolution
//! -----------------
//! The number of tiles per side is the larger of
//! * `ceil(√n) + tile_margin` (the historical rule, with a default margin of 170), and
//! * `ceil(√(1.25·n / f)) + 2`, with `f = 3√3/8` the fraction of the square covered by the
//!   hexagon, which keeps enough tiles inside the hexagon when `n` is large.
use nalgebra::Vector2;
use rand::Rng;
use tracing::debug;

use crate::{
    constants::{Radian, HEXAGON_FILL_FRACTION},
    dither_errors::DitherError,
    geometry::Hexagon,
};

use super::OffsetSequence;

/// Maximum number of draws inside a boundary tile before falling back to its centre.
const MAX_DRAWS_PER_TILE: usize = 64;

/// Extra tiles requested on top of the expected count by the computed resolution.
const TILING_SAFETY_FACTOR: f64 = 1.25;

/// Square tiles of the circumscribing square whose centres lie inside the hexagon.
#[derive(Debug, Clone)]
pub struct HexTiling {
    centers: Vec<Vector2<f64>>,
    tile_side: f64,
    tiles_per_side: usize,
}

impl HexTiling {
    /// Tile the hexagon of half-diagonal `max_dither` finely enough for `noffsets` draws.
    ///
    /// Tiles are enumerated row by row, from the top row down, left to right.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::InvalidDitherParameter)` if the tile count overflows `usize`.
    pub fn new(
        max_dither: Radian,
        noffsets: usize,
        tile_margin: usize,
    ) -> Result<Self, DitherError> {
        let tiles_per_side = tiles_per_side(noffsets, tile_margin)?;
        let tile_side = 2.0 * max_dither / tiles_per_side as f64;
        let half = tiles_per_side as f64 / 2.0 - 0.5;
        let hexagon = Hexagon::new(max_dither);

        let centers = (0..tiles_per_side)
            .flat_map(|row| {
                (0..tiles_per_side).map(move |col| {
                    Vector2::new(
                        tile_side * (col as f64 - half),
                        tile_side * (half - row as f64),
                    )
                })
            })
            .filter(|c| hexagon.contains_strict(c.x, c.y))
            .collect();

        Ok(HexTiling {
            centers,
            tile_side,
            tiles_per_side,
        })
    }

    /// Number of tiles inside the hexagon.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn tile_side(&self) -> f64 {
        self.tile_side
    }

    pub fn tiles_per_side(&self) -> usize {
        self.tiles_per_side
    }

    /// Centre of `tile`, `None` when out of bounds.
    pub fn center(&self, tile: usize) -> Option<Vector2<f64>> {
        self.centers.get(tile).copied()
    }

    /// Uniform point inside `tile`, redrawn until it lies strictly inside the hexagon.
    fn sample_point(&self, tile: usize, hexagon: &Hexagon, rng: &mut impl Rng) -> Vector2<f64> {
        let center = self.centers[tile];
        for _ in 0..MAX_DRAWS_PER_TILE {
            let dx = (rng.random::<f64>() - 0.5) * self.tile_side;
            let dy = (rng.random::<f64>() - 0.5) * self.tile_side;
            let point = center + Vector2::new(dx, dy);
            if hexagon.contains_strict(point.x, point.y) {
                return point;
            }
        }
        center
    }
}

fn tiles_per_side(noffsets: usize, tile_margin: usize) -> Result<usize, DitherError> {
    let n = noffsets as f64;
    let overflow = || {
        DitherError::InvalidDitherParameter(format!(
            "tiling for {noffsets} offsets with tile_margin {tile_margin} overflows"
        ))
    };
    let historical = (n.sqrt().ceil() as usize)
        .checked_add(tile_margin)
        .ok_or_else(overflow)?;
    let computed = (TILING_SAFETY_FACTOR * n / HEXAGON_FILL_FRACTION).sqrt().ceil() as usize + 2;
    let side = historical.max(computed);
    // the square grid is enumerated in full
    side.checked_mul(side).ok_or_else(overflow)?;
    Ok(side)
}

/// Draw `noffsets` repulsive-random offsets inside the hexagon of half-diagonal `max_dither`.
///
/// Return
/// ----------
/// * `Ok(OffsetSequence)` with exactly `noffsets` entries, in draw order.
/// * `Err(DitherError::InsufficientTiling)` if fewer than `noffsets` tiles lie inside the
///   hexagon.
/// * `Err(DitherError::InvalidDitherParameter)` if the tile count overflows `usize`.
pub fn repulsive_random_offsets(
    max_dither: Radian,
    noffsets: usize,
    tile_margin: usize,
    rng: &mut impl Rng,
) -> Result<OffsetSequence, DitherError> {
    let tiling = HexTiling::new(max_dither, noffsets, tile_margin)?;
    draw_from_tiling(&tiling, max_dither, noffsets, rng).map(|(offsets, _)| offsets)
}

/// Draw `noffsets` points from distinct tiles of `tiling`.
///
/// Return
/// ----------
/// * The offsets and, for each of them, the index of the tile it was drawn from.
pub(crate) fn draw_from_tiling(
    tiling: &HexTiling,
    max_dither: Radian,
    noffsets: usize,
    rng: &mut impl Rng,
) -> Result<(OffsetSequence, Vec<usize>), DitherError> {
    let available = tiling.len();
    debug!(
        needed = noffsets,
        tiles_in_hexagon = available,
        tiles_per_side = tiling.tiles_per_side(),
        filling_factor = noffsets as f64 / available.max(1) as f64,
        "repulsive random tiling"
    );

    if available < noffsets {
        return Err(DitherError::InsufficientTiling {
            needed: noffsets,
            available,
            tiles_per_side: tiling.tiles_per_side(),
        });
    }

    let hexagon = Hexagon::new(max_dither);
    let mut pool: Vec<usize> = (0..available).collect();
    let mut points = Vec::with_capacity(noffsets);
    let mut tiles = Vec::with_capacity(noffsets);

    for _ in 0..noffsets {
        let pick = rng.random_range(0..pool.len());
        let tile = pool.swap_remove(pick);
        points.push(tiling.sample_point(tile, &hexagon, rng));
        tiles.push(tile);
    }

    Ok((OffsetSequence::from_points(points), tiles))
}

#[cfg(test)]
mod repulsive_random_test {
    use super::*;
    use crate::constants::RADEG;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_tiles_per_side() {
        // small counts keep the historical margin
        assert_eq!(tiles_per_side(100, 170).unwrap(), 180);
        // large counts are driven by the hexagon filling fraction
        let side = tiles_per_side(4_000_000, 170).unwrap();
        assert!(side > 2000 + 170);
        let in_hex = (side * side) as f64 * HEXAGON_FILL_FRACTION;
        assert!(in_hex > 4_000_000.0);
    }

    #[test]
    fn test_tiles_per_side_overflow() {
        assert!(matches!(
            tiles_per_side(4, usize::MAX),
            Err(DitherError::InvalidDitherParameter(_))
        ));
        // the side fits, its square does not
        assert!(tiles_per_side(4, usize::MAX / 2).is_err());

        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            repulsive_random_offsets(0.03, 2, usize::MAX, &mut rng),
            Err(DitherError::InvalidDitherParameter(_))
        ));
    }

    #[test]
    fn test_center_out_of_bounds() {
        let tiling = HexTiling::new(0.02, 10, 0).unwrap();
        assert!(tiling.center(0).is_some());
        assert_eq!(tiling.center(tiling.len()), None);
    }

    #[test]
    fn test_tiling_centers_inside_hexagon() {
        let max_dither = 1.75 * RADEG;
        let tiling = HexTiling::new(max_dither, 50, 20).unwrap();
        let hexagon = Hexagon::new(max_dither);

        assert_eq!(tiling.tiles_per_side(), 28);
        assert!(!tiling.is_empty());
        for tile in 0..tiling.len() {
            let c = tiling.center(tile).unwrap();
            assert!(hexagon.contains_strict(c.x, c.y));
        }

        let expected = (28.0 * 28.0) * HEXAGON_FILL_FRACTION;
        let ratio = tiling.len() as f64 / expected;
        assert!((0.9..1.1).contains(&ratio), "ratio = {ratio}");
    }

    #[test]
    fn test_offsets_use_distinct_tiles() {
        let max_dither = 1.75 * RADEG;
        let tiling = HexTiling::new(max_dither, 500, 5).unwrap();
        let hexagon = Hexagon::new(max_dither);
        let mut rng = StdRng::seed_from_u64(42);

        let (offsets, tiles) = draw_from_tiling(&tiling, max_dither, 500, &mut rng).unwrap();

        assert_eq!(offsets.len(), 500);
        let unique: HashSet<usize> = tiles.iter().copied().collect();
        assert_eq!(unique.len(), 500);

        let half_side = tiling.tile_side() / 2.0;
        for (p, &tile) in offsets.iter().zip(&tiles) {
            assert!(hexagon.contains_strict(p.x, p.y), "{p:?} outside hexagon");
            let c = tiling.center(tile).unwrap();
            assert!((p.x - c.x).abs() <= half_side + 1e-15);
            assert!((p.y - c.y).abs() <= half_side + 1e-15);
        }
    }

    #[test]
    fn test_every_tile_can_be_used_once() {
        let max_dither = 0.02;
        let tiling = HexTiling::new(max_dither, 10, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let (_, tiles) = draw_from_tiling(&tiling, max_dither, tiling.len(), &mut rng).unwrap();
        let unique: HashSet<usize> = tiles.into_iter().collect();
        assert_eq!(unique.len(), tiling.len());
    }

    #[test]
    fn test_insufficient_tiling_is_reported() {
        let max_dither = 0.02;
        let tiling = HexTiling::new(max_dither, 10, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let needed = tiling.len() + 1;

        let err = draw_from_tiling(&tiling, max_dither, needed, &mut rng).unwrap_err();
        assert_eq!(
            err,
            DitherError::InsufficientTiling {
                needed,
                available: tiling.len(),
                tiles_per_side: tiling.tiles_per_side(),
            }
        );
    }

    #[test]
    fn test_reproducible() {
        let a = repulsive_random_offsets(0.03, 64, 170, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = repulsive_random_offsets(0.03, 64, 170, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}
