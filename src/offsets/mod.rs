//! Dither offset generators.
//!
//! Overview
//! -----------------
//! Every generator produces an [`OffsetSequence`]: an ordered list of `(x, y)` offsets, in
//! radians, to be added to a pointing centre (`x` along RA before the `1/cos(dec)` correction,
//! `y` along Dec). The sequence is generated once per stacker run and indexed by the
//! assignment cadence.
//!
//! | Pattern                             | Length                        | Module               |
//! |-------------------------------------|-------------------------------|----------------------|
//! | [`DitherPattern::Random`]           | requested count               | [`random_hex`]       |
//! | [`DitherPattern::RepulsiveRandom`]  | requested count               | [`repulsive_random`] |
//! | [`DitherPattern::Spiral`]           | `num_points`                  | [`spiral`]           |
//! | [`DitherPattern::SequentialHex`]    | 217                           | [`sequential_hex`]   |
//! | [`DitherPattern::Pentagon`]         | 10                            | [`polygon`]          |
//! | [`DitherPattern::PentagonDiamond`]  | 10                            | [`polygon`]          |
//!
//! The two random patterns keep their offsets inside the flat-top [`Hexagon`](crate::geometry::Hexagon)
//! inscribed in the field of view. The deterministic ones ignore the requested count and the
//! random generator.
pub mod polygon;
pub mod random_hex;
pub mod repulsive_random;
pub mod sequential_hex;
pub mod spiral;

use std::fmt;

use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{dither_errors::DitherError, dither_params::DitherParams};

/// Ordered pair of equal-length offset columns `(x_off, y_off)`, in radians.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OffsetSequence {
    x_off: Vec<f64>,
    y_off: Vec<f64>,
}

impl OffsetSequence {
    /// Build a sequence from two parallel columns.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::ColumnLengthMismatch)` if `y_off` and `x_off` differ in length.
    pub fn new(x_off: Vec<f64>, y_off: Vec<f64>) -> Result<Self, DitherError> {
        if x_off.len() != y_off.len() {
            return Err(DitherError::ColumnLengthMismatch {
                column: "y_off".into(),
                expected: x_off.len(),
                found: y_off.len(),
            });
        }
        Ok(OffsetSequence { x_off, y_off })
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vector2<f64>>,
    {
        let (x_off, y_off) = points.into_iter().map(|p| (p.x, p.y)).unzip();
        OffsetSequence { x_off, y_off }
    }

    pub fn len(&self) -> usize {
        self.x_off.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_off.is_empty()
    }

    pub fn x_off(&self) -> &[f64] {
        &self.x_off
    }

    pub fn y_off(&self) -> &[f64] {
        &self.y_off
    }

    /// Offset at `index`, `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<Vector2<f64>> {
        Some(Vector2::new(*self.x_off.get(index)?, *self.y_off.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.x_off
            .iter()
            .zip(&self.y_off)
            .map(|(&x, &y)| Vector2::new(x, y))
    }
}

/// Geometric strategy used to build the offset sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DitherPattern {
    /// Area-uniform random points inside the hexagon.
    Random,
    /// Random points inside the hexagon, at most one per tile of a fine square grid.
    RepulsiveRandom,
    /// Equidistant points along an Archimedean spiral.
    Spiral,
    /// Vertices of a hexagonal lattice, visited row by row.
    SequentialHex,
    /// An inner pentagon followed by an inverted outer pentagon.
    Pentagon,
    /// The origin, an inner diamond and an outer pentagon.
    PentagonDiamond,
}

impl DitherPattern {
    pub const ALL: [DitherPattern; 6] = [
        DitherPattern::Random,
        DitherPattern::RepulsiveRandom,
        DitherPattern::Spiral,
        DitherPattern::SequentialHex,
        DitherPattern::Pentagon,
        DitherPattern::PentagonDiamond,
    ];

    /// Name used to build stacker and column names.
    pub fn name(&self) -> &'static str {
        match self {
            DitherPattern::Random => "Random",
            DitherPattern::RepulsiveRandom => "RepulsiveRandom",
            DitherPattern::Spiral => "Spiral",
            DitherPattern::SequentialHex => "SequentialHex",
            DitherPattern::Pentagon => "Pentagon",
            DitherPattern::PentagonDiamond => "PentagonDiamond",
        }
    }

    /// True for the patterns whose sequence is drawn from the random generator and sized
    /// to the number of draws the cadence needs.
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            DitherPattern::Random | DitherPattern::RepulsiveRandom
        )
    }

    /// True for the small polygon patterns, meant to be cycled season by season.
    pub fn is_polygon(&self) -> bool {
        matches!(
            self,
            DitherPattern::Pentagon | DitherPattern::PentagonDiamond
        )
    }

    /// Generate the offset sequence.
    ///
    /// Arguments
    /// -----------------
    /// * `params`: validated stacker parameters (maximum dither, spiral shape, tiling margin).
    /// * `count`: number of offsets requested, only used by the random patterns.
    /// * `rng`: random generator, only used by the random patterns.
    ///
    /// Return
    /// ----------
    /// * The offset sequence, or the insufficient-yield error of the random patterns.
    pub fn generate(
        &self,
        params: &DitherParams,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<OffsetSequence, DitherError> {
        let max_dither = params.max_dither();
        match self {
            DitherPattern::Random => {
                random_hex::random_hex_offsets(max_dither, count, params.candidate_factor, rng)
            }
            DitherPattern::RepulsiveRandom => repulsive_random::repulsive_random_offsets(
                max_dither,
                count,
                params.tile_margin,
                rng,
            ),
            DitherPattern::Spiral => Ok(spiral::spiral_offsets(
                max_dither,
                params.num_points,
                params.n_coils,
            )),
            DitherPattern::SequentialHex => Ok(sequential_hex::sequential_hex_offsets(max_dither)),
            DitherPattern::Pentagon => Ok(polygon::pentagon_offsets(max_dither)),
            DitherPattern::PentagonDiamond => Ok(polygon::pentagon_diamond_offsets(max_dither)),
        }
    }
}

impl fmt::Display for DitherPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
