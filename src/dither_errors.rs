use thiserror::Error;

#[derive(Error, Debug)]
pub enum DitherError {
    #[error("Not enough random points within the hexagon: need {needed} but only {accepted} accepted, rerun with a different seed or a larger candidate factor")]
    InsufficientRandomYield { needed: usize, accepted: usize },

    #[error("Not enough tiles inside the hexagon: need {needed} but only {available} available ({tiles_per_side} tiles per side), increase the tile margin")]
    InsufficientTiling {
        needed: usize,
        available: usize,
        tiles_per_side: usize,
    },

    #[error("More than one distinct season beyond the last expected one: {0:?}")]
    AmbiguousSeasonOverflow(Vec<i64>),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column {column} has {found} entries, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid dither parameter: {0}")]
    InvalidDitherParameter(String),

    #[error("Dither pattern {pattern} cannot be assigned with cadence {cadence}")]
    UnsupportedPairing { pattern: String, cadence: String },

    #[error("Season labeling failed: {0}")]
    SeasonLabeling(String),
}

impl PartialEq for DitherError {
    fn eq(&self, other: &Self) -> bool {
        use DitherError::*;
        match (self, other) {
            (
                InsufficientRandomYield {
                    needed: a,
                    accepted: b,
                },
                InsufficientRandomYield {
                    needed: c,
                    accepted: d,
                },
            ) => a == c && b == d,
            (
                InsufficientTiling {
                    needed: a,
                    available: b,
                    tiles_per_side: c,
                },
                InsufficientTiling {
                    needed: d,
                    available: e,
                    tiles_per_side: f,
                },
            ) => a == d && b == e && c == f,
            (AmbiguousSeasonOverflow(a), AmbiguousSeasonOverflow(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                ColumnLengthMismatch {
                    column: a,
                    expected: b,
                    found: c,
                },
                ColumnLengthMismatch {
                    column: d,
                    expected: e,
                    found: f,
                },
            ) => a == d && b == e && c == f,
            (InvalidDitherParameter(a), InvalidDitherParameter(b)) => a == b,
            (
                UnsupportedPairing {
                    pattern: a,
                    cadence: b,
                },
                UnsupportedPairing {
                    pattern: c,
                    cadence: d,
                },
            ) => a == c && b == d,
            (SeasonLabeling(a), SeasonLabeling(b)) => a == b,

            _ => false,
        }
    }
}
