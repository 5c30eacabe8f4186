pub mod assignment;
pub mod constants;
pub mod dither_errors;
pub mod dither_params;
pub mod geometry;
pub mod observations;
pub mod offsets;
pub mod seasons;
pub mod stacker;

pub use assignment::Cadence;
pub use dither_errors::DitherError;
pub use dither_params::{ColumnNames, DitherParams, DitherParamsBuilder};
pub use observations::ObservationBatch;
pub use offsets::{DitherPattern, OffsetSequence};
pub use seasons::{EquinoxSeasons, SeasonLabeler, SeasonLabels};
pub use stacker::{DitherStacker, Stacker, NAMED_STACKERS};
