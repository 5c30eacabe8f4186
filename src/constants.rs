//! # Constants and type definitions for skydither
//!
//! This module centralizes the **angle conversions**, **default tuning values** and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, hours ↔ radians)
//! - Core type aliases used across the crate
//! - Default values of the dither stackers (maximum dither, spiral shape, tiling margin)
//! - Season bookkeeping constants used by the season-wrap correction

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// √3, the slope of the slanted hexagon edges
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Modified Julian Date (days)
pub type MJD = f64;

// -------------------------------------------------------------------------------------------------
// Stacker defaults
// -------------------------------------------------------------------------------------------------

/// Default maximum dither, in degrees (half-diagonal of the dither hexagon)
pub const DEFAULT_MAX_DITHER_DEG: Degree = 1.75;

/// Default number of equidistant points taken along the spiral
pub const DEFAULT_SPIRAL_POINTS: usize = 60;

/// Default number of coils of the spiral
pub const DEFAULT_SPIRAL_COILS: usize = 5;

/// Default number of extra tiles per side of the repulsive-random tiling
pub const DEFAULT_TILE_MARGIN: usize = 170;

/// Default ratio between the random candidates drawn and the offsets requested
pub const DEFAULT_CANDIDATE_FACTOR: usize = 2;

/// Largest accepted tile margin of the repulsive-random tiling
pub const MAX_TILE_MARGIN: usize = 2_000;

/// Largest accepted candidate factor of the uniform-random generator
pub const MAX_CANDIDATE_FACTOR: usize = 1_000;

/// Fraction of the circumscribing square covered by the flat-top hexagon (3√3/8)
pub const HEXAGON_FILL_FRACTION: f64 = 3.0 * SQRT_3 / 8.0;

// -------------------------------------------------------------------------------------------------
// Seasons
// -------------------------------------------------------------------------------------------------

/// Largest season label expected from a ten-year survey
pub const MAX_SEASON: i64 = 9;

/// Number of distinct season labels after wrapping
pub const SEASON_WRAP: i64 = 10;

/// Length of a tropical year used for the season boundaries (days)
pub const DAYS_PER_SEASON_YEAR: f64 = 365.25;

/// Length of a survey year (days), surveys count flat 365-day years
pub const DAYS_PER_SURVEY_YEAR: f64 = 365.0;
