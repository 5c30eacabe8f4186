//! Stacker configuration.
//!
//! * [`DitherParams`] holds the numeric tuning of a stacker (maximum dither, spiral shape,
//!   random seed, tiling margin) and is built through [`DitherParamsBuilder`], which validates
//!   every value.
//! * [`ColumnNames`] maps the roles the stackers need (RA, Dec, field id, night, observation
//!   time) onto the column names of the batch.
//!
//! Both types derive `serde` traits with per-field defaults, so a partial configuration file
//! only needs to list the values it overrides.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        Degree, Radian, DEFAULT_CANDIDATE_FACTOR, DEFAULT_MAX_DITHER_DEG, DEFAULT_SPIRAL_COILS,
        DEFAULT_SPIRAL_POINTS, DEFAULT_TILE_MARGIN, MAX_CANDIDATE_FACTOR, MAX_TILE_MARGIN, RADEG,
    },
    dither_errors::DitherError,
};

/// Numeric parameters of a dither stacker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherParams {
    /// Maximum dither in **degrees** (half-diagonal of the dither hexagon).
    pub max_dither_deg: Degree,
    /// Number of equidistant points along the spiral.
    pub num_points: usize,
    /// Number of coils of the spiral.
    pub n_coils: usize,
    /// Seed applied once at the start of each run; `None` seeds from the OS.
    pub random_seed: Option<u64>,
    /// Extra tiles per side of the repulsive-random tiling, at most 2 000.
    pub tile_margin: usize,
    /// Disk candidates drawn per requested uniform-random offset, at most 1 000.
    pub candidate_factor: usize,
}

impl Default for DitherParams {
    fn default() -> Self {
        DitherParams {
            max_dither_deg: DEFAULT_MAX_DITHER_DEG,
            num_points: DEFAULT_SPIRAL_POINTS,
            n_coils: DEFAULT_SPIRAL_COILS,
            random_seed: None,
            tile_margin: DEFAULT_TILE_MARGIN,
            candidate_factor: DEFAULT_CANDIDATE_FACTOR,
        }
    }
}

impl DitherParams {
    /// Construct a new [`DitherParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`DitherParamsBuilder`] initialized with the default values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use skydither::dither_params::DitherParams;
    ///
    /// let params = DitherParams::builder()
    ///     .max_dither_deg(1.5)
    ///     .random_seed(42)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.random_seed, Some(42));
    /// ```
    pub fn builder() -> DitherParamsBuilder {
        DitherParamsBuilder::new()
    }

    /// Maximum dither converted to radians.
    pub fn max_dither(&self) -> Radian {
        self.max_dither_deg * RADEG
    }

    /// Check the parameter ranges.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::InvalidDitherParameter)` naming the first invalid value.
    pub fn validate(&self) -> Result<(), DitherError> {
        if !(self.max_dither_deg.is_finite() && self.max_dither_deg > 0.0) {
            return Err(DitherError::InvalidDitherParameter(
                "max_dither_deg must be finite and > 0".into(),
            ));
        }
        if self.max_dither_deg >= 90.0 {
            return Err(DitherError::InvalidDitherParameter(
                "max_dither_deg must be < 90".into(),
            ));
        }
        if self.num_points == 0 {
            return Err(DitherError::InvalidDitherParameter(
                "num_points must be >= 1".into(),
            ));
        }
        if self.n_coils == 0 {
            return Err(DitherError::InvalidDitherParameter(
                "n_coils must be >= 1".into(),
            ));
        }
        if self.candidate_factor == 0 {
            return Err(DitherError::InvalidDitherParameter(
                "candidate_factor must be >= 1".into(),
            ));
        }
        if self.candidate_factor > MAX_CANDIDATE_FACTOR {
            return Err(DitherError::InvalidDitherParameter(format!(
                "candidate_factor must be <= {MAX_CANDIDATE_FACTOR}"
            )));
        }
        if self.tile_margin > MAX_TILE_MARGIN {
            return Err(DitherError::InvalidDitherParameter(format!(
                "tile_margin must be <= {MAX_TILE_MARGIN}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DitherParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seed = match self.random_seed {
            Some(seed) => seed.to_string(),
            None => "os".to_string(),
        };
        if f.alternate() {
            writeln!(f, "Dither Parameters")?;
            writeln!(f, "-----------------")?;
            writeln!(f, "  max_dither_deg   = {}", self.max_dither_deg)?;
            writeln!(f, "  num_points       = {}", self.num_points)?;
            writeln!(f, "  n_coils          = {}", self.n_coils)?;
            writeln!(f, "  random_seed      = {seed}")?;
            writeln!(f, "  tile_margin      = {}", self.tile_margin)?;
            write!(f, "  candidate_factor = {}", self.candidate_factor)
        } else {
            write!(
                f,
                "max_dither_deg={}, num_points={}, n_coils={}, random_seed={seed}, tile_margin={}, candidate_factor={}",
                self.max_dither_deg, self.num_points, self.n_coils, self.tile_margin, self.candidate_factor
            )
        }
    }
}

/// Fluent builder for [`DitherParams`].
#[derive(Debug, Clone)]
pub struct DitherParamsBuilder {
    params: DitherParams,
}

impl Default for DitherParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DitherParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: DitherParams::default(),
        }
    }

    pub fn max_dither_deg(mut self, v: Degree) -> Self {
        self.params.max_dither_deg = v;
        self
    }
    pub fn num_points(mut self, v: usize) -> Self {
        self.params.num_points = v;
        self
    }
    pub fn n_coils(mut self, v: usize) -> Self {
        self.params.n_coils = v;
        self
    }
    pub fn random_seed(mut self, v: u64) -> Self {
        self.params.random_seed = Some(v);
        self
    }
    pub fn tile_margin(mut self, v: usize) -> Self {
        self.params.tile_margin = v;
        self
    }
    pub fn candidate_factor(mut self, v: usize) -> Self {
        self.params.candidate_factor = v;
        self
    }

    /// Validate and return the parameters.
    pub fn build(self) -> Result<DitherParams, DitherError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

/// Names of the batch columns read by the stackers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Pointing right ascension (radians).
    pub ra: String,
    /// Pointing declination (radians).
    pub dec: String,
    pub field_id: String,
    pub night: String,
    /// Observation time (MJD), read by the season labeler.
    pub obs_time: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            ra: "fieldRA".into(),
            dec: "fieldDec".into(),
            field_id: "fieldID".into(),
            night: "night".into(),
            obs_time: "expMJD".into(),
        }
    }
}

impl ColumnNames {
    pub fn with_ra(mut self, name: impl Into<String>) -> Self {
        self.ra = name.into();
        self
    }
    pub fn with_dec(mut self, name: impl Into<String>) -> Self {
        self.dec = name.into();
        self
    }
    pub fn with_field_id(mut self, name: impl Into<String>) -> Self {
        self.field_id = name.into();
        self
    }
    pub fn with_night(mut self, name: impl Into<String>) -> Self {
        self.night = name.into();
        self
    }
    pub fn with_obs_time(mut self, name: impl Into<String>) -> Self {
        self.obs_time = name.into();
        self
    }
}

impl fmt::Display for ColumnNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ra={}, dec={}, field_id={}, night={}, obs_time={}",
            self.ra, self.dec, self.field_id, self.night, self.obs_time
        )
    }
}

#[cfg(test)]
mod dither_params_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let params = DitherParams::default();
        assert_eq!(params.max_dither_deg, 1.75);
        assert_eq!(params.num_points, 60);
        assert_eq!(params.n_coils, 5);
        assert_eq!(params.random_seed, None);
        assert_eq!(params.tile_margin, 170);
        assert_eq!(params.candidate_factor, 2);
        assert_relative_eq!(params.max_dither(), 1.75_f64.to_radians(), epsilon = 1e-15);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder_validation() {
        let err = DitherParams::builder()
            .max_dither_deg(-1.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            DitherError::InvalidDitherParameter("max_dither_deg must be finite and > 0".into())
        );

        assert!(DitherParams::builder().num_points(0).build().is_err());
        assert!(DitherParams::builder().n_coils(0).build().is_err());
        assert!(DitherParams::builder().candidate_factor(0).build().is_err());
        assert!(DitherParams::builder()
            .max_dither_deg(f64::NAN)
            .build()
            .is_err());
        assert!(DitherParams::builder().max_dither_deg(95.0).build().is_err());

        assert_eq!(
            DitherParams::builder()
                .candidate_factor(usize::MAX)
                .build()
                .unwrap_err(),
            DitherError::InvalidDitherParameter("candidate_factor must be <= 1000".into())
        );
        assert_eq!(
            DitherParams::builder()
                .tile_margin(usize::MAX)
                .build()
                .unwrap_err(),
            DitherError::InvalidDitherParameter("tile_margin must be <= 2000".into())
        );
        assert!(DitherParams::builder()
            .candidate_factor(1_000)
            .tile_margin(2_000)
            .build()
            .is_ok());

        let params = DitherParams::builder()
            .num_points(12)
            .n_coils(2)
            .tile_margin(0)
            .random_seed(7)
            .build()
            .unwrap();
        assert_eq!(params.num_points, 12);
        assert_eq!(params.tile_margin, 0);
        assert_eq!(params.random_seed, Some(7));
    }

    #[test]
    fn test_partial_deserialization() {
        let params: DitherParams =
            serde_json::from_str(r#"{"max_dither_deg": 0.5, "random_seed": 3}"#).unwrap();
        assert_eq!(params.max_dither_deg, 0.5);
        assert_eq!(params.random_seed, Some(3));
        assert_eq!(params.num_points, 60);

        let columns: ColumnNames = serde_json::from_str(r#"{"ra": "ditheredRA"}"#).unwrap();
        assert_eq!(columns.ra, "ditheredRA");
        assert_eq!(columns.dec, "fieldDec");
    }

    #[test]
    fn test_display() {
        let params = DitherParams::default();
        assert_eq!(
            params.to_string(),
            "max_dither_deg=1.75, num_points=60, n_coils=5, random_seed=os, tile_margin=170, candidate_factor=2"
        );
        assert!(format!("{params:#}").starts_with("Dither Parameters"));

        let columns = ColumnNames::default().with_night("nightId");
        assert_eq!(
            columns.to_string(),
            "ra=fieldRA, dec=fieldDec, field_id=fieldID, night=nightId, obs_time=expMJD"
        );
    }
}
