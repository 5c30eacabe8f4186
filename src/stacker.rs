//! Dither stackers.
//!
//! Overview
//! -----------------
//! A [`DitherStacker`] pairs a [`DitherPattern`] (where the offsets are) with a [`Cadence`]
//! (which visit gets which offset). Running it on an [`ObservationBatch`]:
//!
//! 1. checks that every required column is present,
//! 2. seeds the random generator (once per run, from [`DitherParams::random_seed`]),
//! 3. generates the offset sequence and the vertex index of every visit,
//! 4. applies `ra' = ra + x/cos(dec)`, `dec' = dec + y` and wraps the result into range,
//! 5. attaches the two output columns `<Name>RA` and `<Name>Dec`.
//!
//! Nothing is attached to the batch when any step fails.
//!
//! Naming
//! -----------------
//! Stacker names follow `[Pattern]Dither[Field]Per[Timescale]`, e.g.
//! `RandomDitherFieldPerVisit` or `PentagonDitherPerSeason`. The sixteen combinations of the
//! historical stacker suite have dedicated constructors, listed in [`NAMED_STACKERS`].
//!
//! Example
//! -----------------
//! ```rust
//! use skydither::dither_params::{ColumnNames, DitherParams};
//! use skydither::observations::ObservationBatch;
//! use skydither::stacker::{DitherStacker, Stacker};
//!
//! let mut batch = ObservationBatch::from_columns([
//!     ("fieldRA", vec![0.5, 0.5, 1.2]),
//!     ("fieldDec", vec![-0.4, -0.4, 0.1]),
//!     ("fieldID", vec![10.0, 10.0, 11.0]),
//!     ("night", vec![1.0, 2.0, 1.0]),
//! ])
//! .unwrap();
//!
//! let params = DitherParams::builder().random_seed(42).build().unwrap();
//! let stacker =
//!     DitherStacker::repulsive_random_dither_field_per_night(params, ColumnNames::default())
//!         .unwrap();
//! stacker.run(&mut batch).unwrap();
//!
//! assert!(batch.has_column("RepulsiveRandomDitherFieldPerNightRA"));
//! assert!(batch.has_column("RepulsiveRandomDitherFieldPerNightDec"));
//! ```
use std::{collections::BTreeMap, sync::Arc};

use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::{
    assignment::{
        field_group_indices, field_visit_indices, global_group_indices, ordered_keys,
        unique_sorted, visit_indices, Cadence, CursorMode, VertexCursor,
    },
    constants::Radian,
    dither_errors::DitherError,
    dither_params::{ColumnNames, DitherParams},
    geometry::wrap_ra_dec_slices,
    observations::ObservationBatch,
    offsets::{DitherPattern, OffsetSequence},
    seasons::{wrap_seasons, EquinoxSeasons, SeasonLabeler, SeasonLabels},
};

/// A computation that reads columns of a batch and attaches new ones.
pub trait Stacker {
    /// Stacker name, prefix of the added columns.
    fn name(&self) -> String;

    /// Columns attached by [`Stacker::run`].
    fn cols_added(&self) -> Vec<String>;

    /// Columns read by [`Stacker::run`].
    fn cols_required(&self) -> Vec<String>;

    /// Compute and attach the new columns.
    fn run(&self, batch: &mut ObservationBatch) -> Result<(), DitherError>;
}

/// Offset pattern applied to the pointings with a given cadence.
#[derive(Debug, Clone)]
pub struct DitherStacker {
    pattern: DitherPattern,
    cadence: Cadence,
    params: DitherParams,
    columns: ColumnNames,
    season_labeler: Arc<dyn SeasonLabeler>,
}

impl DitherStacker {
    /// Create a stacker from a pattern and a cadence.
    ///
    /// Seasons are labeled with [`EquinoxSeasons`] unless another labeler is set with
    /// [`DitherStacker::with_season_labeler`].
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::InvalidDitherParameter)` if `params` do not validate.
    /// * `Err(DitherError::UnsupportedPairing)` for a polygon pattern with a cadence that is not
    ///   season-based.
    pub fn new(
        pattern: DitherPattern,
        cadence: Cadence,
        params: DitherParams,
        columns: ColumnNames,
    ) -> Result<Self, DitherError> {
        params.validate()?;
        if pattern.is_polygon() && !cadence.uses_seasons() {
            return Err(DitherError::UnsupportedPairing {
                pattern: pattern.to_string(),
                cadence: cadence.to_string(),
            });
        }
        Ok(DitherStacker {
            pattern,
            cadence,
            params,
            columns,
            season_labeler: Arc::new(EquinoxSeasons::default()),
        })
    }

    /// Create one of the [`NAMED_STACKERS`] from its name, e.g. `"SpiralDitherPerNight"`.
    ///
    /// Return
    /// ----------
    /// * `Err(DitherError::InvalidDitherParameter)` if the name is unknown.
    pub fn from_name(
        name: &str,
        params: DitherParams,
        columns: ColumnNames,
    ) -> Result<Self, DitherError> {
        let (pattern, cadence) = NAMED_STACKERS
            .iter()
            .copied()
            .find(|(pattern, cadence)| stacker_name(*pattern, *cadence) == name)
            .ok_or_else(|| {
                DitherError::InvalidDitherParameter(format!("unknown stacker name: {name}"))
            })?;
        Self::new(pattern, cadence, params, columns)
    }

    /// Replace the season labeler.
    pub fn with_season_labeler(mut self, labeler: impl SeasonLabeler + 'static) -> Self {
        self.season_labeler = Arc::new(labeler);
        self
    }

    pub fn pattern(&self) -> DitherPattern {
        self.pattern
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn params(&self) -> &DitherParams {
        &self.params
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    fn rng(&self) -> StdRng {
        match self.params.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn needs_field_id(&self) -> bool {
        match self.cadence {
            Cadence::FieldPerVisit => !self.pattern.is_random(),
            cadence => cadence.is_per_field(),
        }
    }

    fn check_columns(&self, batch: &ObservationBatch) -> Result<(), DitherError> {
        for name in self.cols_required() {
            if !batch.has_column(&name) {
                return Err(DitherError::MissingColumn(name));
            }
        }
        Ok(())
    }

    /// Season labels of the batch, after the season-wrap correction.
    fn seasons(&self, batch: &ObservationBatch) -> Result<Vec<i64>, DitherError> {
        let labels = self.season_labeler.label(batch, &self.columns)?;
        if labels.season.len() != batch.len() {
            return Err(DitherError::SeasonLabeling(format!(
                "{} season labels for {} visits",
                labels.season.len(),
                batch.len()
            )));
        }
        let seasons = wrap_seasons(&labels.season)?;
        log_season_summary(&seasons, &labels);
        Ok(seasons)
    }

    /// Offset sequence and vertex index of every visit.
    fn assign(
        &self,
        batch: &ObservationBatch,
        rng: &mut StdRng,
    ) -> Result<(OffsetSequence, Vec<usize>), DitherError> {
        let n_visits = batch.len();
        let random = self.pattern.is_random();
        let mut cursor = VertexCursor::new(if random {
            CursorMode::Running
        } else {
            CursorMode::ResetPerField
        });

        match self.cadence {
            Cadence::FieldPerVisit => {
                let offsets = self.pattern.generate(&self.params, n_visits, rng)?;
                let indices = if random {
                    visit_indices(n_visits, offsets.len())
                } else {
                    let fields = ordered_keys(batch.column(&self.columns.field_id)?);
                    field_visit_indices(&fields, offsets.len())
                };
                Ok((offsets, indices))
            }
            Cadence::FieldPerNight => {
                let fields = ordered_keys(batch.column(&self.columns.field_id)?);
                let nights = ordered_keys(batch.column(&self.columns.night)?);
                let offsets = self.pattern.generate(&self.params, n_visits, rng)?;
                let indices = field_group_indices(&fields, &nights, offsets.len(), &mut cursor);
                Ok((offsets, indices))
            }
            Cadence::FieldPerSeason => {
                let fields = ordered_keys(batch.column(&self.columns.field_id)?);
                let seasons = self.seasons(batch)?;
                let offsets = self.pattern.generate(&self.params, n_visits, rng)?;
                let indices = field_group_indices(&fields, &seasons, offsets.len(), &mut cursor);
                Ok((offsets, indices))
            }
            Cadence::PerNight => {
                let nights = ordered_keys(batch.column(&self.columns.night)?);
                let n_nights = unique_sorted(&nights).len();
                let offsets = self.pattern.generate(&self.params, n_nights, rng)?;
                let indices = global_group_indices(&nights, offsets.len());
                Ok((offsets, indices))
            }
            Cadence::PerSeason => {
                let seasons = self.seasons(batch)?;
                let n_seasons = unique_sorted(&seasons).len();
                let offsets = self.pattern.generate(&self.params, n_seasons, rng)?;
                let indices = global_group_indices(&seasons, offsets.len());
                Ok((offsets, indices))
            }
        }
    }
}

impl Stacker for DitherStacker {
    fn name(&self) -> String {
        stacker_name(self.pattern, self.cadence)
    }

    fn cols_added(&self) -> Vec<String> {
        let name = self.name();
        vec![format!("{name}RA"), format!("{name}Dec")]
    }

    fn cols_required(&self) -> Vec<String> {
        let mut required = vec![self.columns.ra.clone(), self.columns.dec.clone()];
        if self.needs_field_id() {
            required.push(self.columns.field_id.clone());
        }
        if self.cadence.uses_nights() {
            required.push(self.columns.night.clone());
        }
        if self.cadence.uses_seasons() {
            required.extend(self.season_labeler.required_columns(&self.columns));
        }
        required.into_iter().unique().collect()
    }

    fn run(&self, batch: &mut ObservationBatch) -> Result<(), DitherError> {
        self.check_columns(batch)?;

        let mut rng = self.rng();
        let (offsets, indices) = self.assign(batch, &mut rng)?;
        debug!(
            stacker = %self.name(),
            visits = batch.len(),
            offsets = offsets.len(),
            "dither offsets assigned"
        );

        let (mut ra, mut dec) = apply_offsets(
            batch.column(&self.columns.ra)?,
            batch.column(&self.columns.dec)?,
            &offsets,
            &indices,
        );
        wrap_ra_dec_slices(&mut ra, &mut dec);

        let name = self.name();
        batch.add_column(format!("{name}RA"), ra)?;
        batch.add_column(format!("{name}Dec"), dec)?;
        Ok(())
    }
}

/// `[Pattern]Dither[Field]Per[Timescale]`
pub fn stacker_name(pattern: DitherPattern, cadence: Cadence) -> String {
    format!("{}Dither{}", pattern.name(), cadence.name())
}

/// Shift every pointing by its assigned offset.
///
/// The RA offset is divided by `cos(dec)` so that `x` is an angle on the sky.
///
/// Arguments
/// -----------------
/// * `ra`, `dec`: pointing centres (radians).
/// * `offsets`: the offset sequence.
/// * `indices`: vertex of every visit, all `< offsets.len()`.
///
/// Return
/// ----------
/// * The shifted `(ra, dec)` columns, not yet wrapped.
///
/// Panics
/// ----------
/// * If an index is `>= offsets.len()`.
pub fn apply_offsets(
    ra: &[Radian],
    dec: &[Radian],
    offsets: &OffsetSequence,
    indices: &[usize],
) -> (Vec<Radian>, Vec<Radian>) {
    let x_off = offsets.x_off();
    let y_off = offsets.y_off();
    ra.iter()
        .zip(dec)
        .zip(indices)
        .map(|((&r, &d), &v)| (r + x_off[v] / d.cos(), d + y_off[v]))
        .unzip()
}

fn log_season_summary(seasons: &[i64], labels: &SeasonLabels) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let mut visits_per_season: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (visit, season) in seasons.iter().enumerate() {
        visits_per_season.entry(*season).or_default().push(visit);
    }
    for (season, visits) in visits_per_season {
        let years = visits
            .iter()
            .filter_map(|&v| labels.year.get(v))
            .copied()
            .sorted_unstable()
            .dedup()
            .collect::<Vec<_>>();
        debug!(
            season,
            visits = visits.len(),
            percent = 100.0 * visits.len() as f64 / seasons.len() as f64,
            years = ?years,
            "season summary"
        );
    }
}

macro_rules! named_stackers {
    ($($(#[$doc:meta])* $fn_name:ident => ($pattern:ident, $cadence:ident);)*) => {
        impl DitherStacker {
            $(
                $(#[$doc])*
                pub fn $fn_name(
                    params: DitherParams,
                    columns: ColumnNames,
                ) -> Result<Self, DitherError> {
                    Self::new(DitherPattern::$pattern, Cadence::$cadence, params, columns)
                }
            )*
        }

        /// The sixteen pattern/cadence pairs of the historical stacker suite.
        pub const NAMED_STACKERS: &[(DitherPattern, Cadence)] = &[
            $((DitherPattern::$pattern, Cadence::$cadence),)*
        ];
    };
}

named_stackers! {
    /// Random offset inside the hexagon, a new one for every visit.
    random_dither_field_per_visit => (Random, FieldPerVisit);
    /// Repulsive-random offset inside the hexagon, a new one for every visit.
    repulsive_random_dither_field_per_visit => (RepulsiveRandom, FieldPerVisit);
    /// Spiral vertices visited in order, one per visit of each field.
    spiral_dither_field_per_visit => (Spiral, FieldPerVisit);
    /// Hexagonal lattice vertices visited in order, one per visit of each field.
    sequential_hex_dither_field_per_visit => (SequentialHex, FieldPerVisit);
    /// Random offset, a new one for every night a field is observed.
    random_dither_field_per_night => (Random, FieldPerNight);
    /// Repulsive-random offset, a new one for every night a field is observed.
    repulsive_random_dither_field_per_night => (RepulsiveRandom, FieldPerNight);
    /// Next spiral vertex for every night a field is observed.
    spiral_dither_field_per_night => (Spiral, FieldPerNight);
    /// Next lattice vertex for every night a field is observed.
    sequential_hex_dither_field_per_night => (SequentialHex, FieldPerNight);
    /// One random offset per night, shared by all fields.
    random_dither_per_night => (Random, PerNight);
    /// One repulsive-random offset per night, shared by all fields.
    repulsive_random_dither_per_night => (RepulsiveRandom, PerNight);
    /// Next spiral vertex every night, shared by all fields.
    spiral_dither_per_night => (Spiral, PerNight);
    /// Next lattice vertex every night, shared by all fields.
    sequential_hex_dither_per_night => (SequentialHex, PerNight);
    /// Next pentagon vertex for every season a field is observed.
    pentagon_dither_field_per_season => (Pentagon, FieldPerSeason);
    /// Next pentagon/diamond vertex for every season a field is observed.
    pentagon_diamond_dither_field_per_season => (PentagonDiamond, FieldPerSeason);
    /// Next pentagon vertex every season, shared by all fields.
    pentagon_dither_per_season => (Pentagon, PerSeason);
    /// Next pentagon/diamond vertex every season, shared by all fields.
    pentagon_diamond_dither_per_season => (PentagonDiamond, PerSeason);
}
