//! Observing seasons.
//!
//! Overview
//! -----------------
//! Season-keyed stackers need one integer season label per visit. The labels come from a
//! [`SeasonLabeler`]; [`EquinoxSeasons`] is the default one. Before any ranking the labels go
//! through [`wrap_seasons`], which folds the partial eleventh season of a ten-year survey back
//! onto season 0.
//!
//! Season rule of [`EquinoxSeasons`]
//! -----------------
//! A field at right ascension `α` (hours) is best observed when the Sun sits opposite, so its
//! season starts half a year before the Sun crosses `α`:
//!
//! ```text
//! first_season_began = t_equinox + 0.5·α·(365.25/12) − 0.5·365.25
//! global_season      = floor((t − first_season_began) / 365.25)
//! season             = global_season − min(global_season)
//! year               = floor((t − t_first) / 365)
//! ```
//!
//! with `t_equinox` the MJD of a reference autumnal equinox (2014-09-23 by default) and
//! `t_first` the time of the first visit of the batch.
use std::fmt::Debug;

use hifitime::Epoch;
use itertools::Itertools;
use tracing::info;

use crate::{
    constants::{DAYS_PER_SEASON_YEAR, DAYS_PER_SURVEY_YEAR, MAX_SEASON, MJD, RADH, SEASON_WRAP},
    dither_errors::DitherError,
    dither_params::ColumnNames,
    observations::ObservationBatch,
};

/// Season and survey year of every visit of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeasonLabels {
    pub season: Vec<i64>,
    pub year: Vec<i64>,
}

/// Source of season labels.
///
/// Implementations must not modify the batch and must return one label per visit.
pub trait SeasonLabeler: Debug + Send + Sync {
    /// Columns read by [`SeasonLabeler::label`].
    fn required_columns(&self, columns: &ColumnNames) -> Vec<String>;

    /// Label every visit of `batch`.
    fn label(
        &self,
        batch: &ObservationBatch,
        columns: &ColumnNames,
    ) -> Result<SeasonLabels, DitherError>;
}

/// Seasons derived from the field right ascension and the observation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquinoxSeasons {
    equinox: MJD,
}

impl Default for EquinoxSeasons {
    fn default() -> Self {
        EquinoxSeasons::new(Epoch::from_gregorian_utc_at_midnight(2014, 9, 23))
    }
}

impl EquinoxSeasons {
    /// Labeler referenced to the autumnal equinox `equinox`.
    pub fn new(equinox: Epoch) -> Self {
        EquinoxSeasons {
            equinox: equinox.to_mjd_utc_days(),
        }
    }

    /// Reference equinox, MJD (UTC).
    pub fn equinox_mjd(&self) -> MJD {
        self.equinox
    }

    fn global_season(&self, ra: f64, time: MJD) -> i64 {
        let ra_hours = ra / RADH;
        let days_since_equinox = 0.5 * ra_hours * (DAYS_PER_SEASON_YEAR / 12.0);
        let first_season_began = self.equinox + days_since_equinox - 0.5 * DAYS_PER_SEASON_YEAR;
        ((time - first_season_began) / DAYS_PER_SEASON_YEAR).floor() as i64
    }
}

impl SeasonLabeler for EquinoxSeasons {
    fn required_columns(&self, columns: &ColumnNames) -> Vec<String> {
        vec![columns.ra.clone(), columns.obs_time.clone()]
    }

    fn label(
        &self,
        batch: &ObservationBatch,
        columns: &ColumnNames,
    ) -> Result<SeasonLabels, DitherError> {
        let ra = batch.column(&columns.ra)?;
        let time = batch.column(&columns.obs_time)?;

        if let Some(row) = time
            .iter()
            .zip(ra)
            .position(|(t, r)| !(t.is_finite() && r.is_finite()))
        {
            return Err(DitherError::SeasonLabeling(format!(
                "non-finite {} or {} at row {row}",
                columns.obs_time, columns.ra
            )));
        }

        let Some(&t_first) = time.first() else {
            return Ok(SeasonLabels::default());
        };

        let global: Vec<i64> = ra
            .iter()
            .zip(time)
            .map(|(&r, &t)| self.global_season(r, t))
            .collect();
        let first_season = global.iter().copied().min().unwrap_or(0);

        Ok(SeasonLabels {
            season: global.into_iter().map(|s| s - first_season).collect(),
            year: time
                .iter()
                .map(|t| ((t - t_first) / DAYS_PER_SURVEY_YEAR).floor() as i64)
                .collect(),
        })
    }
}

/// Fold seasons beyond the last expected one back onto the first seasons.
///
/// Labels above 9 are replaced by `season mod 10`. A single overflow value is expected (the
/// partial eleventh season of a ten-year survey); several distinct ones point at a labeling
/// problem upstream.
///
/// Return
/// ----------
/// * The corrected labels.
/// * `Err(DitherError::AmbiguousSeasonOverflow)` listing the overflow values when more than one
///   distinct season exceeds 9.
///
/// # Example
///
/// ```rust
/// use skydither::seasons::wrap_seasons;
///
/// assert_eq!(wrap_seasons(&[8, 9, 10, 10, 0]).unwrap(), vec![8, 9, 0, 0, 0]);
/// assert!(wrap_seasons(&[8, 10, 11, 0]).is_err());
/// ```
pub fn wrap_seasons(seasons: &[i64]) -> Result<Vec<i64>, DitherError> {
    let overflow: Vec<i64> = seasons
        .iter()
        .copied()
        .filter(|&s| s > MAX_SEASON)
        .sorted_unstable()
        .dedup()
        .collect();

    match overflow.len() {
        0 => return Ok(seasons.to_vec()),
        1 => {}
        _ => return Err(DitherError::AmbiguousSeasonOverflow(overflow)),
    }

    let wrapped_visits = seasons.iter().filter(|&&s| s > MAX_SEASON).count();
    info!(
        season = overflow[0],
        visits = wrapped_visits,
        "wrapping overflow season"
    );

    Ok(seasons
        .iter()
        .map(|&s| if s > MAX_SEASON { s % SEASON_WRAP } else { s })
        .collect())
}
