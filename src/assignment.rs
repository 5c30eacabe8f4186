//! Mapping of visits onto offset-sequence vertices.
//!
//! Overview
//! -----------------
//! A [`Cadence`] decides how often a pointing receives a new offset. Every visit gets a
//! vertex index in `[0, L)`, `L` being the length of the offset sequence:
//!
//! | Cadence                    | Grouping                        | Vertex index                              |
//! |----------------------------|---------------------------------|-------------------------------------------|
//! | [`Cadence::FieldPerVisit`] | none (random) / field (ordered) | visit position, or `k mod L` within field |
//! | [`Cadence::FieldPerNight`] | field, then night               | `(cursor + night rank) mod L`             |
//! | [`Cadence::FieldPerSeason`]| field, then season              | `(cursor + season rank) mod L`            |
//! | [`Cadence::PerNight`]      | night, across all fields        | `night rank mod L`                        |
//! | [`Cadence::PerSeason`]     | season, across all fields       | `season rank mod L`                       |
//!
//! Ranks are insertion ranks among the sorted distinct values ([`searchsorted_ranks`]), so
//! every visit of a group shares the same vertex and consecutive groups get consecutive,
//! wrapping vertices. Fields are processed in ascending id order.
//!
//! The per-field cursor ([`VertexCursor`]) lets random patterns consume one long sequence
//! across fields instead of restarting at vertex 0 for each of them.
use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How often a pointing receives a new offset, and whether fields are treated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    FieldPerVisit,
    FieldPerNight,
    PerNight,
    FieldPerSeason,
    PerSeason,
}

impl Cadence {
    pub const ALL: [Cadence; 5] = [
        Cadence::FieldPerVisit,
        Cadence::FieldPerNight,
        Cadence::PerNight,
        Cadence::FieldPerSeason,
        Cadence::PerSeason,
    ];

    /// Name used to build stacker and column names.
    pub fn name(&self) -> &'static str {
        match self {
            Cadence::FieldPerVisit => "FieldPerVisit",
            Cadence::FieldPerNight => "FieldPerNight",
            Cadence::PerNight => "PerNight",
            Cadence::FieldPerSeason => "FieldPerSeason",
            Cadence::PerSeason => "PerSeason",
        }
    }

    pub fn is_per_field(&self) -> bool {
        matches!(
            self,
            Cadence::FieldPerVisit | Cadence::FieldPerNight | Cadence::FieldPerSeason
        )
    }

    pub fn uses_nights(&self) -> bool {
        matches!(self, Cadence::FieldPerNight | Cadence::PerNight)
    }

    pub fn uses_seasons(&self) -> bool {
        matches!(self, Cadence::FieldPerSeason | Cadence::PerSeason)
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the field cursor carries over from one field to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Every field starts again at vertex 0.
    ResetPerField,
    /// Each field starts where the previous one stopped, advanced by its visit count.
    Running,
}

/// Starting vertex of the field being assigned.
///
/// One cursor lives for exactly one stacker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexCursor {
    position: usize,
    mode: CursorMode,
}

impl VertexCursor {
    pub fn new(mode: CursorMode) -> Self {
        VertexCursor { position: 0, mode }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Move past a field holding `visits` visits.
    pub fn finish_field(&mut self, visits: usize) {
        if self.mode == CursorMode::Running {
            self.position += visits;
        }
    }
}

/// Sorted distinct values.
pub fn unique_sorted<K: Ord + Copy>(values: &[K]) -> Vec<K> {
    values.iter().copied().sorted_unstable().dedup().collect()
}

/// Insertion rank of each value among the sorted distinct values.
///
/// # Example
///
/// ```rust
/// use skydither::assignment::searchsorted_ranks;
///
/// assert_eq!(searchsorted_ranks(&[3, 3, 7, 7, 9]), vec![0, 0, 1, 1, 2]);
/// assert_eq!(searchsorted_ranks(&[9, 3, 7]), vec![2, 0, 1]);
/// ```
pub fn searchsorted_ranks<K: Ord + Copy>(values: &[K]) -> Vec<usize> {
    let unique = unique_sorted(values);
    values
        .iter()
        .map(|v| unique.partition_point(|u| u < v))
        .collect()
}

/// Wrap a float column into totally ordered keys.
pub fn ordered_keys(values: &[f64]) -> Vec<OrderedFloat<f64>> {
    values.iter().copied().map(OrderedFloat).collect()
}

/// Visit positions in each field, keyed by field id in ascending order.
fn group_by_field(fields: &[OrderedFloat<f64>]) -> BTreeMap<OrderedFloat<f64>, Vec<usize>> {
    let mut groups: BTreeMap<OrderedFloat<f64>, Vec<usize>> = BTreeMap::new();
    for (visit, field) in fields.iter().enumerate() {
        groups.entry(*field).or_default().push(visit);
    }
    groups
}

/// One fresh vertex per visit: visit `i` gets vertex `i mod len`.
pub fn visit_indices(n_visits: usize, len: usize) -> Vec<usize> {
    if len == 0 {
        return vec![0; n_visits];
    }
    (0..n_visits).map(|i| i % len).collect()
}

/// Sequential vertices within each field: the `k`-th visit of a field, in batch order, gets
/// vertex `k mod len`.
pub fn field_visit_indices(fields: &[OrderedFloat<f64>], len: usize) -> Vec<usize> {
    let mut indices = vec![0; fields.len()];
    if len == 0 {
        return indices;
    }
    for visits in group_by_field(fields).values() {
        for (k, &visit) in visits.iter().enumerate() {
            indices[visit] = k % len;
        }
    }
    indices
}

/// Per-field group ranks: within each field, visits are ranked by `keys` (night or season)
/// and get vertex `(cursor + rank) mod len`.
///
/// Arguments
/// -----------------
/// * `fields`: field id of every visit.
/// * `keys`: night or season label of every visit.
/// * `len`: length of the offset sequence.
/// * `cursor`: start vertex of each field, advanced after each field in
///   [`CursorMode::Running`].
pub fn field_group_indices<K: Ord + Copy>(
    fields: &[OrderedFloat<f64>],
    keys: &[K],
    len: usize,
    cursor: &mut VertexCursor,
) -> Vec<usize> {
    debug_assert_eq!(fields.len(), keys.len(), "field/key length mismatch");
    let mut indices = vec![0; fields.len()];
    if len == 0 {
        return indices;
    }

    for (field, visits) in group_by_field(fields) {
        let field_keys: Vec<K> = visits.iter().map(|&visit| keys[visit]).collect();
        let start = cursor.position();
        for (&visit, rank) in visits.iter().zip(searchsorted_ranks(&field_keys)) {
            indices[visit] = (start + rank) % len;
        }
        trace!(field = field.0, start, visits = visits.len(), "field assigned");
        cursor.finish_field(visits.len());
    }
    indices
}

/// Global group ranks: every visit gets vertex `rank mod len`, the rank of its night or
/// season among all the distinct values of the batch.
pub fn global_group_indices<K: Ord + Copy>(keys: &[K], len: usize) -> Vec<usize> {
    if len == 0 {
        return vec![0; keys.len()];
    }
    searchsorted_ranks(keys)
        .into_iter()
        .map(|rank| rank % len)
        .collect()
}

#[cfg(test)]
mod assignment_test {
    use super::*;

    fn keys(values: &[f64]) -> Vec<OrderedFloat<f64>> {
        ordered_keys(values)
    }

    #[test]
    fn test_searchsorted_ranks() {
        assert_eq!(searchsorted_ranks(&[3, 3, 7, 7, 9]), vec![0, 0, 1, 1, 2]);
        assert_eq!(searchsorted_ranks::<i64>(&[]), Vec::<usize>::new());
        assert_eq!(
            searchsorted_ranks(&keys(&[2.5, -1.0, 2.5, 10.0])),
            vec![1, 0, 1, 2]
        );
    }

    #[test]
    fn test_unique_sorted() {
        assert_eq!(unique_sorted(&[5, 1, 5, 3, 1]), vec![1, 3, 5]);
    }

    #[test]
    fn test_visit_indices_wrap() {
        assert_eq!(visit_indices(5, 3), vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_field_visit_indices() {
        let fields = keys(&[2.0, 1.0, 2.0, 1.0, 2.0, 2.0]);
        assert_eq!(field_visit_indices(&fields, 3), vec![0, 0, 1, 1, 2, 0]);
    }

    #[test]
    fn test_field_group_indices_reset_per_field() {
        let fields = keys(&[1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0]);
        let nights = keys(&[3.0, 3.0, 7.0, 7.0, 9.0, 7.0, 8.0]);
        let mut cursor = VertexCursor::new(CursorMode::ResetPerField);

        let indices = field_group_indices(&fields, &nights, 10, &mut cursor);
        assert_eq!(indices, vec![0, 0, 1, 1, 2, 0, 1]);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_field_group_indices_running_cursor() {
        let fields = keys(&[1.0, 1.0, 2.0, 2.0]);
        let nights = keys(&[1.0, 2.0, 1.0, 2.0]);
        let mut cursor = VertexCursor::new(CursorMode::Running);

        let indices = field_group_indices(&fields, &nights, 4, &mut cursor);
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_field_group_indices_wrap() {
        let fields = keys(&[1.0; 4]);
        let seasons = [0_i64, 1, 2, 3];
        let mut cursor = VertexCursor::new(CursorMode::ResetPerField);
        assert_eq!(
            field_group_indices(&fields, &seasons, 3, &mut cursor),
            vec![0, 1, 2, 0]
        );
    }

    #[test]
    fn test_global_group_indices() {
        let nights = keys(&[5.0, 1.0, 5.0, 9.0, 1.0]);
        assert_eq!(global_group_indices(&nights, 10), vec![1, 0, 1, 2, 0]);
        assert_eq!(global_group_indices(&nights, 2), vec![1, 0, 1, 0, 0]);
    }

    #[test]
    fn test_cadence_flags() {
        assert!(Cadence::FieldPerSeason.is_per_field());
        assert!(!Cadence::PerNight.is_per_field());
        assert!(Cadence::PerNight.uses_nights());
        assert!(Cadence::PerSeason.uses_seasons());
        assert!(!Cadence::FieldPerVisit.uses_nights());
        assert_eq!(Cadence::FieldPerNight.to_string(), "FieldPerNight");
    }
}
