#![allow(dead_code)]

use std::f64::consts::PI;

use skydither::{
    constants::{DPI, RADEG},
    observations::ObservationBatch,
};

/// `n_fields` fields observed on each of `n_nights` nights, one visit per field and night,
/// visits sorted by night.
///
/// Fields sit away from RA = 0 and from the poles, nights are nine days apart.
pub fn survey_batch(n_fields: usize, n_nights: usize) -> ObservationBatch {
    let mut ra = Vec::new();
    let mut dec = Vec::new();
    let mut field_id = Vec::new();
    let mut night = Vec::new();
    let mut mjd = Vec::new();

    for j in 0..n_nights {
        for i in 0..n_fields {
            ra.push(0.3 + 0.7 * i as f64);
            dec.push(-0.2 - 0.15 * i as f64);
            field_id.push(100.0 + i as f64);
            night.push(1.0 + j as f64);
            mjd.push(59580.0 + 9.0 * j as f64 + 0.01 * i as f64);
        }
    }

    ObservationBatch::from_columns([
        ("fieldRA", ra),
        ("fieldDec", dec),
        ("fieldID", field_id),
        ("night", night),
        ("expMJD", mjd),
    ])
    .unwrap()
}

/// Signed difference `a − b` folded into `(−π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(DPI);
    if d > PI {
        d - DPI
    } else {
        d
    }
}

/// Check that every output pointing is wrapped into range.
pub fn assert_wrapped(ra: &[f64], dec: &[f64]) {
    for (r, d) in ra.iter().zip(dec) {
        assert!((0.0..DPI).contains(r), "RA {r} out of [0, 2π)");
        assert!(
            (-PI / 2.0..=PI / 2.0).contains(d),
            "Dec {d} out of [-π/2, π/2]"
        );
    }
}

/// Check that every dithered pointing lies within `max_dither_deg` of its original pointing,
/// the RA shift being measured on the sky (times `cos(dec)`).
pub fn assert_within_dither(
    batch: &ObservationBatch,
    stacker_name: &str,
    max_dither_deg: f64,
) {
    let max_dither = max_dither_deg * RADEG;
    let ra = batch.column("fieldRA").unwrap();
    let dec = batch.column("fieldDec").unwrap();
    let new_ra = batch.column(&format!("{stacker_name}RA")).unwrap();
    let new_dec = batch.column(&format!("{stacker_name}Dec")).unwrap();

    for i in 0..batch.len() {
        let x = angle_diff(new_ra[i], ra[i]) * dec[i].cos();
        let y = new_dec[i] - dec[i];
        assert!(
            x.hypot(y) <= max_dither * (1.0 + 1e-9),
            "{stacker_name}: visit {i} moved by {} rad",
            x.hypot(y)
        );
    }
}
