use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use skydither::{
    ColumnNames, DitherParams, DitherStacker, ObservationBatch, Stacker, NAMED_STACKERS,
};

/// About eight years of visits on 500 fields.
fn synthetic_survey() -> ObservationBatch {
    let n_fields = 500;
    let n_nights = 3000;
    let mut ra = Vec::new();
    let mut dec = Vec::new();
    let mut field_id = Vec::new();
    let mut night = Vec::new();
    let mut mjd = Vec::new();

    for j in 0..n_nights {
        // every field comes back once every 25 nights
        for i in (j % 25..n_fields).step_by(25) {
            let t = 59580.0 + j as f64 + 0.001 * i as f64;
            ra.push(0.0125 * i as f64);
            dec.push(-1.2 + 0.0045 * i as f64);
            field_id.push(i as f64);
            night.push(j as f64);
            mjd.push(t);
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

fn bench_named_stackers(c: &mut Criterion) {
    let survey = synthetic_survey();
    let params = DitherParams::builder().random_seed(42).build().unwrap();

    let mut group = c.benchmark_group("dither_stacker");
    group.sample_size(10);
    for &(pattern, cadence) in NAMED_STACKERS {
        let stacker =
            DitherStacker::new(pattern, cadence, params.clone(), ColumnNames::default()).unwrap();
        group.bench_function(stacker.name(), |b| {
            b.iter_batched(
                || survey.clone(),
                |mut batch| {
                    stacker.run(&mut batch).unwrap();
                    black_box(batch)
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_named_stackers);
criterion_main!(benches);
