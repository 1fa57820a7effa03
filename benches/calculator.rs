use chrono::TimeZone;
use criterion::{Criterion, criterion_group, criterion_main};
use moonwatch::{Coordinate, MeeusEphemeris, VisibilityCalculator};

fn calculator_benchmark(c: &mut Criterion) {
    let calculator = VisibilityCalculator::new(MeeusEphemeris);
    let london = Coordinate::new(51.5074, -0.1278).unwrap();
    let time = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

    c.bench_function("compute_observation", |b| {
        b.iter(|| calculator.compute_observation(time, &london).unwrap());
    });
}

criterion_group!(benches, calculator_benchmark);
criterion_main!(benches);
