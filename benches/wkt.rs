use criterion::{criterion_group, criterion_main, Criterion};
use pggeo::geometry::Geometry;

fn line_wkt(vertices: usize) -> String {
    let coords: Vec<String> = (0..vertices)
        .map(|i| format!("{} {} 1", i as f64 * 0.25, (i as f64).sqrt()))
        .collect();
    format!("SRID=4326;LINESTRING Z ({})", coords.join(", "))
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let text = line_wkt(10_000);
    let geom = Geometry::from_wkt(&text).unwrap();

    c.bench_function("parse EWKT LineString", |b| {
        b.iter(|| {
            let _geom = Geometry::from_wkt(&text).unwrap();
        })
    });
    c.bench_function("write EWKT LineString", |b| {
        b.iter(|| {
            let _text = geom.ewkt();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
