use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use geoproximity::config::IndexOptions;
use geoproximity::index::ProximityIndex;
use geoproximity::models::GeoPoint;
use geoproximity::query::{QueryContext, SortExecutor, SortIndex, SortOptions};

fn build_index(doc_count: u64) -> ProximityIndex {
    let index = ProximityIndex::new("geolocation", &IndexOptions::default());
    for i in 0..doc_count {
        // deterministic spread over the globe
        let lat = ((i * 37) % 180) as f64 - 89.5;
        let lng = ((i * 101) % 360) as f64 - 179.5;
        index.index_document(i, &GeoPoint::new(lat, lng)).unwrap();
    }
    index
}

fn bench_sort(c: &mut Criterion) {
    let counts = [1_000u64, 10_000, 100_000];
    let ctx = QueryContext::with_center(48.8566, 2.3522);

    let mut group = c.benchmark_group("proximity_sort");
    for &count in &counts {
        let index = build_index(count);
        let candidates: Vec<u64> = (0..count).collect();

        group.bench_with_input(BenchmarkId::new("full", count), &count, |b, _| {
            b.iter(|| {
                let keys = index.sort_keys(&ctx).unwrap();
                let result = SortExecutor::sort(
                    candidates.iter().copied(),
                    keys.as_ref(),
                    SortOptions::default(),
                )
                .unwrap();
                black_box(result.hits.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("top_10", count), &count, |b, _| {
            b.iter(|| {
                let keys = index.sort_keys(&ctx).unwrap();
                let result = SortExecutor::sort(
                    candidates.iter().copied(),
                    keys.as_ref(),
                    SortOptions::default().with_limit(10),
                )
                .unwrap();
                black_box(result.hits.len())
            })
        });
    }
    group.finish();
}

fn bench_index_document(c: &mut Criterion) {
    let index = ProximityIndex::new("geolocation", &IndexOptions::default());
    let mut id = 0u64;

    c.bench_function("index_document", |b| {
        b.iter(|| {
            id += 1;
            let point = GeoPoint::new((id % 180) as f64 - 90.0, (id % 360) as f64 - 180.0);
            black_box(index.index_document(id, &point).unwrap())
        })
    });
}

criterion_group!(benches, bench_sort, bench_index_document);
criterion_main!(benches);
