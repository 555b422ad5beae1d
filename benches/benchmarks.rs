use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabhost::surface::SurfaceRegistry;
use tabhost::{SurfaceId, SurfaceParams, TabHost};

/// Detach a tab behind a placeholder and put it back, one full tick each
fn benchmark_detach_reattach(c: &mut Criterion) {
    c.bench_function("detach_reattach", |b| {
        let mut host = TabHost::new();
        let window = host.open_window();
        let id = host
            .create_tab(SurfaceParams::in_window(window).with_url("https://bench.test/"))
            .unwrap();
        host.run_until_idle();

        b.iter(|| {
            let placeholder = host.detach_guest(id).unwrap();
            host.move_to_window(id, Some(window));
            black_box(placeholder);
            host.run_until_idle()
        })
    });
}

/// Benchmark group for identity lookups
fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    group.bench_function("registry", |b| {
        let mut registry = SurfaceRegistry::new();
        for id in 0..1_000 {
            registry.register(SurfaceId::new(id), id % 16, id);
        }
        b.iter(|| registry.lookup(black_box(SurfaceId::new(512))))
    });

    group.bench_function("tab_by_id", |b| {
        let mut host = TabHost::new();
        let window = host.open_window();
        let ids: Vec<SurfaceId> = (0..100)
            .map(|_| host.create_tab(SurfaceParams::in_window(window)).unwrap())
            .collect();
        b.iter(|| host.tab_by_id(black_box(ids[50])).is_some())
    });

    group.finish();
}

criterion_group!(benches, benchmark_detach_reattach, benchmark_lookup);
criterion_main!(benches);
