/*!
 * Paging Engine Benchmarks
 *
 * Access-path cost for hit-heavy and fault-heavy traces
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paging_kernel::memory::PagingEngine;
use paging_kernel::Process;

fn setup(frames: usize, pages: usize) -> (PagingEngine, Process) {
    let mut engine = PagingEngine::new(frames, 64).unwrap();
    let mut process = Process::new(1, "bench", pages * 64, 1, false);
    engine.allocate(&mut process).unwrap();
    (engine, process)
}

fn bench_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("access_hit");

    for frames in [8usize, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(frames), &frames, |b, &frames| {
            let (mut engine, process) = setup(frames, frames);
            for vpn in 0..frames {
                engine.access(&process, vpn, false).unwrap();
            }
            let mut vpn = 0;
            b.iter(|| {
                vpn = (vpn + 1) % frames;
                black_box(engine.access(&process, vpn, false).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_evictions(c: &mut Criterion) {
    let mut group = c.benchmark_group("access_evict");

    for frames in [8usize, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(frames), &frames, |b, &frames| {
            // Cycling over one page more than fits makes every access evict
            let pages = frames + 1;
            let (mut engine, process) = setup(frames, pages);
            let mut vpn = 0;
            b.iter(|| {
                vpn = (vpn + 1) % pages;
                black_box(engine.access(&process, vpn, false).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hits, bench_evictions);
criterion_main!(benches);
