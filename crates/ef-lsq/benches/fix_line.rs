use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ef_core::{BitDepth, Line, LineMut};
use ef_lsq::EdgeEstimator;

fn build_lines(len: usize) -> (Vec<u16>, Vec<u16>) {
    let good: Vec<u16> = (0..len).map(|i| ((i * 37) % 1021) as u16).collect();
    let bad: Vec<u16> = good.iter().map(|&v| v / 2 + 7).collect();
    (good, bad)
}

fn bench_fix_line(c: &mut Criterion) {
    let len = 1920usize;
    let (good, bad) = build_lines(len);
    let mut est = EdgeEstimator::try_new(len).expect("scratch");
    let depth = BitDepth::new(10, 2).expect("10-bit");

    for radius in [0usize, 8, 64] {
        c.bench_function(&format!("fix_line_u16_1920_radius_{radius}"), |b| {
            b.iter(|| {
                let mut work = bad.clone();
                let good_line = Line::new(&good, 0, 1, len);
                let mut bad_line = LineMut::new(&mut work, 0, 1, len);
                est.fix_line(&mut bad_line, &good_line, black_box(radius), depth);
                black_box(work);
            });
        });
    }
}

criterion_group!(benches, bench_fix_line);
criterion_main!(benches);
