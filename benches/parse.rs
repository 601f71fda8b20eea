use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [1_024usize, 10_240, 102_400] {
        let input = make_input(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| propertor::load(black_box(input.as_bytes())).expect("load should succeed"));
        });
    }
    group.finish();
}

fn bench_escapes(c: &mut Criterion) {
    let line = "key\\ with\\ spaces = \\u041f\\u0440\\u0438\\u0432\\u0435\\u0442 \\\n    continued\n";
    let input = line.repeat(1_000);
    c.bench_function("parse_escapes", |b| {
        b.iter(|| propertor::load(black_box(input.as_bytes())).expect("load should succeed"));
    });
}

fn make_input(bytes: usize) -> String {
    let line = "key = value\n";
    let repeat = bytes / line.len() + 1;
    line.repeat(repeat)
}

criterion_group!(benches, bench_parse, bench_escapes);
criterion_main!(benches);
