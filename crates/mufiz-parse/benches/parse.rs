use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

fn benchmark_parser(c: &mut Criterion) {
    let inputs = [
        (
            "Simple",
            r#"
            fun foo() {
                return 42;
            }
            "#,
        ),
        (
            "Medium",
            r#"
            class Counter < Base {
                init(start) { self.count = start; }
                tick() { self.count = self.count + 1; return self; }
            }

            fun bar(items) {
                var total = 0;
                foreach (item in items) {
                    if (item > 0 and item != 3) total = total + item * 2;
                    else print "skip";
                }
                for (var i = 0; i < 10; i = i + 1) print i % 3;
                var t = table { "a": {1, 2, 3}, "b": list {3+4i, 1.5} };
                return t["a"][0];
            }
            "#,
        ),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, code) in inputs {
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_code", name), code, |b, code| {
            b.iter(|| black_box(mufiz_parse::parse(code)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
