use criterion::{Criterion, criterion_group, criterion_main};
use treedown_engine::{CompileFlags, Document};

fn generate_document(sections: usize) -> String {
    let base = "# Section\n\nA paragraph with a few\nlines of inline content.\n\n- first point\n  - nested point\n- second point\n\n> %aside%\n> quoted remark\n\n```rust\nfn demo() {}\n```\n\n";
    base.repeat(sections)
}

fn bench_compile_and_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump");
    group.sample_size(10);

    let content = generate_document(100);

    group.bench_function("compile", |b| {
        b.iter(|| {
            let mut doc = Document::new(std::hint::black_box(&content));
            doc.compile(CompileFlags::STANDARD);
            std::hint::black_box(doc.tree().is_some());
        });
    });

    group.bench_function("compile_and_dump", |b| {
        b.iter(|| {
            let mut doc = Document::new(std::hint::black_box(&content));
            let out = doc
                .dump_to_string(CompileFlags::STANDARD, "bench.md")
                .unwrap();
            std::hint::black_box(out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compile_and_dump);
criterion_main!(benches);
