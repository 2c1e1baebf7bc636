use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cacophony::{tokenize, Evaluator, Parser};

const SOURCE: &str = r#"
    (:define greeting "hello \"world\"")
    (:define flag :true)
    (:if flag greeting "unreachable")
    (:define nested (:if (:if flag :false :true) "a" "b"))
    nested
"#;

fn lexer_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize program", |b| {
        b.iter(|| tokenize(black_box(SOURCE)))
    });
}

fn pipeline_benchmark(c: &mut Criterion) {
    c.bench_function("parse program", |b| {
        b.iter(|| Parser::new(tokenize(black_box(SOURCE))).parse().unwrap())
    });

    let program = Parser::new(tokenize(SOURCE)).parse().unwrap();
    c.bench_function("evaluate program", |b| {
        b.iter(|| {
            let mut evaluator = Evaluator::new(std::io::sink());
            evaluator.run(black_box(&program)).unwrap()
        })
    });
}

criterion_group!(benches, lexer_benchmark, pipeline_benchmark);
criterion_main!(benches);
