//! Benchmarks for parsing and evaluating formulas.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. eval_only: evaluation of a pre-parsed expression
//! 2. full_pipeline: parse and evaluate together
//! 3. summation: loop throughput of `sum(...)`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use formulon_core::{Expression, NoVariables, Parser, TimeoutManager, Variables};

/// Generate a chain like "x + x + ... + x" with `n` additions.
fn generate_variable_chain(n: usize) -> String {
    let mut expr = String::from("x");
    for _ in 0..n {
        expr.push_str(" + x");
    }
    expr
}

fn bench_eval_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_only");
    let vars = Variables::from([("x", 1.5)]);

    // The chain resolves `x` once per term, so stay under the default
    // recursive-substitution limit.
    for size in [100, 200, 400, 800] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let expr = Expression::parse(&generate_variable_chain(size)).expect("Parse failed");
            b.iter(|| expr.evaluate_with(black_box(&vars)).expect("Evaluation failed"));
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let vars = Variables::from([("x", 1.5)]);

    for size in [100, 200, 400, 800] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let source = generate_variable_chain(size);
            b.iter(|| {
                let expr = Expression::parse(black_box(&source)).expect("Parse failed");
                expr.evaluate_with(&vars).expect("Evaluation failed")
            });
        });
    }
    group.finish();
}

fn bench_summation(c: &mut Criterion) {
    let mut group = c.benchmark_group("summation");
    let parser = Parser::builder()
        .fold_constants(false)
        .max_summation_iterations(0)
        .build()
        .expect("Invalid options");

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let expr = parser
                .parse(&format!("sum(1, {size}, sqrt(n))"))
                .expect("Parse failed");
            b.iter(|| {
                let timeout = TimeoutManager::default();
                expr.evaluate_with_timeout(black_box(&NoVariables), &timeout)
                    .expect("Evaluation failed")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_eval_only, bench_full_pipeline, bench_summation);
criterion_main!(benches);
