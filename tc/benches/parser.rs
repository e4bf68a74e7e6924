//! Benchmarks for command tokenizing and parsing.
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use toolcmd::config::Config;
use toolcmd::{Parser, ToolRegistry, tokenize};

fn build_block(body_lines: usize) -> String {
    let mut s = format!("edit 1:{}\n", body_lines);
    for i in 0..body_lines {
        s.push_str(&format!("    let value_{i} = compute({i});\n"));
    }
    s.push_str("end_of_edit");
    s
}

fn parser() -> Parser {
    let registry = ToolRegistry::standard(&Config::default()).expect("standard registry");
    Parser::new(Arc::new(registry))
}

fn bench_tokenize(c: &mut Criterion) {
    let line = r#"create_pr --title "Fix the tokenizer" --body "Handles 'nested' quotes" --base main --draft"#;
    c.bench_function("tokenize_flags_and_quotes", |b| b.iter(|| tokenize(black_box(line))));
}

fn bench_parse_single_line(c: &mut Criterion) {
    let parser = parser();
    let mut group = c.benchmark_group("parse_single_line");

    for command in [
        "open src/lib.rs 120",
        "search_dir \"fn main\" src",
        "web_search how do I pin a future in rust",
        "create_pr --draft --base main --title \"Fix tokenizer\"",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(command), command, |b, command| {
            b.iter(|| parser.parse(black_box(command)));
        });
    }

    group.bench_function("not_a_command", |b| {
        b.iter(|| parser.parse(black_box("I will now look at the parser module")))
    });

    group.finish();
}

fn bench_parse_block(c: &mut Criterion) {
    let parser = parser();
    let mut group = c.benchmark_group("parse_block");

    for body_lines in [10, 100, 1_000] {
        let command = build_block(body_lines);
        group.throughput(Throughput::Bytes(command.len() as u64));
        group.bench_with_input(BenchmarkId::new("edit", body_lines), &command, |b, command| {
            b.iter(|| parser.parse(black_box(command)));
        });
    }

    group.finish();
}

fn bench_generate_docs(c: &mut Criterion) {
    let registry = ToolRegistry::standard(&Config::default()).expect("standard registry");
    c.bench_function("generate_docs", |b| b.iter(|| black_box(&registry).generate_docs()));
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse_single_line,
    bench_parse_block,
    bench_generate_docs
);
criterion_main!(benches);
