//! Criterion benchmarks for the tokenizer and the expansion engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crex_lex::Lexer;

fn synthetic_source(functions: usize) -> String {
    let mut source = String::from(
        "#define MAX(a,b) ((a)>(b)?(a):(b))\n#define SCALE 4\n",
    );
    for i in 0..functions {
        source.push_str(&format!(
            "static int fn_{i}(int a, int b) {{\n\
             \tint result = MAX(a, b) * SCALE;\n\
             \tconst char* tag = \"fn_{i}\"; /* label */\n\
             \treturn result + 0x{i:x} + {i}.5;\n\
             }}\n"
        ));
    }
    source
}

fn drain(source: &str) -> usize {
    let mut lexer = Lexer::from_source("bench.c", source).unwrap();
    let mut count = 0;
    loop {
        let token = lexer.next_token().unwrap();
        if token.is_eof() {
            break;
        }
        count += 1;
    }
    count
}

fn bench_lexer(c: &mut Criterion) {
    let small = synthetic_source(10);
    let large = synthetic_source(200);

    c.bench_function("lex_small", |b| {
        b.iter(|| drain(black_box(&small)))
    });
    c.bench_function("lex_large", |b| {
        b.iter(|| drain(black_box(&large)))
    });
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
