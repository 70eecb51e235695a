//! Lexer throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zinc_lex::{Lexer, TokenKind};

const SNIPPET: &str = r#"
static unsigned long hash(const char *key, unsigned long seed) {
    unsigned long h = seed;
    while (*key) {
        h = h * 31 + *key;
        key = key + 1;
    }
    return h ^ (h >> 16);
}
"#;

fn lex_snippet(source: &str) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    loop {
        let token = lexer.next_token().expect("lex failure");
        if token.kind == TokenKind::Eof {
            break;
        }
        count += 1;
    }
    count
}

fn bench_lexer(c: &mut Criterion) {
    let large: String = SNIPPET.repeat(128);

    c.bench_function("lex_small_function", |b| {
        b.iter(|| lex_snippet(black_box(SNIPPET)))
    });

    c.bench_function("lex_128_functions", |b| {
        b.iter(|| lex_snippet(black_box(&large)))
    });
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
