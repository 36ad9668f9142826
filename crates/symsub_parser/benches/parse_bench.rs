use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use symsub_core::intern::StringInterner;
use symsub_parser::Parser;

// A medium-size source with every supported statement form.
const SOURCE: &str = r#"
// Accumulators
function accumulate(x, y, z) {
    let a = x + 1;
    let b = a + y;
    let c = 0;

    if (b < z) {
        c = c + 5;
        return x + y + z + c;
    } else if (b < z * 2) {
        c = c + x + 5;
        return x + y + z + c;
    } else {
        c = c + z + 5;
        return x + y + z + c;
    }
}

function loop(n, step) {
    var total = 0, i = 0;
    while (i < n) {
        total += i * step;
        i = i + 1;
    }
    do {
        total -= 1;
    } while (total > 100);
    for (let k = 0; k < n; k = k + 1) {
        if (k % 2 === 0) continue;
        if (k > 10) break;
        total = total + (k ** 2) / 3;
    }
    return total;
}

function flags(a, b) {
    const both = a && b, either = a || b;
    if (!both && either !== null) {
        return 'exactly one';
    }
    return both;
}

let seed = 0x1F;
let label = "seed: " + seed;
report(label, accumulate(seed, 2, 3), loop(10, 2));
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let interner = StringInterner::new();
            let mut parser = Parser::new(&arena, &interner, "bench.js", black_box(SOURCE));
            let source_file = parser.parse_source_file();
            black_box(source_file.statements.len());
            black_box(parser.take_diagnostics());
        });
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
