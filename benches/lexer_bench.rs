use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rill::lexer::tokenize;

// A reasonably complex input string for benchmarking
const BENCH_INPUT: &str = r#"
width = 1920
height = 1080
aspect = width / height
print aspect

celsius = 37.5
fahrenheit = celsius * 9 / 5 + 32
print fahrenheit

greeting = "hello"
name = "world"
message = greeting + ", " + name
print message

hot = fahrenheit >= 98.6
wide = aspect > 1
print hot and wide
print not hot or (width == 1920)

x = 5
x = x + 2
x = x * x - 1
print (x + 1) / (x - 1) <= x
print "x is " + "computed"

width = 1920
height = 1080
aspect = width / height
print aspect

celsius = 37.5
fahrenheit = celsius * 9 / 5 + 32
print fahrenheit

greeting = "hello"
name = "world"
message = greeting + ", " + name
print message

hot = fahrenheit >= 98.6
wide = aspect > 1
print hot and wide
print not hot or (width == 1920)

x = 5
x = x + 2
x = x * x - 1
print (x + 1) / (x - 1) <= x
print "x is " + "computed"

width = 1920
height = 1080
aspect = width / height
print aspect

celsius = 37.5
fahrenheit = celsius * 9 / 5 + 32
print fahrenheit

greeting = "hello"
name = "world"
message = greeting + ", " + name
print message

hot = fahrenheit >= 98.6
wide = aspect > 1
print hot and wide
print not hot or (width == 1920)

x = 5
x = x + 2
x = x * x - 1
print (x + 1) / (x - 1) <= x
print "x is " + "computed"
"#;

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("Lexer");

    group.bench_with_input(
        BenchmarkId::new("tokenize", "complex_input"),
        &BENCH_INPUT,
        |b, input| b.iter(|| tokenize(black_box(input))),
    );

    group.finish();
}

criterion_group!(benches, bench_tokenizer);
criterion_main!(benches);
