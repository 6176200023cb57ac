use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skylark_core::properties::Properties;

const SAMPLE_CONTENT: &str = r#"
# Release signing credentials
keyAlias=upload
keyPassword=correct-horse-battery
storeFile=keys/upload-keystore.jks
storePassword=correct-horse-battery

# SDK locations
sdk.dir=/opt/android-sdk
flutter.sdk=/opt/flutter
"#;

fn bench_parse_small(c: &mut Criterion) {
    c.bench_function("parse_credentials_file", |b| {
        b.iter(|| Properties::parse(black_box(SAMPLE_CONTENT)))
    });
}

fn bench_parse_comment_heavy(c: &mut Criterion) {
    let content = format!("{}{}", "# padding line\n".repeat(200), SAMPLE_CONTENT);

    c.bench_function("parse_comment_heavy", |b| {
        b.iter(|| Properties::parse(black_box(&content)))
    });
}

fn bench_parse_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_scaling");
    for size in [10, 100, 1000].iter() {
        let content: String = (0..*size)
            .map(|i| format!("key.{}=value-{}\n", i, i))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| Properties::parse(black_box(content)))
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let props = Properties::parse(SAMPLE_CONTENT).unwrap();

    c.bench_function("lookup_key", |b| {
        b.iter(|| props.get(black_box("storePassword")))
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_comment_heavy,
    bench_parse_scaling,
    bench_lookup,
);
criterion_main!(benches);
