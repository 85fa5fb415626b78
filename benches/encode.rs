use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ultrabar::api::Pipeline;
use ultrabar::prelude::*;

fn make_digits(len: usize, seed: u32) -> String {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(1664525).wrapping_add(1013904223);
            char::from(b'0' + ((x >> 24) % 10) as u8)
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let pipeline = Pipeline::default();
    let long_digits = make_digits(64, 123);

    c.bench_function("ean13 explicit", |b| {
        let req = BarcodeRequest::new("400638133393").with_symbology(Symbology::Ean);
        b.iter(|| black_box(pipeline.encode(black_box(&req))).map(|s| s.text.len()))
    });

    c.bench_function("isbn + add-on", |b| {
        let req = BarcodeRequest::new("0-306-40615-2 51234");
        b.iter(|| black_box(pipeline.encode(black_box(&req))).map(|s| s.text.len()))
    });

    c.bench_function("code39 extended", |b| {
        let req = BarcodeRequest::new("Hello, world! 0123456789").with_symbology(Symbology::Code39Extended);
        b.iter(|| black_box(pipeline.encode(black_box(&req))).map(|s| s.text.len()))
    });

    c.bench_function("code128c 64 digits", |b| {
        let req = BarcodeRequest::new(long_digits.clone()).with_symbology(Symbology::Code128C);
        b.iter(|| black_box(pipeline.encode(black_box(&req))).map(|s| s.text.len()))
    });

    c.bench_function("i25 64 digits + wire string", |b| {
        let req = BarcodeRequest::new(long_digits.clone()).with_symbology(Symbology::Interleaved2of5);
        b.iter(|| {
            // полный путь: кодирование -> строки для рендерера
            let sym = pipeline.encode(black_box(&req)).ok();
            black_box(sym.map(|s| (s.pattern_string().len(), s.text_string().len())))
        })
    });

    c.bench_function("autodetect miss", |b| {
        b.iter(|| black_box(pipeline.detect(black_box("héllo"))).is_none())
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
