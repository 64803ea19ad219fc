use criterion::{Criterion, criterion_group, criterion_main};
use wireform::format::Format;

fn gen_spec(element_count: usize) -> String {
    let codes = ["t", "d", "f", "ui", "w", "ul", "c", "s[8]"];
    let mut tokens = Vec::with_capacity(element_count);

    for i in 0..element_count {
        tokens.push(codes[i % codes.len()]);
    }

    tokens.join(",")
}

fn gen_record(total_bytes: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(total_bytes);

    // Deterministic but non-trivial pattern: printable so s[] fields render,
    // capped below 0x3F so a t field decodes to an in-range timestamp.
    for i in 0..total_bytes {
        data.push(b' ' + (i * 13 % 31) as u8);
    }

    data
}

fn bench_format_parse(c: &mut Criterion) {
    for &element_count in &[1usize, 10, 50, 100] {
        let spec = gen_spec(element_count);

        c.bench_function(&format!("parse_{}_elements", element_count), |b| {
            b.iter(|| {
                let _ = Format::parse(&spec).unwrap();
            })
        });
    }
}

fn bench_bin_to_csv(c: &mut Criterion) {
    for &element_count in &[10usize, 100] {
        let format = Format::parse(&gen_spec(element_count)).unwrap();
        let record = gen_record(format.size());

        c.bench_function(&format!("bin_to_csv_{}_elements", element_count), |b| {
            b.iter(|| {
                let _ = format.bin_to_csv(&record, ',', None).unwrap();
            })
        });
    }
}

criterion_group!(benches, bench_format_parse, bench_bin_to_csv);
criterion_main!(benches);
