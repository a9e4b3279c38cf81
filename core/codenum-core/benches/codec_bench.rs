// 코덱 핫패스 벤치마크
//
// Section 1: 선언된 상수 encode / decode (ordinal vs named)
// Section 2: 미지 값 decode (합성 후 캐시된 조회)

use codenum_core::{
    Codec, EnumDescriptor, EnumRegistry, EnumStrategy, RelationalValue, Representation,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn setup() -> EnumRegistry {
    let registry = EnumRegistry::new();
    registry
        .declare(EnumDescriptor::new(
            "Status",
            (0..64).map(|i| format!("STATUS_{i}")),
        ))
        .unwrap();
    registry
}

// ═══════════════════════════════════════════════════════════════════════════
// Section 1: 선언된 상수
// ═══════════════════════════════════════════════════════════════════════════

fn bench_declared(c: &mut Criterion) {
    let registry = setup();
    let status = registry.enum_type("Status").unwrap();
    let ordinal = Codec::new(EnumStrategy::Ordinal, status.clone(), Representation::NarrowInteger).unwrap();
    let named = Codec::new(EnumStrategy::Name, status.clone(), Representation::VariableChar).unwrap();
    let values = status.declared();

    let mut group = c.benchmark_group("declared");

    group.bench_function("ordinal_encode", |b| {
        let mut counter = 0;
        b.iter(|| {
            let value = &values[counter % values.len()];
            let _ = ordinal.encode(black_box(Some(value))).unwrap();
            counter += 1;
        })
    });

    group.bench_function("ordinal_decode", |b| {
        let mut counter = 0i8;
        b.iter(|| {
            let raw = RelationalValue::TinyInt(counter % 64);
            let _ = ordinal.decode(black_box(Some(&raw))).unwrap();
            counter = counter.wrapping_add(1).rem_euclid(64);
        })
    });

    group.bench_function("named_decode", |b| {
        let raws: Vec<_> = values
            .iter()
            .map(|v| RelationalValue::Text(v.name().to_string()))
            .collect();
        let mut counter = 0;
        b.iter(|| {
            let _ = named.decode(black_box(Some(&raws[counter % raws.len()]))).unwrap();
            counter += 1;
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Section 2: 미지 값
// ═══════════════════════════════════════════════════════════════════════════

fn bench_unknown(c: &mut Criterion) {
    let registry = setup();
    let status = registry.enum_type("Status").unwrap();
    let named = Codec::new(EnumStrategy::Name, status, Representation::VariableChar).unwrap();

    // 첫 호출에서 합성, 이후에는 조회만
    let raw = RelationalValue::Text("LEGACY".into());
    named.decode(Some(&raw)).unwrap();

    c.bench_function("unknown_named_decode", |b| {
        b.iter(|| {
            let _ = named.decode(black_box(Some(&raw))).unwrap();
        })
    });
}

criterion_group!(benches, bench_declared, bench_unknown);
criterion_main!(benches);
