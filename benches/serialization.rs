use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_pack::{from_slice, from_slice_compact, to_vec, to_vec_compact};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn sample_user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn sample_products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = sample_user();

    let mut group = c.benchmark_group("serialize_simple_struct");
    group.bench_function("verbose", |b| b.iter(|| to_vec(black_box(&user))));
    group.bench_function("compact", |b| b.iter(|| to_vec_compact(black_box(&user))));
    group.finish();
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let user = sample_user();
    let verbose = to_vec(&user).unwrap();
    let compact = to_vec_compact(&user).unwrap();

    let mut group = c.benchmark_group("deserialize_simple_struct");
    group.bench_function("verbose", |b| {
        b.iter(|| from_slice::<User>(black_box(&verbose)))
    });
    group.bench_function("compact", |b| {
        b.iter(|| from_slice_compact::<User>(black_box(&compact)))
    });
    group.finish();
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let products = sample_products(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_vec(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let bytes = to_vec(&sample_products(*size)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| from_slice::<Vec<Product>>(black_box(bytes)))
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let data = NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    };
    let bytes = to_vec(&data).unwrap();

    c.bench_function("serialize_nested_struct", |b| {
        b.iter(|| to_vec(black_box(&data)))
    });

    c.bench_function("deserialize_nested_struct", |b| {
        b.iter(|| from_slice::<NestedData>(black_box(&bytes)))
    });
}

fn benchmark_primitive_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_array");

    let numbers: Vec<i32> = (0..100).collect();
    let bools: Vec<bool> = (0..100).map(|i| i % 2 == 0).collect();
    let floats: Vec<f64> = (0..100).map(|i| i as f64 * 1.5).collect();

    group.bench_function("serialize_integers", |b| {
        b.iter(|| to_vec(black_box(&numbers)))
    });

    group.bench_function("serialize_booleans", |b| {
        b.iter(|| to_vec(black_box(&bools)))
    });

    group.bench_function("serialize_floats", |b| {
        b.iter(|| to_vec(black_box(&floats)))
    });

    let numbers_bytes = to_vec(&numbers).unwrap();
    let bools_bytes = to_vec(&bools).unwrap();
    let floats_bytes = to_vec(&floats).unwrap();

    group.bench_function("deserialize_integers", |b| {
        b.iter(|| from_slice::<Vec<i32>>(black_box(&numbers_bytes)))
    });

    group.bench_function("deserialize_booleans", |b| {
        b.iter(|| from_slice::<Vec<bool>>(black_box(&bools_bytes)))
    });

    group.bench_function("deserialize_floats", |b| {
        b.iter(|| from_slice::<Vec<f64>>(black_box(&floats_bytes)))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let user = sample_user();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("pack_serialize", |b| {
        b.iter(|| serde_pack::to_vec(black_box(&user)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_vec(black_box(&user)))
    });

    let pack_bytes = serde_pack::to_vec(&user).unwrap();
    let json_bytes = serde_json::to_vec(&user).unwrap();

    group.bench_function("pack_deserialize", |b| {
        b.iter(|| serde_pack::from_slice::<User>(black_box(&pack_bytes)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_slice::<User>(black_box(&json_bytes)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let user = sample_user();

    c.bench_function("roundtrip_simple", |b| {
        b.iter(|| {
            let bytes = to_vec(black_box(&user)).unwrap();
            let (_user, _rest): (User, _) = from_slice(black_box(&bytes)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_nested,
    benchmark_primitive_array,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);
criterion_main!(benches);
