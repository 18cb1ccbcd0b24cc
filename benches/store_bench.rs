//! Benchmarks for filehub storage operations

use criterion::{criterion_group, criterion_main, Criterion};
use filehub::FileStore;
use tempfile::TempDir;

fn store_benchmarks(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open_path(temp.path()).unwrap();
    let payload = vec![0xabu8; 16 * 1024];

    store.put("bench-read.bin", &payload).unwrap();

    let mut counter = 0u64;
    c.bench_function("put 16k blob", |b| {
        b.iter(|| {
            let name = format!("bench-write-{}.bin", counter);
            counter += 1;
            store.put(&name, &payload).unwrap()
        })
    });

    c.bench_function("get 16k blob by name", |b| {
        b.iter(|| store.get_by_name("bench-read.bin").unwrap())
    });

    c.bench_function("get 16k blob by id", |b| {
        b.iter(|| store.get_by_id(0).unwrap())
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
