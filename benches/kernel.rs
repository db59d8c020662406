#[macro_use]
extern crate criterion;
extern crate newtonbrot;
extern crate num;

use criterion::{black_box, Criterion};
use newtonbrot::worker::{compute_row, compute_row_pooled};
use newtonbrot::{convergence, KernelParams, Region};
use num::Complex;

fn kernel_benches(c: &mut Criterion) {
    let params = KernelParams::default();

    c.bench_function("point near a root", move |b| {
        b.iter(|| convergence(black_box(Complex::new(0.9, 0.1)), &params))
    });

    c.bench_function("point at the origin", move |b| {
        b.iter(|| convergence(black_box(Complex::new(0.0, 0.0)), &params))
    });

    c.bench_function("one row of the base grid", move |b| {
        let region = Region::base(1).unwrap();
        b.iter(|| compute_row(&region, &params, black_box(999)))
    });

    c.bench_function("one pooled row of the base grid", move |b| {
        let region = Region::base(1).unwrap();
        b.iter(|| compute_row_pooled(&region, &params, black_box(999), 4))
    });
}

criterion_group!(benches, kernel_benches);
criterion_main!(benches);
