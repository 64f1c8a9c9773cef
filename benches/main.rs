#[macro_use]
extern crate criterion;

mod tree;

criterion_group!(
    benches,
    crate::tree::insert,
    crate::tree::remove,
    crate::tree::count_less_than,
    crate::tree::random_item,
    crate::tree::iter,
    crate::btreeset::insert,
    crate::btreeset::remove,
    crate::btreeset::iter,
    crate::random::unique_draw,
    crate::random::weighted_sample
);
criterion_main!(benches);
