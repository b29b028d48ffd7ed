use std::cmp::Ordering;
use std::hash::Hash;

use indexmap::IndexMap;

/// Sorts `items` by `cmp` and keeps the first `k`.
///
/// The comparator defines the final output order (best first). Callers
/// pass a total order, so the result never depends on the order the items
/// arrived in. `k` of zero yields an empty vec; `k` beyond the population
/// yields the whole population, never padding.
pub fn top_k_by<T, F>(mut items: Vec<T>, k: usize, cmp: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(cmp);
    items.truncate(k);
    items
}

/// Counts items per group key, preserving first-seen key order.
pub fn count_by<T, K, F>(items: &[T], mut key: F) -> IndexMap<K, u64>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut counts: IndexMap<K, u64> = IndexMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// Sums a value per group key, preserving first-seen key order.
pub fn sum_by<T, K, V, KF, VF>(items: &[T], mut key: KF, mut value: VF) -> IndexMap<K, V>
where
    K: Hash + Eq,
    V: std::ops::AddAssign + Default + Copy,
    KF: FnMut(&T) -> K,
    VF: FnMut(&T) -> V,
{
    let mut sums: IndexMap<K, V> = IndexMap::new();
    for item in items {
        *sums.entry(key(item)).or_default() += value(item);
    }
    sums
}
