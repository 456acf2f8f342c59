use std::collections::BTreeMap;

/// Merges `overlay` into a copy of `base`. Overlay entries win.
pub fn merge_overwrite<K: Ord + Clone, V: Clone>(
    base: &BTreeMap<K, V>,
    overlay: BTreeMap<K, V>,
) -> BTreeMap<K, V> {
    let mut merged = base.clone();
    merged.extend(overlay);
    merged
}

/// Merges `overlay` into a copy of `base`, only adding keys `base` lacks.
pub fn merge_missing<K: Ord + Clone, V: Clone>(
    base: &BTreeMap<K, V>,
    overlay: BTreeMap<K, V>,
) -> BTreeMap<K, V> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.entry(key).or_insert(value);
    }
    merged
}
