//! Stable orderings; ties always keep the original index order.

/// Indices of `values` from largest to smallest.
pub(crate) fn argsort_desc(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    idx
}

/// `items` reordered by ascending `key`.
pub(crate) fn sorted_by_key_asc<F>(items: &[usize], key: F) -> Vec<usize>
where
    F: Fn(usize) -> f64,
{
    let mut out = items.to_vec();
    out.sort_by(|&a, &b| key(a).total_cmp(&key(b)));
    out
}

/// Position of every index within `order`.
pub(crate) fn ranks(order: &[usize]) -> Vec<usize> {
    let mut rank = vec![0; order.len()];
    for (pos, &idx) in order.iter().enumerate() {
        rank[idx] = pos;
    }
    rank
}
