//! Pool-wide normalization applied between loading and partitioning.
//!
//! Every function works on the whole pool at once: label numbering and
//! matrix orientation are decided globally, never per sequence.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{s, Array1, Array2};

/// Map an arbitrary label set (e.g. `{1, 3, 5}`) onto `0..n` across the pool.
pub fn remap_labels(labels: &[Array1<i64>]) -> Vec<Array1<usize>> {
    let distinct: BTreeSet<i64> = labels.iter().flat_map(|y| y.iter().copied()).collect();
    let lookup: BTreeMap<i64, usize> = distinct
        .into_iter()
        .enumerate()
        .map(|(i, v)| (v, i))
        .collect();

    labels
        .iter()
        .map(|y| y.mapv(|v| lookup[&v]))
        .collect()
}

/// Re-densify already mapped labels, e.g. after smoothing removed a class.
pub fn redensify(labels: &[Array1<usize>]) -> Vec<Array1<usize>> {
    let widened: Vec<Array1<i64>> = labels.iter().map(|y| y.mapv(|v| v as i64)).collect();
    remap_labels(&widened)
}

/// 1-D median filter with reflected borders.
///
/// Window offsets run from `-(size / 2)` to `size - 1 - size / 2`, and the
/// element of rank `size / 2` is picked, so even windows take the upper median.
pub fn median_filter(y: &Array1<usize>, size: usize) -> Array1<usize> {
    let n = y.len();
    if n == 0 || size <= 1 {
        return y.clone();
    }
    let half = (size / 2) as isize;
    let mut window = Vec::with_capacity(size);

    Array1::from_iter((0..n as isize).map(|i| {
        window.clear();
        window.extend((i - half..i - half + size as isize).map(|j| y[reflect(j, n)]));
        let (_, median, _) = window.select_nth_unstable(size / 2);
        *median
    }))
}

// d c b a | a b c d | d c b a
fn reflect(j: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = j.rem_euclid(period) as usize;
    if m < n {
        m
    } else {
        2 * n - 1 - m
    }
}

/// Put every matrix in features x time order.
///
/// The decision is taken from the first matrix only: if it has more rows
/// than columns the whole pool is transposed.
pub fn orient(features: Vec<Array2<f64>>) -> Vec<Array2<f64>> {
    let transpose = features
        .first()
        .map(|x| x.nrows() > x.ncols())
        .unwrap_or(false);

    if transpose {
        features.into_iter().map(|x| x.reversed_axes()).collect()
    } else {
        features
    }
}

/// Keep every `rate`-th time step of a features x time matrix and its labels.
pub fn subsample(
    x: &Array2<f64>,
    y: &Array1<usize>,
    rate: usize,
) -> (Array2<f64>, Array1<usize>) {
    let rate = rate.max(1) as isize;
    (
        x.slice(s![.., ..;rate]).to_owned(),
        y.slice(s![..;rate]).to_owned(),
    )
}

/// Number of distinct labels across the pool.
pub fn count_classes(labels: &[Array1<usize>]) -> usize {
    labels
        .iter()
        .flat_map(|y| y.iter().copied())
        .collect::<BTreeSet<usize>>()
        .len()
}
