//! Sorting and order statistics over `f64` slices.
//!
//! All functions operate on plain slices so they can be applied directly to
//! population fitness vectors. Sorting uses [`f64::total_cmp`], so NaN values
//! never cause a panic; their position in the result is unspecified.

/// Sorts values in ascending order in place.
///
/// The sort is not stable. NaN values end up at one of the ends.
///
/// # Examples
///
/// ```
/// use banister_stats::order;
///
/// let mut values = [3.0, -1.0, 2.0];
/// order::sort(&mut values);
/// assert_eq!(values, [-1.0, 2.0, 3.0]);
/// ```
pub fn sort(data: &mut [f64]) {
    data.sort_unstable_by(f64::total_cmp);
}

/// Returns the indices that would sort `data` in ascending order.
///
/// Applying the returned permutation to `data` yields the same sequence as
/// [`sort`].
///
/// # Examples
///
/// ```
/// use banister_stats::order;
///
/// let values = [-0.188, 0.262, 0.648, -0.241, 0.213, -0.145, 0.604, 0.721];
/// assert_eq!(order::sort_index(&values), vec![3, 0, 5, 4, 1, 6, 2, 7]);
/// ```
#[must_use]
pub fn sort_index(data: &[f64]) -> Vec<usize> {
    let mut indices = (0..data.len()).collect::<Vec<_>>();
    indices.sort_unstable_by(|&a, &b| data[a].total_cmp(&data[b]));
    indices
}

/// Computes the median of sorted data.
///
/// For even lengths the two middle values are averaged. Returns NaN if the
/// input is empty.
#[must_use]
pub fn median_from_sorted(sorted_data: &[f64]) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }
    let lower = (n - 1) / 2;
    let upper = n / 2;
    if lower == upper {
        sorted_data[lower]
    } else {
        (sorted_data[lower] + sorted_data[upper]) / 2.0
    }
}

/// Computes the `q` quantile of sorted data by linear interpolation.
///
/// The fractional rank is `q * (n - 1)`; the result interpolates between the
/// two sorted values bracketing that rank. `q = 0.0` gives the minimum and
/// `q = 1.0` the maximum. A rank that falls exactly on a value returns it
/// unchanged, so infinite values are reported as such. Returns NaN if the
/// input is empty.
///
/// # Examples
///
/// ```
/// use banister_stats::order;
///
/// let values = [-0.595, -0.505, -0.464, -0.332, 0.248, 0.353, 0.802, 0.876];
/// let q1 = order::quantile_from_sorted(&values, 0.25);
/// assert!((q1 - -0.47425).abs() < 1e-9);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn quantile_from_sorted(sorted_data: &[f64], q: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }
    let rank = q * (n - 1) as f64;
    let lower = (rank as usize).min(n - 1);
    if lower == n - 1 {
        return sorted_data[lower];
    }
    let delta = rank - lower as f64;
    if delta == 0.0 {
        return sorted_data[lower];
    }
    (sorted_data[lower + 1] - sorted_data[lower]).mul_add(delta, sorted_data[lower])
}

/// Returns the index of the smallest value.
///
/// If any value is NaN, the index of the first NaN is returned. Ties resolve to
/// the first occurrence. Returns `0` for empty input.
#[must_use]
pub fn min_index(data: &[f64]) -> usize {
    extremum_index(data, |candidate, best| candidate < best)
}

/// Returns the index of the largest value.
///
/// If any value is NaN, the index of the first NaN is returned. Ties resolve to
/// the first occurrence. Returns `0` for empty input.
///
/// # Examples
///
/// ```
/// use banister_stats::order;
///
/// assert_eq!(order::max_index(&[1.0, 5.0, 5.0, 2.0]), 1);
/// assert_eq!(order::max_index(&[1.0, f64::NAN, 5.0]), 1);
/// ```
#[must_use]
pub fn max_index(data: &[f64]) -> usize {
    extremum_index(data, |candidate, best| candidate > best)
}

fn extremum_index<F>(data: &[f64], better: F) -> usize
where
    F: Fn(f64, f64) -> bool,
{
    let mut best_index = 0;
    for (i, &value) in data.iter().enumerate() {
        if value.is_nan() {
            return i;
        }
        if better(value, data[best_index]) {
            best_index = i;
        }
    }
    best_index
}

/// Returns the minimum and maximum values as `(min, max)`.
///
/// Returns `(NaN, NaN)` if the input is empty or contains a NaN.
#[must_use]
pub fn min_max(data: &[f64]) -> (f64, f64) {
    let Some(&first) = data.first() else {
        return (f64::NAN, f64::NAN);
    };
    let mut min = first;
    let mut max = first;
    for &value in data {
        if value.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        min = min.min(value);
        max = max.max(value);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSORTED: [f64; 8] = [-0.188, 0.262, 0.648, -0.241, 0.213, -0.145, 0.604, 0.721];
    const SORTED: [f64; 8] = [-0.595, -0.505, -0.464, -0.332, 0.248, 0.353, 0.802, 0.876];

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sort() {
        let mut values = UNSORTED;
        sort(&mut values);
        assert_eq!(
            values,
            [-0.241, -0.188, -0.145, 0.213, 0.262, 0.604, 0.648, 0.721]
        );
    }

    #[test]
    fn test_sort_index() {
        assert_eq!(sort_index(&UNSORTED), vec![3, 0, 5, 4, 1, 6, 2, 7]);
        assert!(sort_index(&[]).is_empty());
    }

    #[test]
    fn test_sort_index_matches_sort() {
        let values = [5.5, -3.0, 0.0, 12.25, -7.5, 1.0, 1.5];
        let permuted = sort_index(&values)
            .into_iter()
            .map(|i| values[i])
            .collect::<Vec<_>>();
        let mut sorted = values;
        sort(&mut sorted);
        assert_eq!(permuted, sorted);
    }

    #[test]
    fn test_median_from_sorted() {
        assert!(approx_eq(median_from_sorted(&SORTED), -0.042));
        assert!(approx_eq(median_from_sorted(&SORTED[..7]), -0.332));
        assert!(median_from_sorted(&[]).is_nan());
    }

    #[test]
    fn test_quantile_from_sorted() {
        let cases = [
            (0.0, -0.595),
            (0.1, -0.532),
            (0.25, -0.47425),
            (0.5, -0.042),
            (0.8, 0.6224),
            (1.0, 0.876),
        ];
        for (q, expected) in cases {
            let actual = quantile_from_sorted(&SORTED, q);
            assert!(approx_eq(actual, expected), "q={q}: {actual} != {expected}");
        }
        assert!(quantile_from_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_quantile_extremes_and_median() {
        for len in 1..=SORTED.len() {
            let data = &SORTED[..len];
            assert_eq!(quantile_from_sorted(data, 0.0), data[0]);
            assert_eq!(quantile_from_sorted(data, 1.0), data[len - 1]);
            assert!(approx_eq(
                quantile_from_sorted(data, 0.5),
                median_from_sorted(data)
            ));
        }
    }

    #[test]
    fn test_min_index() {
        let mut values = UNSORTED;
        assert_eq!(min_index(&values), 3);

        values[4] = f64::NAN;
        values[6] = f64::NAN;
        assert_eq!(min_index(&values), 4);

        assert_eq!(min_index(&[]), 0);
    }

    #[test]
    fn test_max_index() {
        let mut values = [-0.188, 0.262, 0.648, -0.241, 0.213, 0.721, -0.145, 0.604];
        assert_eq!(max_index(&values), 5);

        values[4] = f64::NAN;
        values[6] = f64::NAN;
        assert_eq!(max_index(&values), 4);

        assert_eq!(max_index(&[]), 0);
    }

    #[test]
    fn test_extremum_ties_pick_first() {
        let values = [2.0, 7.0, 1.0, 7.0, 1.0];
        assert_eq!(max_index(&values), 1);
        assert_eq!(min_index(&values), 2);
    }

    #[test]
    fn test_max_index_with_negative_infinity() {
        let values = [f64::NEG_INFINITY, f64::NEG_INFINITY, -3.0];
        assert_eq!(max_index(&values), 2);
        assert_eq!(max_index(&values[..2]), 0);
    }

    #[test]
    fn test_min_max() {
        let mut values = UNSORTED;
        assert_eq!(min_max(&values), (-0.241, 0.721));

        values[4] = f64::NAN;
        values[6] = f64::NAN;
        let (min, max) = min_max(&values);
        assert!(min.is_nan());
        assert!(max.is_nan());

        let (min, max) = min_max(&[]);
        assert!(min.is_nan());
        assert!(max.is_nan());
    }
}
