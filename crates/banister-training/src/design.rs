//! Design vector operations for the genetic algorithm.
//!
//! A design vector is a plain `Vec<f64>`: the nine model parameters when
//! estimating, or one stress value per day when optimizing a training plan.
//! These functions implement the initialization, crossover and mutation steps
//! used by [`PopulationEvolver`](crate::genetic::PopulationEvolver).
//!
//! Every random draw goes through [`MersenneRng`] in a fixed order, so the
//! same seed always produces the same vectors.

use crate::random::MersenneRng;

/// Inclusive value range that designs are clamped into.
///
/// Clamping uses `max` then `min`, so a NaN component becomes `lower`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub lower: f64,
    pub upper: f64,
}

impl ValueRange {
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }
}

/// Standard deviation of the Gaussian mutation noise.
#[derive(Debug, Clone, Copy)]
pub enum MutationScale<'a> {
    /// One deviation per design variable.
    PerVariable(&'a [f64]),
    /// The same deviation for every component.
    Uniform(f64),
}

impl MutationScale<'_> {
    #[must_use]
    pub fn stdev(&self, index: usize) -> f64 {
        match self {
            MutationScale::PerVariable(stdevs) => stdevs[index],
            MutationScale::Uniform(stdev) => *stdev,
        }
    }
}

/// Creates a design vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use banister_training::design;
///
/// let ramp = design::from_fn(|i| i as f64 * 0.5, 4);
/// assert_eq!(ramp, vec![0.0, 0.5, 1.0, 1.5]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Draws each component uniformly between its lower and upper bound.
///
/// # Panics
///
/// Panics if the bound slices differ in length.
pub fn random_within(lower: &[f64], upper: &[f64], rng: &mut MersenneRng) -> Vec<f64> {
    assert_eq!(lower.len(), upper.len());
    from_fn(
        |i| lower[i] + rng.next_uniform() * (upper[i] - lower[i]),
        lower.len(),
    )
}

/// Draws `len` components uniformly in `[0, max)`.
pub fn random_scaled(max: f64, len: usize, rng: &mut MersenneRng) -> Vec<f64> {
    from_fn(|_| rng.next_uniform() * max, len)
}

/// Performs BLX-α crossover between two parents, producing two children.
///
/// For each component, with `lo`/`hi` the smaller/larger parent value and
/// `d = hi - lo`, both children are sampled uniformly from
/// `[lo - α·d, hi + α·d]`, first child first. If `range` is given, each
/// sample is clamped into it.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha(
    p1: &[f64],
    p2: &[f64],
    alpha: f64,
    range: Option<ValueRange>,
    rng: &mut MersenneRng,
) -> (Vec<f64>, Vec<f64>) {
    assert_eq!(p1.len(), p2.len());
    let mut c1 = Vec::with_capacity(p1.len());
    let mut c2 = Vec::with_capacity(p1.len());
    for (&x1, &x2) in p1.iter().zip(p2) {
        let min = if x1 <= x2 { x1 } else { x2 };
        let max = if x1 > x2 { x1 } else { x2 };
        let d = max - min;
        let a = min - d * alpha;
        let b = max + d * alpha;
        let mut sample = || {
            let value = a + (b - a) * rng.next_uniform();
            range.map_or(value, |r| r.clamp(value))
        };
        c1.push(sample());
        c2.push(sample());
    }
    (c1, c2)
}

/// Applies Gaussian mutation to a design vector in place.
///
/// Each component is perturbed with probability `rate` by
/// `stdev · N(0, 1)`, then clamped into `range` if one is given.
pub fn mutate(
    design: &mut [f64],
    rate: f64,
    scale: MutationScale<'_>,
    range: Option<ValueRange>,
    rng: &mut MersenneRng,
) {
    for (i, x) in design.iter_mut().enumerate() {
        if rng.next_uniform() < rate {
            *x += scale.stdev(i) * rng.next_gaussian();
            if let Some(range) = range {
                *x = range.clamp(*x);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_within_bounds() {
        let mut rng = MersenneRng::new(1);
        let lower = [0.0, -5.0, 2.0, 3.0];
        let upper = [1.0, 5.0, 2.0, 30.0];
        for _ in 0..100 {
            let design = random_within(&lower, &upper, &mut rng);
            assert_eq!(design[2], 2.0);
            for ((x, lo), hi) in design.iter().zip(&lower).zip(&upper) {
                assert!(lo <= x && x <= hi);
            }
        }
    }

    #[test]
    fn test_random_scaled() {
        let mut rng = MersenneRng::new(2);
        let design = random_scaled(300.0, 84, &mut rng);
        assert_eq!(design.len(), 84);
        assert!(design.iter().all(|x| (0.0..300.0).contains(x)));
    }

    #[test]
    fn test_blx_alpha_within_expanded_range() {
        let mut rng = MersenneRng::new(3);
        let p1 = [0.0, 10.0, 5.0];
        let p2 = [4.0, 6.0, 5.0];
        for _ in 0..200 {
            let (c1, c2) = blx_alpha(&p1, &p2, 0.5, None, &mut rng);
            for c in [&c1, &c2] {
                assert!((-2.0..=6.0).contains(&c[0]));
                assert!((4.0..=12.0).contains(&c[1]));
                assert_eq!(c[2], 5.0);
            }
        }
    }

    #[test]
    fn test_blx_alpha_draw_order() {
        let p1 = [0.0, 0.0];
        let p2 = [1.0, 1.0];
        let (c1, c2) = blx_alpha(&p1, &p2, 0.0, None, &mut MersenneRng::new(9));

        let mut rng = MersenneRng::new(9);
        let draws = (0..4).map(|_| rng.next_uniform()).collect::<Vec<_>>();
        assert_eq!(c1, [draws[0], draws[2]]);
        assert_eq!(c2, [draws[1], draws[3]]);
    }

    #[test]
    fn test_blx_alpha_clamps() {
        let mut rng = MersenneRng::new(4);
        let range = ValueRange::new(0.0, 10.0);
        for _ in 0..200 {
            let (c1, c2) = blx_alpha(&[0.0], &[10.0], 1.0, Some(range), &mut rng);
            assert!((0.0..=10.0).contains(&c1[0]));
            assert!((0.0..=10.0).contains(&c2[0]));
        }
    }

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let mut rng = MersenneRng::new(5);
        let mut design = vec![1.0, 2.0, 3.0];
        mutate(&mut design, 0.0, MutationScale::Uniform(100.0), None, &mut rng);
        assert_eq!(design, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mutate_zero_stdev_keeps_value() {
        let mut rng = MersenneRng::new(6);
        let mut design = vec![1.0, 2.0];
        let stdevs = [0.0, 0.0];
        mutate(&mut design, 1.0, MutationScale::PerVariable(&stdevs), None, &mut rng);
        assert_eq!(design, [1.0, 2.0]);
    }

    #[test]
    fn test_mutate_clamps() {
        let mut rng = MersenneRng::new(7);
        let range = ValueRange::new(0.0, 1.0);
        let mut design = vec![0.5; 50];
        mutate(&mut design, 1.0, MutationScale::Uniform(10.0), Some(range), &mut rng);
        assert!(design.iter().all(|x| (0.0..=1.0).contains(x)));
        assert!(design.iter().any(|&x| x == 0.0 || x == 1.0));
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(ValueRange::new(0.0, 300.0).clamp(f64::NAN), 0.0);
    }
}
