//! Genetic algorithm over real-valued design vectors.
//!
//! Both optimizers share the same generation cycle:
//!
//! 1. **Select** - `n` tournament winners of size two
//! 2. **Crossover (BLX-α)** - winners are paired in order and each pair
//!    produces two children
//! 3. **Mutate** - Gaussian noise on each child component with a given
//!    probability
//! 4. **Evaluate** - children are scored in parallel
//! 5. **Cull** - the best `num_keep` parents survive alongside the best
//!    `n - num_keep` children
//!
//! # Key Components
//!
//! - [`Individual`] - a design vector with its fitness and auxiliary scores
//! - [`Population`] - a fixed-size collection of individuals
//! - [`PopulationEvolver`] - selection, crossover and mutation settings for
//!   one generation
//!
//! # Parallelization
//!
//! Evaluation splits the population into one contiguous chunk per available
//! core and scores the chunks on scoped threads. The random generator is never
//! used during evaluation, so results do not depend on the thread count.
//!
//! # Fitness Conventions
//!
//! Larger fitness is better. Freshly bred individuals carry a NaN fitness until
//! evaluated; evaluation functions map numerical failures to negative infinity
//! so that NaN never takes part in ranking.

use std::{num::NonZeroUsize, thread};

use banister_stats::{order, summary::FitnessSummary};

use crate::{
    design::{self, MutationScale, ValueRange},
    random::MersenneRng,
};

/// A candidate design vector with its fitness and auxiliary scores.
#[derive(Debug, Clone)]
pub struct Individual<S> {
    design: Vec<f64>,
    fitness: f64,
    scores: S,
}

impl<S> Individual<S> {
    /// Creates an unevaluated individual.
    #[must_use]
    pub fn new(design: Vec<f64>, scores: S) -> Self {
        Self {
            design,
            fitness: f64::NAN,
            scores,
        }
    }

    #[must_use]
    pub fn design(&self) -> &[f64] {
        &self.design
    }

    /// Returns the fitness, or NaN if the individual has not been evaluated.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn scores(&self) -> &S {
        &self.scores
    }
}

/// A fixed-size population of individuals.
#[derive(Debug, Clone)]
pub struct Population<S> {
    individuals: Vec<Individual<S>>,
}

impl<S> Population<S> {
    /// Creates an unevaluated population, every member starting with a copy
    /// of `scores`.
    ///
    /// # Panics
    ///
    /// Panics if `designs` is empty.
    #[must_use]
    pub fn from_designs<I>(designs: I, scores: &S) -> Self
    where
        I: IntoIterator<Item = Vec<f64>>,
        S: Clone,
    {
        let individuals = designs
            .into_iter()
            .map(|design| Individual::new(design, scores.clone()))
            .collect::<Vec<_>>();
        assert!(!individuals.is_empty(), "population must not be empty");
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual<S>] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[must_use]
    pub fn fitnesses(&self) -> Vec<f64> {
        self.individuals.iter().map(|ind| ind.fitness).collect()
    }

    /// Returns the individual with the largest fitness, the first one on ties.
    #[must_use]
    pub fn best(&self) -> &Individual<S> {
        &self.individuals[order::max_index(&self.fitnesses())]
    }

    #[must_use]
    pub fn fitness_summary(&self) -> FitnessSummary {
        FitnessSummary::new(&self.fitnesses())
    }

    /// Evaluates every individual in parallel.
    ///
    /// `evaluate` maps a design to its fitness and scores.
    pub fn evaluate<F>(&mut self, evaluate: F)
    where
        S: Send,
        F: Fn(&[f64]) -> (f64, S) + Sync,
    {
        for_each_parallel(&mut self.individuals, |ind| {
            let (fitness, scores) = evaluate(&ind.design);
            ind.fitness = fitness;
            ind.scores = scores;
        });
    }

    /// Recomputes every fitness from the stored scores in parallel.
    ///
    /// `reevaluate` may update the scores in place and returns the new
    /// fitness.
    pub fn reevaluate<F>(&mut self, reevaluate: F)
    where
        S: Send,
        F: Fn(&[f64], &mut S) -> f64 + Sync,
    {
        for_each_parallel(&mut self.individuals, |ind| {
            ind.fitness = reevaluate(&ind.design, &mut ind.scores);
        });
    }

    /// Runs `len()` binary tournaments, returning the winners' indices.
    ///
    /// Each tournament draws two members with replacement; the first wins
    /// ties.
    #[must_use]
    pub fn tournament_select(&self, rng: &mut MersenneRng) -> Vec<usize> {
        let n = self.len();
        (0..n)
            .map(|_| {
                let first = rng.next_index(n);
                let second = rng.next_index(n);
                if self.individuals[first].fitness >= self.individuals[second].fitness {
                    first
                } else {
                    second
                }
            })
            .collect()
    }

    /// Merges parents and evaluated children into the next generation.
    ///
    /// The `num_keep` fittest parents come first, in their original order,
    /// followed by the fittest `len() - num_keep` children in ascending
    /// fitness order. Scores travel with their designs.
    ///
    /// # Panics
    ///
    /// Panics if the populations differ in size or `num_keep` exceeds it.
    #[must_use]
    pub fn cull(self, children: Self, num_keep: usize) -> Self {
        let n = self.len();
        assert_eq!(children.len(), n, "children must match the population size");
        assert!(num_keep <= n, "cannot keep more parents than exist");

        let mut kept = order::sort_index(&self.fitnesses()).split_off(n - num_keep);
        kept.sort_unstable();
        let child_order = order::sort_index(&children.fitnesses());

        let mut parents = self.individuals.into_iter().map(Some).collect::<Vec<_>>();
        let mut children = children
            .individuals
            .into_iter()
            .map(Some)
            .collect::<Vec<_>>();
        let individuals = kept
            .into_iter()
            .filter_map(|i| parents[i].take())
            .chain(
                child_order[num_keep..]
                    .iter()
                    .filter_map(|&i| children[i].take()),
            )
            .collect();
        Self { individuals }
    }
}

/// Variation settings for one generation.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver<'a> {
    /// BLX-α range expansion factor
    pub blx_alpha: f64,
    /// Probability of mutating each component
    pub mutation_rate: f64,
    /// Standard deviation of the mutation noise
    pub mutation_scale: MutationScale<'a>,
    /// Range that children are clamped into, if any
    pub value_range: Option<ValueRange>,
}

impl PopulationEvolver<'_> {
    /// Breeds an unevaluated child population of the same size.
    ///
    /// Winners `0 & 1`, `2 & 3`, ... are crossed over; with an odd population
    /// the last child is a copy of the last winner. All crossovers happen
    /// before any mutation.
    #[must_use]
    pub fn breed<S>(
        &self,
        population: &Population<S>,
        unevaluated: &S,
        rng: &mut MersenneRng,
    ) -> Population<S>
    where
        S: Clone,
    {
        let winners = population.tournament_select(rng);
        let parent = |i: usize| population.individuals[i].design();

        let mut designs = Vec::with_capacity(winners.len());
        for pair in winners.chunks(2) {
            match *pair {
                [a, b] => {
                    let (c1, c2) = design::blx_alpha(
                        parent(a),
                        parent(b),
                        self.blx_alpha,
                        self.value_range,
                        rng,
                    );
                    designs.push(c1);
                    designs.push(c2);
                }
                [a] => designs.push(parent(a).to_vec()),
                _ => unreachable!(),
            }
        }
        for child in &mut designs {
            design::mutate(
                child,
                self.mutation_rate,
                self.mutation_scale,
                self.value_range,
                rng,
            );
        }
        Population::from_designs(designs, unevaluated)
    }
}

/// Applies `f` to every item, splitting the slice into one contiguous chunk per
/// worker thread.
fn for_each_parallel<T, F>(items: &mut [T], f: F)
where
    T: Send,
    F: Fn(&mut T) + Sync,
{
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(items.len());
    if workers <= 1 {
        items.iter_mut().for_each(f);
        return;
    }
    let chunk_len = items.len().div_ceil(workers);
    thread::scope(|s| {
        for chunk in items.chunks_mut(chunk_len) {
            let f = &f;
            s.spawn(move || chunk.iter_mut().for_each(f));
        }
    });
}
