//! Training plan optimization driver.
//!
//! Searches for daily training stresses in `[0, max_daily_stress]` that
//! maximize the penalized objective of a [`TrainingObjective`]. Over the run
//! the penalty factor grows while the crossover spread and the mutation
//! strength shrink. A roughness penalty is switched on in the middle third
//! of the run with a window that narrows as the run goes on.

use banister_model::objective::{PenaltyWeights, TrainingObjective, TrainingScores};
use banister_stats::summary::FitnessSummary;

use crate::{
    ConfigError, check_non_negative, check_population,
    design::{self, MutationScale, ValueRange},
    genetic::{Population, PopulationEvolver},
    random::MersenneRng,
};

/// Widest roughness window, in days.
pub const MAX_ROUGHNESS_DAYS: usize = 14;

/// Settings for one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationConfig {
    /// Length of the plan in days
    pub num_days: usize,
    pub init_penalty_factor: f64,
    pub penalty_factor_rate: f64,
    /// Roughness factor applied while the roughness window is active
    pub max_roughness_factor: f64,
    pub max_generations: usize,
    pub population_size: usize,
    /// Number of parents surviving each generation
    pub cull_keep: usize,
    pub init_blx_alpha: f64,
    pub blx_alpha_change_rate: f64,
    pub init_mutate_stdev: f64,
    pub init_mutate_probability: f64,
    /// Decay of both the mutation stdev and probability
    pub mutate_change_rate: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            num_days: 84,
            init_penalty_factor: 6e-7,
            penalty_factor_rate: 1.02,
            max_roughness_factor: 0.0,
            max_generations: 2000,
            population_size: 500,
            cull_keep: 50,
            init_blx_alpha: 0.5,
            blx_alpha_change_rate: 0.9999,
            init_mutate_stdev: 10.0,
            init_mutate_probability: 0.1,
            mutate_change_rate: 0.999,
        }
    }
}

impl OptimizationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_population(self.population_size, self.cull_keep, self.max_generations)?;
        for (name, value) in [
            ("initial penalty factor", self.init_penalty_factor),
            ("penalty factor rate", self.penalty_factor_rate),
            ("maximum roughness factor", self.max_roughness_factor),
            ("initial BLX-alpha", self.init_blx_alpha),
            ("BLX-alpha change rate", self.blx_alpha_change_rate),
            ("initial mutate stdev", self.init_mutate_stdev),
            ("initial mutate probability", self.init_mutate_probability),
            ("mutate change rate", self.mutate_change_rate),
        ] {
            check_non_negative(name, value)?;
        }
        Ok(())
    }
}

/// Generations during which the roughness penalty is active.
///
/// The window is open strictly between `G / 5` and `2G / 3` and its length
/// shrinks linearly from [`MAX_ROUGHNESS_DAYS`] towards one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnealingSchedule {
    min_generation: usize,
    max_generation: usize,
}

impl AnnealingSchedule {
    #[must_use]
    pub fn new(max_generations: usize) -> Self {
        Self {
            min_generation: max_generations / 5,
            max_generation: max_generations * 2 / 3,
        }
    }

    /// Returns the roughness window for a 0-based generation, or `None` when
    /// the roughness penalty is off.
    ///
    /// # Examples
    ///
    /// ```
    /// use banister_training::optimization::AnnealingSchedule;
    ///
    /// let schedule = AnnealingSchedule::new(30);
    /// assert_eq!(schedule.roughness_days(6), None);
    /// assert_eq!(schedule.roughness_days(7), Some(13));
    /// assert_eq!(schedule.roughness_days(19), Some(1));
    /// assert_eq!(schedule.roughness_days(20), None);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn roughness_days(&self, generation: usize) -> Option<usize> {
        if generation <= self.min_generation || generation >= self.max_generation {
            return None;
        }
        let remaining = (self.max_generation - generation) as f64;
        let span = (self.max_generation - self.min_generation) as f64;
        let days = (MAX_ROUGHNESS_DAYS as f64 * remaining / span).round() as usize;
        Some(days.max(1))
    }
}

/// Outcome of one optimization run.
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    /// Daily stresses of the best plan
    pub stresses: Vec<f64>,
    pub scores: TrainingScores,
    pub fitness: f64,
    /// Final population with its scores under the last weights
    pub population: Population<TrainingScores>,
    /// Fitness summary before selection in each generation
    pub convergence: Vec<FitnessSummary>,
}

/// Searches for the best training plan for `objective`.
///
/// The run is seeded with `seed`; the same inputs and seed always give the
/// same plan.
pub fn optimize(
    config: &OptimizationConfig,
    objective: &TrainingObjective,
    seed: u64,
) -> Result<OptimizedPlan, ConfigError> {
    config.validate()?;
    let max_daily_stress = objective.max_daily_stress();
    check_non_negative("maximum daily stress", max_daily_stress)?;

    let schedule = AnnealingSchedule::new(config.max_generations);
    let range = ValueRange::new(0.0, max_daily_stress);
    let mut weights = PenaltyWeights {
        penalty_factor: config.init_penalty_factor,
        roughness_factor: 0.0,
        roughness_days: MAX_ROUGHNESS_DAYS,
    };
    let mut blx_alpha = config.init_blx_alpha;
    let mut mutate_stdev = config.init_mutate_stdev;
    let mut mutate_probability = config.init_mutate_probability;

    let mut rng = MersenneRng::new(seed);
    let designs = (0..config.population_size)
        .map(|_| design::random_scaled(max_daily_stress, config.num_days, &mut rng))
        .collect::<Vec<_>>();
    let mut population = Population::from_designs(designs, &TrainingScores::UNEVALUATED);
    population.evaluate(|plan| objective.evaluate(plan, &weights));

    let mut convergence = Vec::with_capacity(config.max_generations);
    for generation in 0..config.max_generations {
        match schedule.roughness_days(generation) {
            Some(days) => {
                weights.roughness_factor = config.max_roughness_factor;
                weights.roughness_days = days;
            }
            None => weights.roughness_factor = 0.0,
        }
        population.reevaluate(|plan, scores| objective.reweigh(plan, scores, &weights));

        let summary = population.fitness_summary();
        log::debug!("Seed {seed}, Generation {}:\t{summary}", generation + 1);
        convergence.push(summary);

        let evolver = PopulationEvolver {
            blx_alpha,
            mutation_rate: mutate_probability,
            mutation_scale: MutationScale::Uniform(mutate_stdev),
            value_range: Some(range),
        };
        let mut children = evolver.breed(&population, &TrainingScores::UNEVALUATED, &mut rng);
        children.evaluate(|plan| objective.evaluate(plan, &weights));
        population = population.cull(children, config.cull_keep);

        weights.penalty_factor *= config.penalty_factor_rate;
        blx_alpha *= config.blx_alpha_change_rate;
        mutate_stdev *= config.mutate_change_rate;
        mutate_probability *= config.mutate_change_rate;
    }

    let best = population.best();
    Ok(OptimizedPlan {
        stresses: best.design().to_vec(),
        scores: *best.scores(),
        fitness: best.fitness(),
        population,
        convergence,
    })
}
