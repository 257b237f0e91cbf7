//! Parameter estimation driver.
//!
//! Searches the box given by [`DesignBounds`] for model parameters that
//! minimize the total absolute residual at the trial points. Each member's
//! auxiliary score is its total residual, NaN for infeasible parameters.

use banister_model::{DesignBounds, ModelParams, TrainingData, TrialIndices, estimation};
use banister_stats::summary::FitnessSummary;

use crate::{
    ConfigError, check_non_negative, check_population,
    design::{self, MutationScale},
    genetic::{Population, PopulationEvolver},
    random::MersenneRng,
};

/// Settings for one estimation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationConfig {
    pub max_generations: usize,
    pub population_size: usize,
    /// Number of parents surviving each generation
    pub cull_keep: usize,
    pub mutate_probability: f64,
    pub blx_alpha: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
            population_size: 100,
            cull_keep: 10,
            mutate_probability: 0.1,
            blx_alpha: 0.5,
        }
    }
}

impl EstimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_population(self.population_size, self.cull_keep, self.max_generations)?;
        check_non_negative("mutate probability", self.mutate_probability)?;
        check_non_negative("BLX-alpha", self.blx_alpha)?;
        Ok(())
    }
}

/// Outcome of one estimation run.
#[derive(Debug, Clone)]
pub struct Estimate {
    /// Best parameters of the final population
    pub params: ModelParams,
    /// Mean absolute residual of [`Self::params`]
    pub mean_abs_residual: f64,
    /// Final population; scores are total residuals
    pub population: Population<f64>,
    /// Fitness summary before selection in each generation
    pub convergence: Vec<FitnessSummary>,
}

impl Estimate {
    /// Returns each member's parameters with its mean absolute residual.
    pub fn members<'a>(
        &'a self,
        trials: &'a TrialIndices,
    ) -> impl Iterator<Item = (&'a [f64], f64)> + 'a {
        self.population
            .individuals()
            .iter()
            .map(move |ind| {
                let residual = estimation::mean_abs_residual(*ind.scores(), trials);
                (ind.design(), residual)
            })
    }
}

/// Fits model parameters to `data` at the given trial points.
///
/// The run is seeded with `seed`; the same inputs and seed always give the
/// same estimate.
pub fn estimate(
    config: &EstimationConfig,
    bounds: &DesignBounds,
    data: &TrainingData,
    trials: &TrialIndices,
    seed: u64,
) -> Result<Estimate, ConfigError> {
    config.validate()?;

    let evaluate = |design: &[f64]| {
        let error = estimation::calculate_error(&ModelParams::from_design(design), data, trials);
        (estimation::error_fitness(error), error)
    };
    let evolver = PopulationEvolver {
        blx_alpha: config.blx_alpha,
        mutation_rate: config.mutate_probability,
        mutation_scale: MutationScale::PerVariable(&bounds.mutation_stdevs),
        value_range: None,
    };

    let mut rng = MersenneRng::new(seed);
    let designs = (0..config.population_size)
        .map(|_| design::random_within(&bounds.lower, &bounds.upper, &mut rng))
        .collect::<Vec<_>>();
    let mut population = Population::from_designs(designs, &f64::NAN);
    population.evaluate(&evaluate);

    let mut convergence = Vec::with_capacity(config.max_generations);
    for generation in 0..config.max_generations {
        let summary = population.fitness_summary();
        log::debug!("Seed {seed}, Generation {}:\t{summary}", generation + 1);
        convergence.push(summary);

        let mut children = evolver.breed(&population, &f64::NAN, &mut rng);
        children.evaluate(&evaluate);
        population = population.cull(children, config.cull_keep);
    }

    let best = population.best();
    let params = ModelParams::from_design(best.design());
    let mean_abs_residual = estimation::mean_abs_residual(*best.scores(), trials);
    Ok(Estimate {
        params,
        mean_abs_residual,
        population,
        convergence,
    })
}
