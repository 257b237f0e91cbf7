use std::path::PathBuf;

use banister_model::{ModelParams, constraint::ConstraintKind, objective::TrainingObjective};
use banister_training::optimization::{self as driver, OptimizationConfig, OptimizedPlan};

use crate::{
    report,
    util::{Output, PathPattern},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ConstraintArg {
    /// Daily stress above 300
    MaxStress,
    /// Daily stress above a limit that falls as fatigue grows
    FatigueMaxStress,
    /// Daily stress above a limit that rises with fitness
    #[default]
    FitnessMaxStress,
    /// Both the fitness and the fatigue stress limits
    FitnessFatigueMaxStress,
    /// Fatigue to fitness ratio above 0.8
    FitnessFatigueRatio,
}

impl From<ConstraintArg> for ConstraintKind {
    fn from(arg: ConstraintArg) -> Self {
        match arg {
            ConstraintArg::MaxStress => ConstraintKind::MaxStress,
            ConstraintArg::FatigueMaxStress => ConstraintKind::FatigueMaxStress,
            ConstraintArg::FitnessMaxStress => ConstraintKind::FitnessMaxStress,
            ConstraintArg::FitnessFatigueMaxStress => ConstraintKind::FitnessFatigueMaxStress,
            ConstraintArg::FitnessFatigueRatio => ConstraintKind::FitnessFatigueRatio,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    /// Model parameters of the athlete
    params_path: PathBuf,
    /// Output file for the best plan of each iteration
    output_path: PathBuf,
    /// Length of the training plan in days
    #[arg(short = 'f', long, default_value_t = 84)]
    num_days: usize,
    /// Upper bound of the daily training stress
    #[arg(short = 'y', long, default_value_t = 300.0)]
    max_daily_stress: f64,
    /// Penalty factor of the first generation
    #[arg(short = 'r', long, default_value_t = 6e-7)]
    init_penalty_factor: f64,
    /// Factor applied to the penalty factor after each generation
    #[arg(short = 't', long, default_value_t = 1.02)]
    penalty_factor_rate: f64,
    /// Roughness factor while the roughness penalty is active
    #[arg(short = 'o', long, default_value_t = 0.0)]
    max_roughness_factor: f64,
    /// Number of independent runs of the genetic algorithm
    #[arg(short = 'n', long, default_value_t = 1)]
    num_iterations: usize,
    /// Number of generations per run
    #[arg(short = 'g', long, default_value_t = 2000)]
    max_generations: usize,
    /// Number of individuals in each generation
    #[arg(short = 'z', long, default_value_t = 500)]
    population_size: usize,
    /// Number of parents kept when culling [default: population size / 10]
    #[arg(short = 'k', long)]
    cull_keep: Option<usize>,
    /// Alpha of the BLX-alpha crossover in the first generation
    #[arg(short = 'a', long, default_value_t = 0.5)]
    init_blx_alpha: f64,
    /// Factor applied to BLX-alpha after each generation
    #[arg(short = 's', long, default_value_t = 0.9999)]
    blx_alpha_change_rate: f64,
    /// Mutation stdev in the first generation
    #[arg(short = 'm', long, default_value_t = 10.0)]
    init_mutate_stdev: f64,
    /// Probability of mutating each day in the first generation
    #[arg(short = 'l', long, default_value_t = 0.1)]
    init_mutate_probability: f64,
    /// Factor applied to the mutation stdev and probability after each
    /// generation
    #[arg(short = 'w', long, default_value_t = 0.999)]
    mutate_change_rate: f64,
    /// Constraint penalizing unsafe plans
    #[arg(long, value_enum, default_value_t)]
    constraint: ConstraintArg,
    /// Write the integration of each run's best plan
    #[arg(
        short = 'i',
        long,
        value_name = "PATTERN",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "integration%04zd.tsv"
    )]
    output_integration: Option<PathPattern>,
    /// Write the final population of each run
    #[arg(
        short = 'p',
        long,
        value_name = "PATTERN",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "population%04zd.tsv"
    )]
    output_population: Option<PathPattern>,
    /// Write the fitness quartiles of each generation
    #[arg(
        short = 'c',
        long,
        value_name = "PATTERN",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "convergence%04zd.tsv"
    )]
    output_convergence: Option<PathPattern>,
}

impl OptimizeArg {
    fn config(&self) -> OptimizationConfig {
        OptimizationConfig {
            num_days: self.num_days,
            init_penalty_factor: self.init_penalty_factor,
            penalty_factor_rate: self.penalty_factor_rate,
            max_roughness_factor: self.max_roughness_factor,
            max_generations: self.max_generations,
            population_size: self.population_size,
            cull_keep: self.cull_keep.unwrap_or(self.population_size / 10),
            init_blx_alpha: self.init_blx_alpha,
            blx_alpha_change_rate: self.blx_alpha_change_rate,
            init_mutate_stdev: self.init_mutate_stdev,
            init_mutate_probability: self.init_mutate_probability,
            mutate_change_rate: self.mutate_change_rate,
        }
    }
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    log::debug!("Using arguments: {arg:#?}");
    let config = arg.config();
    config.validate()?;

    let params = ModelParams::load(&arg.params_path)?;
    if log::log_enabled!(log::Level::Debug) {
        let mut table = vec![];
        params.write_tsv(&mut table)?;
        log::debug!("Using parameters:\n{}", String::from_utf8_lossy(&table));
    }
    let constraint = ConstraintKind::from(arg.constraint).build();
    let objective = TrainingObjective::new(params, arg.max_daily_stress, constraint);

    let mut best = Vec::with_capacity(arg.num_iterations);
    for iteration in 1..=arg.num_iterations {
        log::info!("Iteration {iteration}");
        let seed = u64::try_from(iteration)?;
        let plan = driver::optimize(&config, &objective, seed)?;
        write_run_reports(arg, iteration, &plan, &objective)?;
        best.push(plan);
    }

    Output::save(&arg.output_path, |output| {
        report::write_plans(
            output,
            arg.num_days,
            best.iter()
                .map(|plan| (&plan.stresses[..], &plan.scores, plan.fitness)),
        )
    })
}

fn write_run_reports(
    arg: &OptimizeArg,
    iteration: usize,
    plan: &OptimizedPlan,
    objective: &TrainingObjective,
) -> anyhow::Result<()> {
    if let Some(pattern) = &arg.output_convergence {
        Output::save(&pattern.render(iteration), |output| {
            report::write_convergence(output, &plan.convergence)
        })?;
    }
    if let Some(pattern) = &arg.output_population {
        let members = plan
            .population
            .individuals()
            .iter()
            .map(|ind| (ind.design(), ind.scores(), ind.fitness()));
        Output::save(&pattern.render(iteration), |output| {
            report::write_plans(output, arg.num_days, members)
        })?;
    }
    if let Some(pattern) = &arg.output_integration {
        Output::save(&pattern.render(iteration), |output| {
            objective.write_integration(output, &plan.stresses)
        })?;
    }
    Ok(())
}
