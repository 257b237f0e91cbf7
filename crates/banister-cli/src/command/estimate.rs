use std::path::PathBuf;

use anyhow::Context;
use banister_model::{DesignBounds, TrainingData, TrialIndices, estimation};
use banister_training::estimation::{self as driver, Estimate, EstimationConfig};

use crate::{
    report,
    util::{Output, PathPattern},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EstimateArg {
    /// Bounds and mutation stdevs of the model parameters
    bounds_path: PathBuf,
    /// Training data with observed performance
    data_path: PathBuf,
    /// Indices of the performance trials. A path containing '%' is a pattern
    /// expanded with the iteration number
    trials_path: String,
    /// Output file for the best design of each iteration
    output_path: PathBuf,
    /// Number of independent runs of the genetic algorithm
    #[arg(short = 'n', long, default_value_t = 1)]
    num_iterations: usize,
    /// Number of generations per run
    #[arg(short = 'g', long, default_value_t = 100)]
    max_generations: usize,
    /// Number of individuals in each generation
    #[arg(short = 'p', long, default_value_t = 100)]
    population_size: usize,
    /// Number of parents kept when culling
    #[arg(short = 'k', long, default_value_t = 10)]
    cull_keep: usize,
    /// Probability of mutating each design variable
    #[arg(short = 'm', long, default_value_t = 0.1)]
    mutate_probability: f64,
    /// Alpha of the BLX-alpha crossover
    #[arg(short = 'a', long, default_value_t = 0.5)]
    blx_alpha: f64,
    /// Write the integration of each run's best design
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
        short = 'w',
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

impl EstimateArg {
    fn config(&self) -> EstimationConfig {
        EstimationConfig {
            max_generations: self.max_generations,
            population_size: self.population_size,
            cull_keep: self.cull_keep,
            mutate_probability: self.mutate_probability,
            blx_alpha: self.blx_alpha,
        }
    }
}

/// Trial indices for every iteration, loaded once unless the path is a
/// pattern.
fn load_trials(arg: &EstimateArg, data_len: usize) -> anyhow::Result<Vec<TrialIndices>> {
    if !PathPattern::is_pattern(&arg.trials_path) {
        let trials = TrialIndices::load(&arg.trials_path, data_len)?;
        return Ok(vec![trials; arg.num_iterations]);
    }
    let pattern = arg
        .trials_path
        .parse::<PathPattern>()
        .context("Invalid trials path pattern")?;
    (1..=arg.num_iterations)
        .map(|iteration| {
            TrialIndices::load(pattern.render(iteration), data_len).map_err(anyhow::Error::from)
        })
        .collect()
}

pub(crate) fn run(arg: &EstimateArg) -> anyhow::Result<()> {
    log::debug!("Using arguments: {arg:#?}");
    let config = arg.config();
    config.validate()?;

    let data = TrainingData::load(&arg.data_path)?;
    let trials = load_trials(arg, data.len())?;
    let bounds = DesignBounds::load(&arg.bounds_path)?;
    if log::log_enabled!(log::Level::Debug) {
        let mut table = vec![];
        bounds.write_tsv(&mut table)?;
        log::debug!("Using bounds:\n{}", String::from_utf8_lossy(&table));
    }

    let mut best = Vec::with_capacity(arg.num_iterations);
    for (i, trials) in trials.iter().enumerate() {
        let iteration = i + 1;
        log::info!("Iteration {iteration}");
        let seed = u64::try_from(iteration)?;
        let estimate = driver::estimate(&config, &bounds, &data, trials, seed)?;
        write_run_reports(arg, iteration, &estimate, &data, trials)?;
        best.push((estimate.params.to_design(), estimate.mean_abs_residual));
    }

    Output::save(&arg.output_path, |output| {
        report::write_estimates(
            output,
            best.iter().map(|(design, residual)| (&design[..], *residual)),
        )
    })
}

fn write_run_reports(
    arg: &EstimateArg,
    iteration: usize,
    estimate: &Estimate,
    data: &TrainingData,
    trials: &TrialIndices,
) -> anyhow::Result<()> {
    if let Some(pattern) = &arg.output_convergence {
        Output::save(&pattern.render(iteration), |output| {
            report::write_convergence(output, &estimate.convergence)
        })?;
    }
    if let Some(pattern) = &arg.output_population {
        Output::save(&pattern.render(iteration), |output| {
            report::write_estimates(output, estimate.members(trials))
        })?;
    }
    if let Some(pattern) = &arg.output_integration {
        let integrated = data.with_performance(estimation::integrate(&estimate.params, data));
        Output::save(&pattern.render(iteration), |output| {
            integrated.write_tsv(output)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        arg: EstimateArg,
    }

    fn parse(args: &[&str]) -> EstimateArg {
        let argv = ["estimate"].iter().chain(args).copied();
        Cli::try_parse_from(argv).unwrap().arg
    }

    #[test]
    fn test_defaults() {
        let arg = parse(&["b.tsv", "d.tsv", "t.tsv", "out.tsv"]);
        assert_eq!(arg.config(), EstimationConfig::default());
        assert_eq!(arg.num_iterations, 1);
        assert!(arg.output_integration.is_none());
        assert!(arg.output_population.is_none());
        assert!(arg.output_convergence.is_none());
    }

    #[test]
    fn test_optional_output_patterns() {
        let arg = parse(&["-i", "-w=pop%d.tsv", "b.tsv", "d.tsv", "t.tsv", "out.tsv"]);
        assert_eq!(
            arg.output_integration.unwrap().render(2),
            PathBuf::from("integration0002.tsv")
        );
        assert_eq!(
            arg.output_population.unwrap().render(2),
            PathBuf::from("pop2.tsv")
        );
        assert!(arg.output_convergence.is_none());
        assert_eq!(arg.bounds_path, PathBuf::from("b.tsv"));
    }

    #[test]
    fn test_numeric_options() {
        let arg = parse(&[
            "-n", "3", "-g", "20", "-p", "30", "-k", "4", "-m", "0.2", "-a", "0.3", "b", "d", "t",
            "o",
        ]);
        assert_eq!(arg.num_iterations, 3);
        assert_eq!(
            arg.config(),
            EstimationConfig {
                max_generations: 20,
                population_size: 30,
                cull_keep: 4,
                mutate_probability: 0.2,
                blx_alpha: 0.3,
            }
        );
    }

    #[test]
    fn test_rejects_unparsable_number() {
        let argv = ["estimate", "-g", "many", "b", "d", "t", "o"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
