//! Genetic optimizers for the Banister model.
//!
//! Two drivers share one genetic algorithm engine:
//!
//! - [`estimation`] fits the nine model parameters to observed performance by
//!   minimizing absolute residuals at trial points
//! - [`optimization`] searches for a daily training plan that maximizes final
//!   performance under soft constraints, annealing a roughness penalty over
//!   the run
//!
//! # Architecture
//!
//! ```text
//! MersenneRng (seeded per run)
//!     ↓ drives
//! PopulationEvolver (selection, BLX-α crossover, Gaussian mutation)
//!     ↓ breeds
//! Population (designs + fitness + scores)
//!     ↓ scored in parallel by
//! banister-model objectives
//!     ↓ culled into
//! Next generation
//! ```
//!
//! Each run is fully determined by its configuration and seed: the generator
//! is only used on the driver thread and evaluation does not depend on the
//! number of worker threads.
//!
//! # Modules
//!
//! - [`random`] - MT19937 generator with uniform, bounded and Gaussian draws
//! - [`design`] - initialization, crossover and mutation of design vectors
//! - [`genetic`] - individuals, populations, tournament selection and culling

pub mod design;
pub mod estimation;
pub mod genetic;
pub mod optimization;
pub mod random;

/// Invalid optimizer settings.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("cannot keep {keep} parents out of a population of {size}")]
    CullKeepTooLarge { keep: usize, size: usize },
    #[display("at least one generation is required")]
    NoGenerations,
    #[display("{name} must be finite and non-negative, got {value}")]
    InvalidValue { name: &'static str, value: f64 },
}

fn check_population(size: usize, keep: usize, generations: usize) -> Result<(), ConfigError> {
    if size < 2 {
        return Err(ConfigError::PopulationTooSmall { size });
    }
    if keep > size {
        return Err(ConfigError::CullKeepTooLarge { keep, size });
    }
    if generations == 0 {
        return Err(ConfigError::NoGenerations);
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}
