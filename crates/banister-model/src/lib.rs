//! The Banister fitness-fatigue model and the objectives built on it.
//!
//! - [`params`]: the nine model parameters and the parameters file
//! - [`bounds`], [`data`], [`trials`]: input files for parameter estimation
//! - [`integrator`]: explicit Euler integration of fitness and fatigue
//! - [`estimation`]: residual error against observed performance
//! - [`constraint`], [`objective`]: penalized objective for training plans
//!
//! All input files are tab-separated with a header line; see [`io`] for the
//! shared error types.

pub use self::{
    bounds::DesignBounds,
    data::TrainingData,
    io::{LoadError, ParseError},
    params::{DESIGN_VAR_COUNT, DesignVar, ModelParams},
    trials::{TrialError, TrialIndices},
};

pub mod bounds;
pub mod constraint;
pub mod data;
pub mod estimation;
pub mod integrator;
pub mod io;
pub mod objective;
pub mod params;
pub mod trials;
