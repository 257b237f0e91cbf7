//! Soft constraints on training plans.
//!
//! A [`Constraint`] turns the model state and the stress applied on a day into
//! an accumulated penalty. The training objective calls
//! [`Constraint::penalty_step`] twice per day: once with the state before the
//! day's update and once with the state after it.
//!
//! | kind                                       | limit on daily stress `w`              |
//! |--------------------------------------------|----------------------------------------|
//! | [`ConstraintKind::MaxStress`]              | `300`                                  |
//! | [`ConstraintKind::FatigueMaxStress`]       | `σmax · (0.1 + 0.9 e^(-h/800))`        |
//! | [`ConstraintKind::FitnessMaxStress`]       | `σmax · (1 - 0.9 e^(-g/150))`          |
//! | [`ConstraintKind::FitnessFatigueMaxStress`]| both of the above                      |
//! | [`ConstraintKind::FitnessFatigueRatio`]    | fatigue/fitness ratio at most `0.8`    |
//!
//! `σmax` is the maximum daily stress, `g` the fitness and `h` the fatigue.

use std::fmt;

use crate::integrator::ModelState;

/// A penalty strategy for the training objective.
pub trait Constraint: fmt::Debug + Send + Sync {
    /// Returns `penalty` increased by this constraint's violation.
    fn penalty_step(
        &self,
        penalty: f64,
        state: &ModelState,
        training_stress: f64,
        max_daily_stress: f64,
    ) -> f64;

    /// Names of the extra integration-report columns.
    fn column_names(&self) -> &'static [&'static str];

    /// Values of the extra integration-report columns for `state`.
    fn column_values(&self, state: &ModelState, max_daily_stress: f64) -> Vec<f64>;
}

pub type BoxedConstraint = Box<dyn Constraint>;

/// Returns how far `value` exceeds `limit`, or zero.
fn excess(value: f64, limit: f64) -> f64 {
    value.max(limit) - limit
}

fn fitness_stress_limit(max_daily_stress: f64, fitness: f64) -> f64 {
    max_daily_stress * (1.0 - 0.9 * (-fitness / 150.0).exp())
}

fn fatigue_stress_limit(max_daily_stress: f64, fatigue: f64) -> f64 {
    max_daily_stress * (0.1 + 0.9 * (-fatigue / 800.0).exp())
}

/// Penalizes daily stress above a fixed ceiling.
#[derive(Debug, Clone, Copy)]
pub struct MaxStress {
    limit: f64,
}

impl MaxStress {
    pub const DEFAULT_LIMIT: f64 = 300.0;
}

impl Default for MaxStress {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl Constraint for MaxStress {
    fn penalty_step(&self, penalty: f64, _state: &ModelState, stress: f64, _max: f64) -> f64 {
        penalty + excess(stress, self.limit)
    }

    fn column_names(&self) -> &'static [&'static str] {
        &["max_stress"]
    }

    fn column_values(&self, _state: &ModelState, _max: f64) -> Vec<f64> {
        vec![self.limit]
    }
}

/// Penalizes stress above a limit that shrinks as fatigue accumulates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FatigueMaxStress;

impl Constraint for FatigueMaxStress {
    fn penalty_step(&self, penalty: f64, state: &ModelState, stress: f64, max: f64) -> f64 {
        penalty + excess(stress, fatigue_stress_limit(max, state.fatigue))
    }

    fn column_names(&self) -> &'static [&'static str] {
        &["fatigue_max_stress"]
    }

    fn column_values(&self, state: &ModelState, max: f64) -> Vec<f64> {
        vec![fatigue_stress_limit(max, state.fatigue)]
    }
}

/// Penalizes stress above a limit that grows with fitness.
#[derive(Debug, Default, Clone, Copy)]
pub struct FitnessMaxStress;

impl Constraint for FitnessMaxStress {
    fn penalty_step(&self, penalty: f64, state: &ModelState, stress: f64, max: f64) -> f64 {
        penalty + excess(stress, fitness_stress_limit(max, state.fitness))
    }

    fn column_names(&self) -> &'static [&'static str] {
        &["fitness_max_stress"]
    }

    fn column_values(&self, state: &ModelState, max: f64) -> Vec<f64> {
        vec![fitness_stress_limit(max, state.fitness)]
    }
}

/// Applies both the fitness and fatigue stress limits.
#[derive(Debug, Default, Clone, Copy)]
pub struct FitnessFatigueMaxStress;

impl Constraint for FitnessFatigueMaxStress {
    fn penalty_step(&self, penalty: f64, state: &ModelState, stress: f64, max: f64) -> f64 {
        let penalty = penalty + excess(stress, fitness_stress_limit(max, state.fitness));
        penalty + excess(stress, fatigue_stress_limit(max, state.fatigue))
    }

    fn column_names(&self) -> &'static [&'static str] {
        &["fitness_max_stress", "fatigue_max_stress"]
    }

    fn column_values(&self, state: &ModelState, max: f64) -> Vec<f64> {
        vec![
            fitness_stress_limit(max, state.fitness),
            fatigue_stress_limit(max, state.fatigue),
        ]
    }
}

/// Penalizes a fatigue/fitness ratio above a fixed ceiling.
#[derive(Debug, Clone, Copy)]
pub struct FitnessFatigueRatio {
    max_ratio: f64,
}

impl FitnessFatigueRatio {
    pub const DEFAULT_MAX_RATIO: f64 = 0.8;
}

impl Default for FitnessFatigueRatio {
    fn default() -> Self {
        Self {
            max_ratio: Self::DEFAULT_MAX_RATIO,
        }
    }
}

impl Constraint for FitnessFatigueRatio {
    fn penalty_step(&self, penalty: f64, state: &ModelState, _stress: f64, _max: f64) -> f64 {
        penalty + excess(state.fatigue / state.fitness, self.max_ratio)
    }

    fn column_names(&self) -> &'static [&'static str] {
        &["max_fatigue_fitness_ratio"]
    }

    fn column_values(&self, _state: &ModelState, _max: f64) -> Vec<f64> {
        vec![self.max_ratio]
    }
}

/// Selects a [`Constraint`] implementation by name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    MaxStress,
    FatigueMaxStress,
    #[default]
    FitnessMaxStress,
    FitnessFatigueMaxStress,
    FitnessFatigueRatio,
}

impl ConstraintKind {
    #[must_use]
    pub fn build(self) -> BoxedConstraint {
        match self {
            ConstraintKind::MaxStress => Box::new(MaxStress::default()),
            ConstraintKind::FatigueMaxStress => Box::new(FatigueMaxStress),
            ConstraintKind::FitnessMaxStress => Box::new(FitnessMaxStress),
            ConstraintKind::FitnessFatigueMaxStress => Box::new(FitnessFatigueMaxStress),
            ConstraintKind::FitnessFatigueRatio => Box::new(FitnessFatigueRatio::default()),
        }
    }
}
