//! Penalized objective for optimizing a daily training plan.
//!
//! A plan is a vector of daily training stresses. Its fitness is
//!
//! ```text
//! fitness = final_performance - penalty_factor * penalty - roughness_factor * roughness
//! ```
//!
//! where `final_performance` is the modelled performance after the last day,
//! `penalty` is accumulated by a [`Constraint`](crate::constraint::Constraint)
//! and `roughness` measures day-to-day variation over a sliding window. A plan
//! whose scores are not finite gets the worst possible scores instead.

use std::io;

use crate::{
    constraint::BoxedConstraint,
    integrator::{DAY_LENGTH, ModelState},
    io::{real, tsv_writer},
    params::ModelParams,
};

/// Factors applied to the penalty and roughness terms in one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyWeights {
    pub penalty_factor: f64,
    pub roughness_factor: f64,
    pub roughness_days: usize,
}

/// Raw terms of the objective for one plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingScores {
    pub final_performance: f64,
    pub penalty: f64,
    pub roughness: f64,
}

impl TrainingScores {
    /// Scores assigned to plans with numerical problems.
    pub const WORST: Self = Self {
        final_performance: f64::NEG_INFINITY,
        penalty: f64::INFINITY,
        roughness: f64::INFINITY,
    };

    /// Scores of a plan that has not been evaluated yet.
    pub const UNEVALUATED: Self = Self {
        final_performance: f64::NAN,
        penalty: f64::NAN,
        roughness: f64::NAN,
    };

    /// Combines the scores into a fitness, replacing them with
    /// [`Self::WORST`] if any term is not finite.
    fn settle(&mut self, weights: &PenaltyWeights) -> f64 {
        let fitness = self.final_performance
            - weights.penalty_factor * self.penalty
            - weights.roughness_factor * self.roughness;
        let finite = fitness.is_finite()
            && self.final_performance.is_finite()
            && self.penalty.is_finite()
            && self.roughness.is_finite();
        if finite {
            fitness
        } else {
            *self = Self::WORST;
            f64::NEG_INFINITY
        }
    }
}

/// Sums day-to-day stress changes over a sliding window.
///
/// For every day `d >= roughness_days` the path length of the stresses in
/// `d - roughness_days ..= d` is added. A window of zero days gives zero.
///
/// # Examples
///
/// ```
/// use banister_model::objective::roughness;
///
/// let plan = [0.0, 10.0, 0.0, 10.0];
/// assert_eq!(roughness(&plan, 1), 30.0);
/// assert_eq!(roughness(&plan, 2), 40.0);
/// assert_eq!(roughness(&plan, 0), 0.0);
/// ```
#[must_use]
pub fn roughness(stresses: &[f64], roughness_days: usize) -> f64 {
    let mut roughness = 0.0;
    for day in roughness_days..stresses.len() {
        for old_day in day - roughness_days..day {
            roughness += (stresses[old_day] - stresses[old_day + 1]).abs();
        }
    }
    roughness
}

/// Evaluates training plans for a fixed athlete.
#[derive(Debug)]
pub struct TrainingObjective {
    params: ModelParams,
    max_daily_stress: f64,
    constraint: BoxedConstraint,
}

impl TrainingObjective {
    #[must_use]
    pub fn new(params: ModelParams, max_daily_stress: f64, constraint: BoxedConstraint) -> Self {
        Self {
            params,
            max_daily_stress,
            constraint,
        }
    }

    #[must_use]
    pub fn max_daily_stress(&self) -> f64 {
        self.max_daily_stress
    }

    fn advance_day(&self, state: &mut ModelState, penalty: &mut f64, stress: f64) {
        let max = self.max_daily_stress;
        *penalty = self.constraint.penalty_step(*penalty, state, stress, max);
        state.step(&self.params, stress, DAY_LENGTH);
        *penalty = self.constraint.penalty_step(*penalty, state, stress, max);
    }

    /// Integrates the plan day by day, returning the performance after the
    /// last day and the accumulated penalty.
    #[must_use]
    pub fn final_performance_and_penalty(&self, stresses: &[f64]) -> (f64, f64) {
        let mut state = ModelState::initial(&self.params);
        let mut penalty = 0.0;
        for &stress in stresses {
            self.advance_day(&mut state, &mut penalty, stress);
        }
        (state.performance, penalty)
    }

    /// Fully evaluates a plan, returning its fitness and scores.
    #[must_use]
    pub fn evaluate(&self, stresses: &[f64], weights: &PenaltyWeights) -> (f64, TrainingScores) {
        let roughness = if weights.roughness_factor > 0.0 {
            roughness(stresses, weights.roughness_days)
        } else {
            0.0
        };
        let (final_performance, penalty) = self.final_performance_and_penalty(stresses);
        let mut scores = TrainingScores {
            final_performance,
            penalty,
            roughness,
        };
        let fitness = scores.settle(weights);
        (fitness, scores)
    }

    /// Recomputes the fitness of an evaluated plan under new weights without
    /// integrating the model again.
    ///
    /// Roughness is recomputed when its factor is positive since the window
    /// may have changed; otherwise the stored value is kept.
    #[must_use]
    pub fn reweigh(
        &self,
        stresses: &[f64],
        scores: &mut TrainingScores,
        weights: &PenaltyWeights,
    ) -> f64 {
        if weights.roughness_factor > 0.0 {
            scores.roughness = roughness(stresses, weights.roughness_days);
        }
        scores.settle(weights)
    }

    /// Writes the day-by-day model state for a plan.
    ///
    /// Each row shows the state at the start of a day together with that
    /// day's stress; a final row shows the state after the last day.
    pub fn write_integration<W>(&self, writer: W, stresses: &[f64]) -> io::Result<()>
    where
        W: io::Write,
    {
        let max = self.max_daily_stress;
        let mut writer = tsv_writer(writer);
        let header = ["day", "stress", "fitness", "fatigue", "performance"];
        writer.write_record(header.iter().chain(self.constraint.column_names()))?;

        let mut state = ModelState::initial(&self.params);
        let mut penalty = 0.0;
        let row = |day: usize, stress: f64, state: &ModelState| {
            let mut fields = vec![day.to_string(), real(stress)];
            fields.extend(
                [state.fitness, state.fatigue, state.performance]
                    .into_iter()
                    .chain(self.constraint.column_values(state, max))
                    .map(real),
            );
            fields
        };
        for (day, &stress) in stresses.iter().enumerate() {
            writer.write_record(row(day, stress, &state))?;
            self.advance_day(&mut state, &mut penalty, stress);
        }
        writer.write_record(row(stresses.len(), 0.0, &state))?;
        writer.flush()
    }
}
