//! Residual objective for fitting model parameters to observed performance.

use crate::{data::TrainingData, integrator::ModelState, params::ModelParams, trials::TrialIndices};

/// Sums the absolute residuals between observed and modelled performance at
/// every trial index.
///
/// The model is integrated once from the first observation, using the gap
/// between successive timestamps as the step length and the stress recorded at
/// the start of each gap. Returns NaN for infeasible parameters.
///
/// # Examples
///
/// ```
/// use banister_model::{ModelParams, TrainingData, TrialIndices, estimation};
///
/// let params = ModelParams { tau1: 10.0, tau2: 5.0, alpha: 1.0, beta: 1.0, p0: 100.0, ..Default::default() };
/// let data = TrainingData::new(vec![0.0, 1.0], vec![100.0, 103.0], vec![0.0, 0.0]);
/// let trials = TrialIndices::new(vec![1], data.len()).unwrap();
/// assert_eq!(estimation::calculate_error(&params, &data, &trials), 3.0);
///
/// let infeasible = ModelParams { alpha: 0.5, ..params };
/// assert!(estimation::calculate_error(&infeasible, &data, &trials).is_nan());
/// ```
#[must_use]
pub fn calculate_error(params: &ModelParams, data: &TrainingData, trials: &TrialIndices) -> f64 {
    if !params.is_feasible() {
        return f64::NAN;
    }

    let time = data.time();
    let stress = data.training_stress();
    let mut state = ModelState::initial(params);
    let mut total_error = 0.0;
    let mut previous_index = 0;
    for &trial_index in trials.as_slice() {
        for interval in previous_index..trial_index {
            state.step(params, stress[interval], time[interval + 1] - time[interval]);
        }
        total_error += (data.performance()[trial_index] - state.performance).abs();
        previous_index = trial_index;
    }
    total_error
}

/// Converts a total residual into a per-trial mean.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean_abs_residual(total_error: f64, trials: &TrialIndices) -> f64 {
    total_error / trials.len() as f64
}

/// Maps a total residual to a GA fitness, where larger is better.
///
/// NaN errors from infeasible parameters become negative infinity.
#[must_use]
pub fn error_fitness(total_error: f64) -> f64 {
    if total_error.is_nan() {
        f64::NEG_INFINITY
    } else {
        -total_error
    }
}

/// Integrates the model over the whole series, returning modelled performance
/// at every observation.
#[must_use]
pub fn integrate(params: &ModelParams, data: &TrainingData) -> Vec<f64> {
    let time = data.time();
    let stress = data.training_stress();
    let mut state = ModelState::initial(params);
    let mut performance = Vec::with_capacity(data.len());
    performance.push(state.performance);
    for interval in 0..data.len().saturating_sub(1) {
        state.step(params, stress[interval], time[interval + 1] - time[interval]);
        performance.push(state.performance);
    }
    performance.truncate(data.len());
    performance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModelParams {
        ModelParams {
            tau1: 40.0,
            tau2: 10.0,
            alpha: 1.2,
            beta: 0.8,
            k1: 0.1,
            k2: 0.2,
            p0: 300.0,
            f0: 20.0,
            u0: 10.0,
        }
    }

    fn data() -> TrainingData {
        TrainingData::new(
            vec![0.0, 1.0, 3.0, 4.0, 7.0],
            vec![310.0, 312.0, 305.0, 320.0, 318.0],
            vec![50.0, 120.0, 0.0, 80.0, 0.0],
        )
    }

    #[test]
    fn test_infeasible_alpha_is_nan() {
        let params = ModelParams {
            alpha: 0.99,
            ..params()
        };
        let error = calculate_error(&params, &data(), &TrialIndices::new(vec![1, 3], 5).unwrap());
        assert!(error.is_nan());
        assert_eq!(error_fitness(error), f64::NEG_INFINITY);
    }

    #[test]
    fn test_single_step_closed_form() {
        let params = ModelParams {
            k1: 0.0,
            k2: 0.0,
            ..params()
        };
        let data = TrainingData::new(vec![0.0, 2.0], vec![0.0, 333.0], vec![75.0, 0.0]);
        let error = calculate_error(&params, &data, &TrialIndices::new(vec![1], 2).unwrap());

        let dt = 2.0;
        let fitness = 20.0 + dt * (-(20.0_f64.powf(1.2)) / 40.0);
        let fatigue = 10.0 + dt * (-(10.0_f64.powf(0.8)) / 10.0);
        let expected = (333.0 - (300.0 + fitness - fatigue)).abs();
        assert!((error - expected).abs() < 1e-9, "{error} != {expected}");
    }

    #[test]
    fn test_error_matches_full_integration() {
        let params = params();
        let data = data();
        let trials = TrialIndices::new(vec![0, 2, 4], data.len()).unwrap();
        let modelled = integrate(&params, &data);
        let expected = trials
            .as_slice()
            .iter()
            .map(|&i| (data.performance()[i] - modelled[i]).abs())
            .sum::<f64>();
        let error = calculate_error(&params, &data, &trials);
        assert!((error - expected).abs() < 1e-9);
        assert!((mean_abs_residual(error, &trials) - expected / 3.0).abs() < 1e-9);
        assert_eq!(error_fitness(error), -error);
    }

    #[test]
    fn test_integrate_starts_from_initial_state() {
        let modelled = integrate(&params(), &data());
        assert_eq!(modelled.len(), 5);
        assert_eq!(modelled[0], 310.0);
    }

    #[test]
    fn test_no_trials_is_zero_error() {
        let error = calculate_error(&params(), &data(), &TrialIndices::new(vec![], 5).unwrap());
        assert_eq!(error, 0.0);
    }
}
