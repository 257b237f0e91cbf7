use crate::params::ModelParams;

/// Length of one training day in model time units.
pub const DAY_LENGTH: f64 = 1.0;

/// Physiological state at one instant of the integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelState {
    pub fitness: f64,
    pub fatigue: f64,
    pub performance: f64,
}

impl ModelState {
    /// Returns the state at time zero.
    #[must_use]
    pub fn initial(params: &ModelParams) -> Self {
        Self {
            fitness: params.f0,
            fatigue: params.u0,
            performance: params.p0 + params.f0 - params.u0,
        }
    }

    /// Advances the state by one explicit Euler step of length `dt` under a
    /// constant `training_stress`.
    pub fn step(&mut self, params: &ModelParams, training_stress: f64, dt: f64) {
        let fitness_rate =
            -1.0 / params.tau1 * self.fitness.powf(params.alpha) + params.k1 * training_stress;
        let fatigue_rate =
            -1.0 / params.tau2 * self.fatigue.powf(params.beta) + params.k2 * training_stress;
        self.fitness += dt * fitness_rate;
        self.fatigue += dt * fatigue_rate;
        self.performance = params.p0 + self.fitness - self.fatigue;
    }
}
