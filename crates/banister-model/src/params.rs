//! The nine physiological parameters of the fitness-fatigue model.

use std::{
    fmt,
    io,
    path::Path,
    str::FromStr,
};

use serde::Deserialize;

use crate::io::{LoadError, ParseError, load_with, read_rows, real, tsv_writer};

/// Number of design variables in a parameter vector.
pub const DESIGN_VAR_COUNT: usize = 9;

/// A single model parameter, in design-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignVar {
    /// Fitness decay time constant (τ1).
    Tau1,
    /// Fatigue decay time constant (τ2).
    Tau2,
    /// Fitness decay exponent (α).
    Alpha,
    /// Fatigue decay exponent (β).
    Beta,
    /// Fitness gain per unit of training stress.
    K1,
    /// Fatigue gain per unit of training stress.
    K2,
    /// Baseline performance.
    P0,
    /// Initial fitness.
    F0,
    /// Initial fatigue.
    U0,
}

impl DesignVar {
    /// All variables in design-vector order.
    pub const ALL: [DesignVar; DESIGN_VAR_COUNT] = [
        DesignVar::Tau1,
        DesignVar::Tau2,
        DesignVar::Alpha,
        DesignVar::Beta,
        DesignVar::K1,
        DesignVar::K2,
        DesignVar::P0,
        DesignVar::F0,
        DesignVar::U0,
    ];

    /// Returns the name used in input and report files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DesignVar::Tau1 => "tau1",
            DesignVar::Tau2 => "tau2",
            DesignVar::Alpha => "alpha",
            DesignVar::Beta => "beta",
            DesignVar::K1 => "k1",
            DesignVar::K2 => "k2",
            DesignVar::P0 => "p0",
            DesignVar::F0 => "f0",
            DesignVar::U0 => "u0",
        }
    }

    /// Returns the position of this variable in a design vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DesignVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown design variable '{name}'")]
pub struct UnknownDesignVar {
    pub name: String,
}

/// Parses a variable name, ignoring ASCII case.
///
/// ```
/// use banister_model::DesignVar;
///
/// assert_eq!("TAU2".parse::<DesignVar>().unwrap(), DesignVar::Tau2);
/// assert!("tau3".parse::<DesignVar>().is_err());
/// ```
impl FromStr for DesignVar {
    type Err = UnknownDesignVar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DesignVar::ALL
            .into_iter()
            .find(|var| var.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDesignVar { name: s.to_owned() })
    }
}

/// Physiological parameters of the nonlinear fitness-fatigue model.
///
/// Fitness `g` and fatigue `h` evolve as
///
/// ```text
/// dg/dt = -g^α / τ1 + k1·w
/// dh/dt = -h^β / τ2 + k2·w
/// p     = p0 + g - h
/// ```
///
/// where `w` is the training stress, starting from `g = f0` and `h = u0`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub tau1: f64,
    pub tau2: f64,
    pub alpha: f64,
    pub beta: f64,
    pub k1: f64,
    pub k2: f64,
    pub p0: f64,
    pub f0: f64,
    pub u0: f64,
}

#[derive(Debug, Deserialize)]
struct ParamRow(String, f64);

impl ModelParams {
    /// Builds parameters from a design vector in [`DesignVar::ALL`] order.
    ///
    /// # Panics
    ///
    /// Panics if `design` does not contain exactly [`DESIGN_VAR_COUNT`] values.
    #[must_use]
    pub fn from_design(design: &[f64]) -> Self {
        assert_eq!(design.len(), DESIGN_VAR_COUNT, "design vector length");
        let mut params = Self::default();
        for (var, &value) in DesignVar::ALL.iter().zip(design) {
            params.set(*var, value);
        }
        params
    }

    /// Returns the parameters as a design vector in [`DesignVar::ALL`] order.
    #[must_use]
    pub fn to_design(&self) -> [f64; DESIGN_VAR_COUNT] {
        DesignVar::ALL.map(|var| self.get(var))
    }

    #[must_use]
    pub fn get(&self, var: DesignVar) -> f64 {
        match var {
            DesignVar::Tau1 => self.tau1,
            DesignVar::Tau2 => self.tau2,
            DesignVar::Alpha => self.alpha,
            DesignVar::Beta => self.beta,
            DesignVar::K1 => self.k1,
            DesignVar::K2 => self.k2,
            DesignVar::P0 => self.p0,
            DesignVar::F0 => self.f0,
            DesignVar::U0 => self.u0,
        }
    }

    pub fn set(&mut self, var: DesignVar, value: f64) {
        let slot = match var {
            DesignVar::Tau1 => &mut self.tau1,
            DesignVar::Tau2 => &mut self.tau2,
            DesignVar::Alpha => &mut self.alpha,
            DesignVar::Beta => &mut self.beta,
            DesignVar::K1 => &mut self.k1,
            DesignVar::K2 => &mut self.k2,
            DesignVar::P0 => &mut self.p0,
            DesignVar::F0 => &mut self.f0,
            DesignVar::U0 => &mut self.u0,
        };
        *slot = value;
    }

    /// Returns `true` if the parameters satisfy the physical constraints.
    ///
    /// Time constants and gains must be non-negative, the fitness exponent at
    /// least one and the fatigue exponent at most one.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        !(self.tau1 < 0.0
            || self.tau2 < 0.0
            || self.k1 < 0.0
            || self.k2 < 0.0
            || self.alpha < 1.0
            || self.beta > 1.0)
    }

    /// Reads a parameters file: a header line followed by `name value` rows.
    ///
    /// Variables not listed in the file are zero.
    pub fn from_reader<R>(reader: R) -> Result<Self, ParseError>
    where
        R: io::Read,
    {
        let mut params = Self::default();
        read_rows(reader, |line, ParamRow(name, value)| {
            let var = name
                .parse::<DesignVar>()
                .map_err(|_| ParseError::UnknownVariable { line, name })?;
            params.set(var, value);
            Ok(())
        })?;
        Ok(params)
    }

    pub fn load<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        load_with(path.as_ref(), Self::from_reader)
    }

    /// Writes the parameters as a `name value` table.
    pub fn write_tsv<W>(&self, writer: W) -> io::Result<()>
    where
        W: io::Write,
    {
        let mut writer = tsv_writer(writer);
        writer.write_record(["design_variable", "value"])?;
        for var in DesignVar::ALL {
            writer.write_record([var.name().to_owned(), real(self.get(var))])?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelParams {
        ModelParams {
            tau1: 30.0,
            tau2: 8.0,
            alpha: 1.0,
            beta: 1.0,
            k1: 0.1,
            k2: 0.3,
            p0: 500.0,
            f0: 50.0,
            u0: 20.0,
        }
    }

    #[test]
    fn test_design_round_trip_order() {
        let params = sample();
        let design = params.to_design();
        assert_eq!(design, [30.0, 8.0, 1.0, 1.0, 0.1, 0.3, 500.0, 50.0, 20.0]);
        assert_eq!(ModelParams::from_design(&design), params);
    }

    #[test]
    fn test_feasibility() {
        assert!(sample().is_feasible());
        for (var, value) in [
            (DesignVar::Tau1, -1.0),
            (DesignVar::Tau2, -0.5),
            (DesignVar::K1, -0.1),
            (DesignVar::K2, -0.1),
            (DesignVar::Alpha, 0.9),
            (DesignVar::Beta, 1.1),
        ] {
            let mut params = sample();
            params.set(var, value);
            assert!(!params.is_feasible(), "{var} = {value}");
        }
    }

    #[test]
    fn test_parse_params_file() {
        let input = "name\tvalue\ntau1\t30\nTAU2\t8\nalpha\t1\nbeta\t1\nk1\t0.1\nk2\t0.3\np0\t500\nf0\t50\nu0\t20\n";
        let params = ModelParams::from_reader(input.as_bytes()).unwrap();
        assert_eq!(params, sample());
    }

    #[test]
    fn test_parse_params_unknown_name() {
        let input = "name\tvalue\ntau1\t30\ngamma\t2\n";
        let err = ModelParams::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownVariable { line: 3, ref name } if name == "gamma"
        ));
    }

    #[test]
    fn test_parse_params_malformed_value() {
        let input = "name\tvalue\ntau1\tthirty\n";
        let err = ModelParams::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_write_tsv_reads_back() {
        let mut out = vec![];
        sample().write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("design_variable\tvalue\ntau1\t30.000000\n"));
        assert_eq!(ModelParams::from_reader(text.as_bytes()).unwrap(), sample());
    }
}
