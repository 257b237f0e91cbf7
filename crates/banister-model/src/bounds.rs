use std::{
    io,
    path::Path,
};

use serde::Deserialize;

use crate::{
    io::{LoadError, ParseError, load_with, read_rows, real, tsv_writer},
    params::{DESIGN_VAR_COUNT, DesignVar},
};

/// Search box and mutation scale for parameter estimation.
///
/// Each array is indexed by [`DesignVar::index`]. Variables absent from a
/// bounds file stay pinned at `[0, 0]` with a zero mutation deviation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DesignBounds {
    pub lower: [f64; DESIGN_VAR_COUNT],
    pub upper: [f64; DESIGN_VAR_COUNT],
    pub mutation_stdevs: [f64; DESIGN_VAR_COUNT],
}

#[derive(Debug, Deserialize)]
struct BoundsRow(String, f64, f64, f64);

impl DesignBounds {
    /// Reads `name lower upper stdev` rows after a header line.
    pub fn from_reader<R>(reader: R) -> Result<Self, ParseError>
    where
        R: io::Read,
    {
        let mut bounds = Self::default();
        read_rows(reader, |line, BoundsRow(name, lower, upper, stdev)| {
            let Ok(var) = name.parse::<DesignVar>() else {
                return Err(ParseError::UnknownVariable { line, name });
            };
            if lower > upper {
                return Err(ParseError::InvertedBounds {
                    line,
                    name,
                    lower,
                    upper,
                });
            }
            let i = var.index();
            bounds.lower[i] = lower;
            bounds.upper[i] = upper;
            bounds.mutation_stdevs[i] = stdev;
            Ok(())
        })?;
        Ok(bounds)
    }

    pub fn load<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        load_with(path.as_ref(), Self::from_reader)
    }

    pub fn write_tsv<W>(&self, writer: W) -> io::Result<()>
    where
        W: io::Write,
    {
        let mut writer = tsv_writer(writer);
        writer.write_record(["design_variable", "lower_bound", "upper_bound", "mutation_stdev"])?;
        for var in DesignVar::ALL {
            let i = var.index();
            writer.write_record([
                var.name().to_owned(),
                real(self.lower[i]),
                real(self.upper[i]),
                real(self.mutation_stdevs[i]),
            ])?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds_file() {
        let input = "name\tlower\tupper\tstdev\nTau1\t1\t50\t0.5\nalpha\t1\t2\t0.01\n";
        let bounds = DesignBounds::from_reader(input.as_bytes()).unwrap();
        assert_eq!(bounds.lower[DesignVar::Tau1.index()], 1.0);
        assert_eq!(bounds.upper[DesignVar::Tau1.index()], 50.0);
        assert_eq!(bounds.mutation_stdevs[DesignVar::Tau1.index()], 0.5);
        assert_eq!(bounds.upper[DesignVar::Alpha.index()], 2.0);

        let k2 = DesignVar::K2.index();
        assert_eq!(
            (bounds.lower[k2], bounds.upper[k2], bounds.mutation_stdevs[k2]),
            (0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_parse_bounds_unknown_name() {
        let input = "name\tlower\tupper\tstdev\nomega\t1\t2\t0.1\n";
        let err = DesignBounds::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::UnknownVariable { line: 2, .. }));
    }

    #[test]
    fn test_parse_bounds_inverted() {
        let input = "name\tlower\tupper\tstdev\nbeta\t1\t0.5\t0.1\n";
        let err = DesignBounds::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvertedBounds { .. }));
    }

    #[test]
    fn test_write_tsv() {
        let mut bounds = DesignBounds::default();
        bounds.upper[DesignVar::Tau1.index()] = 60.0;
        bounds.mutation_stdevs[DesignVar::Tau1.index()] = 2.5;
        let mut out = vec![];
        bounds.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("design_variable\tlower_bound\tupper_bound\tmutation_stdev")
        );
        assert_eq!(lines.next(), Some("tau1\t0.000000\t60.000000\t2.500000"));
        assert_eq!(lines.count(), DESIGN_VAR_COUNT - 1);
    }
}
