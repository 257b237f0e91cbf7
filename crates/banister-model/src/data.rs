use std::{
    io,
    path::Path,
};

use serde::Deserialize;

use crate::io::{LoadError, ParseError, load_with, read_rows, real, tsv_writer};

/// Observed training history: parallel series of time, performance and
/// training stress, ordered by non-decreasing time.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingData {
    time: Vec<f64>,
    performance: Vec<f64>,
    training_stress: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct DataRow(f64, f64, f64);

impl TrainingData {
    /// Builds a data series from parallel vectors.
    ///
    /// # Panics
    ///
    /// Panics if the vectors differ in length.
    #[must_use]
    pub fn new(time: Vec<f64>, performance: Vec<f64>, training_stress: Vec<f64>) -> Self {
        assert_eq!(time.len(), performance.len());
        assert_eq!(time.len(), training_stress.len());
        Self {
            time,
            performance,
            training_stress,
        }
    }

    /// Reads `time performance training_stress` rows after a header line.
    pub fn from_reader<R>(reader: R) -> Result<Self, ParseError>
    where
        R: io::Read,
    {
        let mut time = vec![];
        let mut performance = vec![];
        let mut training_stress = vec![];
        read_rows(reader, |line, DataRow(t, p, w)| {
            if let Some(&previous) = time.last()
                && t < previous
            {
                return Err(ParseError::TimeDecreasing {
                    line,
                    time: t,
                    previous,
                });
            }
            time.push(t);
            performance.push(p);
            training_stress.push(w);
            Ok(())
        })?;
        if time.is_empty() {
            return Err(ParseError::NoObservations);
        }
        Ok(Self {
            time,
            performance,
            training_stress,
        })
    }

    pub fn load<P>(path: P) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        load_with(path.as_ref(), Self::from_reader)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    #[must_use]
    pub fn performance(&self) -> &[f64] {
        &self.performance
    }

    #[must_use]
    pub fn training_stress(&self) -> &[f64] {
        &self.training_stress
    }

    /// Returns a copy of this series with the performance column replaced.
    ///
    /// # Panics
    ///
    /// Panics if `performance` has a different length.
    #[must_use]
    pub fn with_performance(&self, performance: Vec<f64>) -> Self {
        Self::new(
            self.time.clone(),
            performance,
            self.training_stress.clone(),
        )
    }

    /// Writes the series as a `day performance training_stress` table.
    pub fn write_tsv<W>(&self, writer: W) -> io::Result<()>
    where
        W: io::Write,
    {
        let mut writer = tsv_writer(writer);
        writer.write_record(["day", "performance", "training_stress"])?;
        for ((&t, &p), &w) in self
            .time
            .iter()
            .zip(&self.performance)
            .zip(&self.training_stress)
        {
            writer.write_record([real(t), real(p), real(w)])?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_file() {
        let input = "time\tperformance\ttraining_stress\n0\t500\t100\n1\t505.5\t0\n1\t506\t80\n";
        let data = TrainingData::from_reader(input.as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.time(), [0.0, 1.0, 1.0]);
        assert_eq!(data.performance(), [500.0, 505.5, 506.0]);
        assert_eq!(data.training_stress(), [100.0, 0.0, 80.0]);
    }

    #[test]
    fn test_parse_data_rejects_decreasing_time() {
        let input = "time\tperformance\ttraining_stress\n0\t500\t100\n2\t500\t100\n1\t500\t100\n";
        let err = TrainingData::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TimeDecreasing { line: 4, time, previous } if time == 1.0 && previous == 2.0
        ));
    }

    #[test]
    fn test_parse_data_rejects_empty() {
        let input = "time\tperformance\ttraining_stress\n";
        let err = TrainingData::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::NoObservations));
    }

    #[test]
    fn test_write_tsv() {
        let data = TrainingData::new(vec![0.0, 2.0], vec![1.5, 2.25], vec![10.0, 0.0]);
        let mut out = vec![];
        data.write_tsv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "day\tperformance\ttraining_stress\n0.000000\t1.500000\t10.000000\n2.000000\t2.250000\t0.000000\n"
        );
    }
}
