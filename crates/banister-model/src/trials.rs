use std::{io, path::Path};

use crate::io::{LoadError, ParseError, load_with, read_rows};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrialError {
    #[display("trial index {index} is out of range for {len} observations")]
    OutOfRange { index: usize, len: usize },
    #[display("trial index {index} does not follow {previous}")]
    NotIncreasing { index: usize, previous: usize },
}

/// Checks that `index` may follow `indices` in a series of `data_len`
/// observations.
fn check_next(indices: &[usize], index: usize, data_len: usize) -> Result<(), TrialError> {
    if index >= data_len {
        return Err(TrialError::OutOfRange {
            index,
            len: data_len,
        });
    }
    if let Some(&previous) = indices.last()
        && index <= previous
    {
        return Err(TrialError::NotIncreasing { index, previous });
    }
    Ok(())
}

/// Indices into a [`TrainingData`](crate::TrainingData) series whose observed
/// performance is a fitting target.
///
/// Indices are strictly increasing and within the series they were validated
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialIndices {
    indices: Vec<usize>,
}

impl TrialIndices {
    /// Validates `indices` against a series of `data_len` observations.
    ///
    /// ```
    /// use banister_model::{TrialError, TrialIndices};
    ///
    /// assert_eq!(TrialIndices::new(vec![0, 4], 5).unwrap().len(), 2);
    /// assert!(matches!(
    ///     TrialIndices::new(vec![5], 5),
    ///     Err(TrialError::OutOfRange { index: 5, len: 5 })
    /// ));
    /// ```
    pub fn new(indices: Vec<usize>, data_len: usize) -> Result<Self, TrialError> {
        for (i, &index) in indices.iter().enumerate() {
            check_next(&indices[..i], index, data_len)?;
        }
        Ok(Self { indices })
    }

    /// Reads one index per row after a header line, validated against a series
    /// of `data_len` observations.
    pub fn from_reader<R>(reader: R, data_len: usize) -> Result<Self, ParseError>
    where
        R: io::Read,
    {
        let mut indices: Vec<usize> = vec![];
        read_rows(reader, |line, (index,): (usize,)| {
            check_next(&indices, index, data_len)
                .map_err(|source| ParseError::Trial { line, source })?;
            indices.push(index);
            Ok(())
        })?;
        Ok(Self { indices })
    }

    pub fn load<P>(path: P, data_len: usize) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
    {
        load_with(path.as_ref(), |file| Self::from_reader(file, data_len))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trials() {
        let trials = TrialIndices::from_reader("trial\n0\n3\n7\n".as_bytes(), 8).unwrap();
        assert_eq!(trials.as_slice(), [0, 3, 7]);
    }

    #[test]
    fn test_parse_trials_out_of_range() {
        let err = TrialIndices::from_reader("trial\n2\n8\n".as_bytes(), 8).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Trial {
                line: 3,
                source: TrialError::OutOfRange { index: 8, len: 8 }
            }
        ));
    }

    #[test]
    fn test_parse_trials_not_increasing() {
        let err = TrialIndices::from_reader("trial\n2\n2\n".as_bytes(), 8).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Trial {
                line: 3,
                source: TrialError::NotIncreasing {
                    index: 2,
                    previous: 2
                }
            }
        ));
    }

    #[test]
    fn test_parse_trials_negative_index() {
        let err = TrialIndices::from_reader("trial\n-1\n".as_bytes(), 8).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_new_accepts_valid_indices() {
        let trials = TrialIndices::new(vec![0, 3, 7], 8).unwrap();
        assert_eq!(trials.as_slice(), [0, 3, 7]);
        assert!(TrialIndices::new(vec![], 0).unwrap().is_empty());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            TrialIndices::new(vec![1, 8], 8),
            Err(TrialError::OutOfRange { index: 8, len: 8 })
        ));
    }

    #[test]
    fn test_new_rejects_unsorted() {
        assert!(matches!(
            TrialIndices::new(vec![4, 2], 8),
            Err(TrialError::NotIncreasing {
                index: 2,
                previous: 4
            })
        ));
        assert!(matches!(
            TrialIndices::new(vec![3, 3], 8),
            Err(TrialError::NotIncreasing { .. })
        ));
    }
}
