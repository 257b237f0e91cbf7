//! Tab-separated input and output files.
//!
//! Every input file has a header line followed by whitespace-trimmed,
//! tab-separated rows. Rows are deserialized with serde; malformed rows surface
//! as [`ParseError::Csv`], which carries the offending line. Reports are
//! written through [`tsv_writer`] with reals formatted by [`real`].

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

use crate::trials::TrialError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("malformed row")]
    Csv(csv::Error),
    #[display("line {line}: unknown design variable '{name}'")]
    UnknownVariable { line: u64, name: String },
    #[display("line {line}: lower bound {lower} of {name} exceeds upper bound {upper}")]
    InvertedBounds {
        line: u64,
        name: String,
        lower: f64,
        upper: f64,
    },
    #[display("line {line}: time {time} is earlier than the previous observation {previous}")]
    TimeDecreasing { line: u64, time: f64, previous: f64 },
    #[display("no observations")]
    NoObservations,
    #[display("line {line}: invalid trial index")]
    Trial { line: u64, source: TrialError },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to open {}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to parse {}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

fn tsv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: io::Read,
{
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Returns a tab-separated writer over `writer`.
///
/// Every record must have as many fields as the header.
pub fn tsv_writer<W>(writer: W) -> csv::Writer<W>
where
    W: io::Write,
{
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer)
}

/// Formats a report value with six decimals.
///
/// ```
/// assert_eq!(banister_model::io::real(0.08), "0.080000");
/// assert_eq!(banister_model::io::real(f64::NEG_INFINITY), "-inf");
/// ```
#[must_use]
pub fn real(value: f64) -> String {
    format!("{value:.6}")
}

/// Deserializes every row after the header, passing its line number along.
pub(crate) fn read_rows<R, T, F>(reader: R, mut on_row: F) -> Result<(), ParseError>
where
    R: io::Read,
    T: DeserializeOwned,
    F: FnMut(u64, T) -> Result<(), ParseError>,
{
    let mut reader = tsv_reader(reader);
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(ParseError::Csv)? {
        let line = record.position().map_or(0, csv::Position::line);
        let row = record.deserialize::<T>(None).map_err(ParseError::Csv)?;
        on_row(line, row)?;
    }
    Ok(())
}

pub(crate) fn load_with<T, F>(path: &Path, parse: F) -> Result<T, LoadError>
where
    F: FnOnce(File) -> Result<T, ParseError>,
{
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    parse(file).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_skips_header_and_trims() {
        let input = "a\tb\n 1\t2.5 \n3\t-4\n";
        let mut rows = vec![];
        read_rows(input.as_bytes(), |line, row: (u32, f64)| {
            rows.push((line, row));
            Ok(())
        })
        .unwrap();
        assert_eq!(rows, vec![(2, (1, 2.5)), (3, (3, -4.0))]);
    }

    #[test]
    fn test_read_rows_reports_short_row() {
        let input = "a\tb\n1\n";
        let err = read_rows(input.as_bytes(), |_, _: (u32, f64)| Ok(())).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_tsv_writer_layout() {
        let mut writer = tsv_writer(vec![]);
        writer.write_record(["a", "b"]).unwrap();
        writer
            .write_record([real(1.0), real(f64::INFINITY)])
            .unwrap();
        let out = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\tb\n1.000000\tinf\n");
    }

    #[test]
    fn test_tsv_writer_rejects_ragged_record() {
        let mut writer = tsv_writer(vec![]);
        writer.write_record(["a", "b"]).unwrap();
        assert!(writer.write_record(["1"]).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_with(Path::new("/nonexistent/banister.tsv"), |_| Ok(())).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/banister.tsv"));
    }
}
