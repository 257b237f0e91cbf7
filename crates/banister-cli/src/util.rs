use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Opens `path`, runs `write` on it and flushes the result.
    pub fn save<F>(path: &Path, write: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Output) -> io::Result<()>,
    {
        let mut output = Output::from_output_path(path)?;
        write(&mut output)
            .with_context(|| format!("Failed to write to {}", output.display_path()))?;
        output
            .flush()
            .with_context(|| format!("Failed to flush output to {}", output.display_path()))
    }

    /// Opens a file, or standard output when the path is `-`.
    pub fn from_output_path(path: &Path) -> anyhow::Result<Self> {
        if path == Path::new("-") {
            Ok(Output::stdout())
        } else {
            Output::open(path.to_path_buf())
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PatternError {
    #[display("unterminated conversion in pattern {pattern:?}")]
    Unterminated { pattern: String },
    #[display("unsupported conversion '%{conversion}' in pattern {pattern:?}")]
    Unsupported { pattern: String, conversion: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Number {
        zero_pad: bool,
        left_align: bool,
        width: usize,
    },
}

/// A file name with printf-style integer conversions such as `%d`, `%zd` or
/// `%04zd`, each replaced by an iteration number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pieces: Vec<Piece>,
}

impl PathPattern {
    /// Returns whether `path` should be read as a pattern rather than a
    /// plain path.
    pub fn is_pattern(path: &str) -> bool {
        path.contains('%')
    }

    pub fn render(&self, number: usize) -> PathBuf {
        let mut path = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => path.push_str(text),
                &Piece::Number {
                    zero_pad,
                    left_align,
                    width,
                } => {
                    let formatted = if left_align {
                        format!("{number:<width$}")
                    } else if zero_pad {
                        format!("{number:0width$}")
                    } else {
                        format!("{number:>width$}")
                    };
                    path.push_str(&formatted);
                }
            }
        }
        PathBuf::from(path)
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let mut pieces = vec![];
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.next_if_eq(&'%').is_some() {
                literal.push('%');
                continue;
            }

            let mut zero_pad = false;
            let mut left_align = false;
            while let Some(flag) = chars.next_if(|&c| c == '0' || c == '-') {
                match flag {
                    '0' => zero_pad = true,
                    _ => left_align = true,
                }
            }
            let mut digits = String::new();
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                digits.push(digit);
            }
            let width = digits.parse::<usize>().unwrap_or(0);
            while chars.next_if(|c| matches!(c, 'h' | 'l' | 'z' | 'j' | 't')).is_some() {}

            match chars.next() {
                Some('d' | 'i' | 'u') => {
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Number {
                        zero_pad,
                        left_align,
                        width,
                    });
                }
                Some(conversion) => {
                    return Err(PatternError::Unsupported {
                        pattern: pattern.to_owned(),
                        conversion,
                    });
                }
                None => {
                    return Err(PatternError::Unterminated {
                        pattern: pattern.to_owned(),
                    });
                }
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }
}
