//! Loading benchmark output tables
//!
//! The benchmark writes a comma-separated table with a header row. Only three
//! columns are used, located by name so that extra columns and column order do
//! not matter:
//!
//! ```text
//! i,thrash,cycles
//! 0,0,100
//! 1,1,512
//! ```
//!
//! Blank lines are skipped. Values may be wrapped in double quotes, and a
//! leading UTF-8 byte order mark is ignored. Cycle counts must be finite.

use std::io::{self, BufRead};

use crate::sample::{Measurement, Sample};

/// Columns that must be present in the header.
pub const REQUIRED_COLUMNS: [&str; 3] = ["i", "thrash", "cycles"];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadSampleError {
    #[display("failed to read sample table")]
    Io { source: io::Error },
    #[display("sample table has no header row")]
    MissingHeader,
    #[display("sample table is missing required columns {missing:?}")]
    Schema {
        #[error(not(source))]
        missing: Vec<String>,
    },
    #[display("line {line}: invalid {column} value {value:?}")]
    Parse {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[display("line {line}: expected at least {expected} fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl From<io::Error> for LoadSampleError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    index: usize,
    group: usize,
    cycles: usize,
}

impl ColumnIndices {
    fn from_header(header: &str) -> Result<Self, LoadSampleError> {
        let names = split_fields(header);
        let find = |name: &str| names.iter().position(|n| *n == name);

        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| find(name).is_none())
            .map(|name| (*name).to_owned())
            .collect::<Vec<_>>();
        match (find("i"), find("thrash"), find("cycles")) {
            (Some(index), Some(group), Some(cycles)) => Ok(Self {
                index,
                group,
                cycles,
            }),
            _ => Err(LoadSampleError::Schema { missing }),
        }
    }

    fn width(self) -> usize {
        self.index.max(self.group).max(self.cycles) + 1
    }
}

impl Sample {
    /// Parses a sample table from CSV text.
    ///
    /// # Errors
    ///
    /// * [`LoadSampleError::Schema`] - if any of [`REQUIRED_COLUMNS`] is absent
    /// * [`LoadSampleError::Parse`] / [`LoadSampleError::ShortRow`] - on malformed rows
    /// * [`LoadSampleError::Io`] - if reading fails
    ///
    /// # Examples
    ///
    /// ```
    /// use bimodal_analysis::sample::Sample;
    ///
    /// let csv = "i,thrash,cycles\n0,0,100\n1,1,512.5\n";
    /// let sample = Sample::from_csv_reader(csv.as_bytes()).unwrap();
    /// assert_eq!(sample.len(), 2);
    /// assert_eq!(sample.measurements()[1].cycles, 512.5);
    ///
    /// let err = Sample::from_csv_reader("i,cycles\n0,100\n".as_bytes()).unwrap_err();
    /// assert!(err.to_string().contains("thrash"));
    /// ```
    pub fn from_csv_reader<R>(reader: R) -> Result<Self, LoadSampleError>
    where
        R: BufRead,
    {
        let mut lines = reader.lines().enumerate();
        let columns = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    let line = line.strip_prefix('\u{feff}').unwrap_or(&line);
                    if !line.trim().is_empty() {
                        break ColumnIndices::from_header(line)?;
                    }
                }
                None => return Err(LoadSampleError::MissingHeader),
            }
        };

        let mut measurements = vec![];
        for (line_idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            measurements.push(parse_row(&line, line_idx + 1, columns)?);
        }

        tracing::debug!(rows = measurements.len(), "parsed sample table");
        Ok(Self::new(measurements))
    }
}

fn parse_row(
    line: &str,
    line_no: usize,
    columns: ColumnIndices,
) -> Result<Measurement, LoadSampleError> {
    let fields = split_fields(line);
    if fields.len() < columns.width() {
        return Err(LoadSampleError::ShortRow {
            line: line_no,
            expected: columns.width(),
            found: fields.len(),
        });
    }

    let invalid = |column: &'static str, value: &str| LoadSampleError::Parse {
        line: line_no,
        column,
        value: value.to_owned(),
    };

    let index_field = fields[columns.index];
    let group_field = fields[columns.group];
    let cycles_field = fields[columns.cycles];

    let index = parse_integer(index_field).ok_or_else(|| invalid("i", index_field))?;
    let group = parse_integer(group_field).ok_or_else(|| invalid("thrash", group_field))?;
    let cycles = cycles_field
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite())
        .ok_or_else(|| invalid("cycles", cycles_field))?;

    Ok(Measurement {
        index,
        group,
        cycles,
    })
}

/// Accepts plain integers and integral floats such as `"1.0"`.
#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn parse_integer(field: &str) -> Option<i64> {
    if let Ok(value) = field.parse::<i64>() {
        return Some(value);
    }
    let value = field.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
                .unwrap_or(field)
        })
        .collect()
}
