//! Column-oriented table input.
//!
//! External simulation programs write flat text tables. This module only
//! knows how to pull named columns out of such a table; dialect-specific
//! column names and per-tool quirks belong to the caller.

use crate::components::Components;
use crate::error::TableError;
use indexmap::IndexMap;

/// Anything that can hand out named columns of equal length.
pub trait ColumnSource {
    /// Number of data rows.
    fn rows(&self) -> usize;

    /// Whether a column with this name exists.
    fn has_column(&self, name: &str) -> bool;

    /// Raw text cells of a column.
    fn text_column(&self, name: &str) -> Result<Vec<String>, TableError>;

    /// Numeric cells of a column.
    ///
    /// The default implementation parses [`text_column`](Self::text_column).
    fn column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        self.text_column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, raw)| {
                raw.parse::<f64>().map_err(|_| TableError::Parse {
                    row,
                    column: name.to_string(),
                    value: raw,
                })
            })
            .collect()
    }
}

/// Read a column group as values of shape `T`.
///
/// `names` lists one column per component, in component order; surplus
/// names are ignored.
///
/// # Errors
///
/// [`TableError::InsufficientColumns`] if fewer than `T::DIM` names are
/// given, or any error from reading the columns themselves.
pub fn read_components<T: Components>(
    source: &dyn ColumnSource,
    names: &[&str],
) -> Result<Vec<T>, TableError> {
    if names.len() < T::DIM {
        return Err(TableError::InsufficientColumns {
            needed: T::DIM,
            given: names.len(),
        });
    }
    let columns = names[..T::DIM]
        .iter()
        .map(|n| source.column(n))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let mut buf = [0.0f64; 3];
    Ok((0..rows)
        .map(|row| {
            for (i, col) in columns.iter().enumerate() {
                buf[i] = col[row];
            }
            T::from_components(&buf[..T::DIM])
        })
        .collect())
}

/// In-memory whitespace-delimited table.
///
/// # Format
///
/// - Blank lines and lines starting with `#`, `@` or `$` are skipped.
/// - A line starting with `*` is the header (MAD-X style); otherwise the
///   first non-skipped line is the header.
/// - Double quotes around cells are stripped.
///
/// # Examples
///
/// ```
/// use accring_core::{ColumnSource, Table};
///
/// let t = Table::parse("S X\n0.0 1e-3\n1.5 2e-3\n").unwrap();
/// assert_eq!(t.rows(), 2);
/// assert_eq!(t.column("S").unwrap(), vec![0.0, 1.5]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: IndexMap<String, Vec<String>>,
    rows: usize,
}

impl Table {
    /// Build a table from pre-split columns.
    ///
    /// # Errors
    ///
    /// [`TableError::RaggedRow`] if the columns differ in length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let columns: IndexMap<String, Vec<String>> =
            columns.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let rows = columns.values().next().map_or(0, Vec::len);
        if let Some(bad) = columns.values().position(|c| c.len() != rows) {
            let found = columns[bad].len();
            return Err(TableError::RaggedRow {
                row: rows.min(found),
                expected: rows,
                found,
            });
        }
        Ok(Self { columns, rows })
    }

    /// Parse a whitespace-delimited table.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut header: Option<Vec<String>> = None;
        let mut cells: Vec<Vec<String>> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(['#', '@', '$']) {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix('*') {
                header = Some(split_cells(rest));
                cells = vec![Vec::new(); header.as_ref().map_or(0, Vec::len)];
                continue;
            }
            let fields = split_cells(trimmed);
            let Some(names) = header.as_ref() else {
                cells = vec![Vec::new(); fields.len()];
                header = Some(fields);
                continue;
            };
            if fields.len() != names.len() {
                return Err(TableError::RaggedRow {
                    row: cells.first().map_or(0, Vec::len),
                    expected: names.len(),
                    found: fields.len(),
                });
            }
            for (col, field) in cells.iter_mut().zip(fields) {
                col.push(field);
            }
        }

        let names = header.ok_or(TableError::NoHeader)?;
        Self::from_columns(names.into_iter().zip(cells))
    }

    /// Read and parse a table file.
    pub fn read(path: impl AsRef<std::path::Path>) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Column names in file order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

fn split_cells(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|c| c.trim_matches('"').to_string())
        .collect()
}

impl ColumnSource for Table {
    fn rows(&self) -> usize {
        self.rows
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    fn text_column(&self, name: &str) -> Result<Vec<String>, TableError> {
        self.columns
            .get(name)
            .cloned()
            .ok_or_else(|| TableError::MissingColumn {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AccPair, AccTriple};

    const TFS: &str = r#"
@ NAME %05s "TWISS"
* NAME KEYWORD S L
$ %s %s %le %le
"QF1" "QUADRUPOLE" 1.0 0.5
"MB1" "SBEND" 4.0 2.0
"#;

    #[test]
    fn parses_madx_style_header() {
        let t = Table::parse(TFS).unwrap();
        assert_eq!(t.rows(), 2);
        assert_eq!(
            t.column_names().collect::<Vec<_>>(),
            vec!["NAME", "KEYWORD", "S", "L"]
        );
        assert_eq!(t.text_column("NAME").unwrap(), vec!["QF1", "MB1"]);
        assert_eq!(t.column("L").unwrap(), vec![0.5, 2.0]);
    }

    #[test]
    fn first_line_header_when_no_star() {
        let t = Table::parse("# comment\nS X Z\n0 1 2\n1 3 4\n").unwrap();
        let v: Vec<AccPair> = read_components(&t, &["X", "Z"]).unwrap();
        assert_eq!(v, vec![AccPair::new(1.0, 2.0), AccPair::new(3.0, 4.0)]);
    }

    #[test]
    fn missing_column() {
        let t = Table::parse("S\n1\n").unwrap();
        assert!(matches!(
            t.column("X"),
            Err(TableError::MissingColumn { .. })
        ));
    }

    #[test]
    fn insufficient_columns_for_triple() {
        let t = Table::parse("X Z\n1 2\n").unwrap();
        let r: Result<Vec<AccTriple>, _> = read_components(&t, &["X", "Z"]);
        assert_eq!(
            r.unwrap_err(),
            TableError::InsufficientColumns {
                needed: 3,
                given: 2
            }
        );
    }

    #[test]
    fn parse_error_names_cell() {
        let t = Table::parse("S\nabc\n").unwrap();
        match t.column("S") {
            Err(TableError::Parse { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "S");
                assert_eq!(value, "abc");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn ragged_row_rejected() {
        assert!(matches!(
            Table::parse("A B\n1 2\n3\n"),
            Err(TableError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert_eq!(Table::parse("# only\n").unwrap_err(), TableError::NoHeader);
    }
}
