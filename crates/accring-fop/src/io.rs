//! Table import and ASCII export.

use crate::error::FopError;
use crate::fop::FunctionOfPos;
use accring_core::{read_components, ColumnSource, Components, Metadata, TableError};
use accring_interp::SplineKind;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Column names for reading a [`FunctionOfPos`] from a table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableLayout {
    /// Position column. Holds in-turn positions when `turn` is set,
    /// absolute positions otherwise.
    pub pos: String,
    /// Optional turn-number column.
    pub turn: Option<String>,
    /// One column per value component.
    pub values: Vec<String>,
    /// Optional particle-id column and the id to keep.
    pub particle: Option<(String, u32)>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            pos: "s".into(),
            turn: None,
            values: vec!["x".into(), "z".into(), "s".into()],
            particle: None,
        }
    }
}

impl TableLayout {
    /// Layout with the given position and value columns.
    pub fn new(pos: impl Into<String>, values: &[&str]) -> Self {
        Self {
            pos: pos.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Read turn numbers from `column`.
    pub fn with_turn(mut self, column: impl Into<String>) -> Self {
        self.turn = Some(column.into());
        self
    }

    /// Keep only rows whose `column` equals `id`.
    pub fn with_particle(mut self, column: impl Into<String>, id: u32) -> Self {
        self.particle = Some((column.into(), id));
        self
    }
}

impl<T: Components> FunctionOfPos<T> {
    /// Read samples from a table.
    ///
    /// # Errors
    ///
    /// Any [`TableError`](accring_core::TableError) from the source,
    /// including `InsufficientColumns` when the layout names fewer value
    /// columns than `T` has components, and the domain errors of
    /// [`set`](Self::set) for invalid rows.
    pub fn from_table(
        source: &dyn ColumnSource,
        layout: &TableLayout,
        circumference: f64,
        kind: SplineKind,
    ) -> Result<Self, FopError> {
        let mut f = Self::new(circumference, kind)?;
        let names: Vec<&str> = layout.values.iter().map(String::as_str).collect();
        let values = read_components::<T>(source, &names)?;
        let pos = source.column(&layout.pos)?;
        let turns = match &layout.turn {
            Some(c) => Some(source.column(c)?),
            None => None,
        };
        let particles = match &layout.particle {
            Some((c, id)) => Some((source.column(c)?, f64::from(*id))),
            None => None,
        };

        let rows = values.len();
        let lengths = std::iter::once(pos.len())
            .chain(turns.as_ref().map(Vec::len))
            .chain(particles.as_ref().map(|(ids, _)| ids.len()));
        for found in lengths {
            if found < rows {
                return Err(TableError::RaggedRow {
                    row: found,
                    expected: rows,
                    found,
                }
                .into());
            }
        }

        let mut skipped = 0usize;
        for (row, value) in values.into_iter().enumerate() {
            if let Some((ids, id)) = &particles {
                if ids[row] != *id {
                    skipped += 1;
                    continue;
                }
            }
            match &turns {
                Some(t) => f.set(value, pos[row], t[row].round().max(0.0) as u32)?,
                None => f.set_total(value, pos[row])?,
            }
        }
        info!(
            samples = f.len(),
            turns = f.n_turns(),
            skipped,
            "position function read from table"
        );
        Ok(f)
    }

    /// Write all samples as an ASCII table with a metadata header.
    ///
    /// Columns are absolute position, turn, in-turn position and the value
    /// components. The column-name row starts with `*`, so the output reads
    /// back through [`Table::parse`](accring_core::Table::parse).
    pub fn write_table<W: Write>(&self, w: &mut W) -> Result<(), FopError> {
        let mut header = Metadata::new()
            .with("circumference", self.circumference())
            .with("turns", self.n_turns())
            .with("interpolation", self.kind());
        header.merge(self.metadata());
        header.write_header(w, Metadata::DELIMITER)?;

        write!(w, "* {:>16} {:>6} {:>16}", "pos", "turn", "pos_in_turn")?;
        for label in T::LABELS {
            write!(w, " {label:>16}")?;
        }
        writeln!(w)?;
        for (pos, v) in self.samples() {
            write!(
                w,
                "  {:>16.9e} {:>6} {:>16.9e}",
                pos,
                self.turn(pos),
                self.pos_in_turn(pos)
            )?;
            for c in v.components() {
                write!(w, " {c:>16.9e}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Write the table to `path`.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), FopError> {
        let path = path.as_ref();
        let mut w = BufWriter::new(File::create(path)?);
        self.write_table(&mut w)?;
        w.flush()?;
        debug!(path = %path.display(), "position function written");
        Ok(())
    }
}
