//! Core types for the accring accelerator-lattice toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types every other crate is built from: transverse pairs and field
//! triples, the sealed [`Components`] trait that restricts interpolation to
//! exactly three value shapes, flat-table input, metadata headers for ASCII
//! output, and the runner for external simulation programs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod components;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod metadata;
pub mod table;
pub mod tool;

pub use components::Components;
pub use error::{TableError, ToolError};
pub use geometry::{AccPair, AccTriple};
pub use metadata::Metadata;
pub use table::{read_components, ColumnSource, Table};
pub use tool::ExternalTool;
