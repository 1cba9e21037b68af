//! # rowcalc-core
//!
//! Core data structures for the rowcalc formula engine.
//!
//! This crate provides the fundamental types shared across rowcalc:
//! - [`Scalar`] - A single cell value (number, text, boolean, null, or error)
//! - [`ErrorKind`] - The spreadsheet error sentinels (`#DIV/0!`, `#N/A`, ...)
//! - [`Table`] - The tabular collaborator contract, with an in-memory [`Frame`]
//! - [`DerivedColumn`] and [`DerivedRegistry`] - Formula-defined virtual columns
//!
//! ## Example
//!
//! ```rust
//! use rowcalc_core::{Frame, Scalar, Table};
//!
//! let mut frame = Frame::new();
//! frame.push_number_column("amount", &[10.0, 20.0, 30.0]);
//! assert_eq!(frame.row_count(), 3);
//! assert_eq!(frame.column("amount").unwrap()[1], Scalar::Number(20.0));
//! ```

pub mod derived;
pub mod error;
pub mod table;
pub mod value;

pub use derived::{is_derived_name, DerivedColumn, DerivedRegistry, DERIVED_PREFIX};
pub use error::{Error, Result};
pub use table::{unique_column_name, Frame, Table};
pub use value::{ColumnType, ErrorKind, Scalar};
