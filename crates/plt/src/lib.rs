//! Module for working with `#!TDV112` binary plot files
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod file;
mod format;
mod reader;
mod stream;
mod writer;
mod zone;

// Inline anything important for a nice public API
#[doc(inline)]
pub use file::PltFile;

#[doc(inline)]
pub use zone::{FieldValues, FieldVariable, GridShape, Zone, ZoneHeader, ZoneKind};

#[doc(inline)]
pub use format::{DataLocation, VariableFormat, VERSION_TAG};

#[doc(inline)]
pub use reader::{read_plt_file, CellTrim, PltReader};

#[doc(inline)]
pub use writer::{encode, write_json, write_plt_file};

#[doc(inline)]
pub use error::{Error, Result};
