//! Output formats for parsed programs
//!
//! A program is rendered as a whole (a slice of top-level statement nodes) by one of
//! the formatters in the [registry]:
//!
//!     sexp      one line per statement, the node's `Display`
//!     treeviz   one line per node, nesting drawn with box characters
//!     json      the [snapshot] of every statement, pretty printed
//!     yaml      the same snapshot as YAML

pub mod registry;
pub mod sexp;
pub mod snapshot;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use sexp::SexpFormatter;
pub use snapshot::{AstSnapshot, JsonFormatter, YamlFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
