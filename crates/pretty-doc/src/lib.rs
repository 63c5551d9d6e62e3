//! A Wadler/Lindig-style pretty-printing engine.
//!
//! Callers build a document tree with [`Builder`], then render it with
//! [`format`] (width-aware, greedily keeping related content on one line)
//! or [`singleline_format`] (collapses every break decision onto one line).
//!
//! ```
//! use pretty_doc::{format_string, PrintConfig};
//!
//! let config = PrintConfig {
//!     max_width: 10,
//!     ..PrintConfig::default()
//! };
//! let out = format_string(&config, |b| {
//!     b.group(0, "[", "]", |b| {
//!         b.seplist_comma(["a", "b", "c"], |b, item| b.text(item));
//!     });
//! });
//! assert_eq!(out, "[a, b, c]");
//! ```

mod builder;
mod buffer;
mod doc;
mod error;
mod fits;
mod printer;

pub use builder::{Builder, IfBreakHandle};
pub use buffer::{ChunkBuffer, Sink};
pub use doc::{last_position, remove_breaks, Children, Doc};
pub use error::BuilderError;
pub use printer::{format, format_string, singleline_format, singleline_format_string, render, PrintConfig};
