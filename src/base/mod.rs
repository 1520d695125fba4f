//! Foundation types for the query toolchain.
//!
//! - [`TextRange`], [`TextSize`] - byte offsets
//! - [`Point`], [`PointRange`] - row/column positions
//! - [`LineIndex`] - offset/point conversion for one text
//!
//! This module has NO dependencies on other crate modules.

mod position;

pub use position::{LineIndex, Point, PointRange};
pub use text_size::{TextRange, TextSize};
