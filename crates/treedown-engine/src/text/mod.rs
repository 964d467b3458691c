//! Byte-exact access to the document rope.
//!
//! Everything downstream of the rope works in spans: the compiler stores
//! block text as [`Span`]s and the line iterator hands out spans alongside
//! owned text. Slicing the rope with a stored span reproduces the source.

pub mod lines;
pub mod slice;
pub mod span;

pub use lines::{RawLine, raw_lines};
pub use span::Span;
