use xi_rope::Rope;

use super::span::Span;

/// Extracts the text for a span from the rope as an owned String.
#[cfg_attr(not(feature = "line-excerpts"), allow(dead_code))]
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    rope.slice_to_cow(sp.start..sp.end).into_owned()
}
