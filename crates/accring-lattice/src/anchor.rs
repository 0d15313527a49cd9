//! Anchor-relative placement of element footprints.

use std::fmt;

/// The point of an element's footprint that a position refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Entrance of the element.
    #[default]
    Begin,
    /// Middle of the element.
    Center,
    /// Exit of the element.
    End,
}

impl Anchor {
    /// Offset of this anchor from the footprint begin, for an element of
    /// the given length.
    pub fn offset(self, length: f64) -> f64 {
        match self {
            Self::Begin => 0.0,
            Self::Center => length / 2.0,
            Self::End => length,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Begin => "begin",
            Self::Center => "center",
            Self::End => "end",
        })
    }
}

/// Position of `anchor` for an element of `length` whose `ref_pos` anchor
/// sits at `key`.
///
/// ```
/// use accring_lattice::{locate, Anchor};
///
/// assert_eq!(locate(4.0, 2.0, Anchor::Center, Anchor::Begin), 3.0);
/// assert_eq!(locate(4.0, 2.0, Anchor::Center, Anchor::End), 5.0);
/// ```
pub fn locate(key: f64, length: f64, ref_pos: Anchor, anchor: Anchor) -> f64 {
    key - ref_pos.offset(length) + anchor.offset(length)
}
