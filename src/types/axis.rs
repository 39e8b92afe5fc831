//! Grid axes.

use std::fmt;

/// A coordinate axis of the structured grid.
///
/// Arrays are stored row-major as `[z][y][x]`, so the discriminant of an
/// axis is also its position in every `[_; 3]` triple used by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Slowest varying axis (index 0).
    Z = 0,
    /// Middle axis (index 1).
    Y = 1,
    /// Fastest varying axis (index 2).
    X = 2,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::Z, Axis::Y, Axis::X];

    /// Position of this axis in `[z, y, x]` triples.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis at position `index` of a `[z, y, x]` triple.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Axis::Z),
            1 => Some(Axis::Y),
            2 => Some(Axis::X),
            _ => None,
        }
    }

    /// The two remaining axes, in storage order.
    ///
    /// ```
    /// use cfd_rs::types::Axis;
    ///
    /// assert_eq!(Axis::Y.others(), [Axis::Z, Axis::X]);
    /// ```
    #[inline]
    pub const fn others(self) -> [Axis; 2] {
        match self {
            Axis::Z => [Axis::Y, Axis::X],
            Axis::Y => [Axis::Z, Axis::X],
            Axis::X => [Axis::Z, Axis::Y],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Z => "z",
            Axis::Y => "y",
            Axis::X => "x",
        };
        f.write_str(name)
    }
}
