//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up different kinds of indices
//! (process ranks vs line indices).

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Convert to usize.
            #[inline]
            pub const fn as_usize(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Increment index by one.
            #[inline]
            pub fn next(self) -> Self {
                Self(self.0 + 1)
            }

            /// Decrement index by one, saturating at zero.
            #[inline]
            pub fn prev(self) -> Self {
                Self(self.0.saturating_sub(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        // Allow using as array index
        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Rank of a process in a communicator.
    ///
    /// # Example
    ///
    /// ```
    /// use cfd_rs::types::Rank;
    ///
    /// let rank = Rank::new(3);
    /// assert_eq!(rank.get(), 3);
    /// assert_eq!(rank.to_string(), "rank3");
    /// ```
    Rank,
    "rank"
);

define_index!(
    /// Index of a grid line within a batch of line systems.
    ///
    /// Lines parallel to an axis are numbered row-major over the two
    /// remaining axes.
    ///
    /// # Example
    ///
    /// ```
    /// use cfd_rs::types::LineIndex;
    ///
    /// let line = LineIndex::new(5);
    /// assert_eq!(line.next().get(), 6);
    /// ```
    LineIndex,
    "L"
);

// =============================================================================
// Iterator support
// =============================================================================

impl Rank {
    /// Iterate over the ranks `[0, size)`.
    ///
    /// # Example
    ///
    /// ```
    /// use cfd_rs::types::Rank;
    ///
    /// let ranks: Vec<_> = Rank::iter(4).collect();
    /// assert_eq!(ranks.len(), 4);
    /// assert_eq!(ranks[3].get(), 3);
    /// ```
    pub fn iter(size: usize) -> impl Iterator<Item = Rank> + ExactSizeIterator {
        (0..size).map(Rank)
    }
}

impl LineIndex {
    /// Iterate over the line indices `[0, n)`.
    pub fn iter(n: usize) -> impl Iterator<Item = LineIndex> + ExactSizeIterator {
        (0..n).map(LineIndex)
    }
}

// =============================================================================
// Tests
// =============================================================================
