//! Low/high side types with named fields.
//!
//! Provides strongly-typed structures for per-side values along one axis,
//! eliminating the need to remember `[low, high]` index conventions.

use std::fmt;

/// One of the two faces of a block along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Face at the smallest index along the axis.
    Low,
    /// Face at the largest index along the axis.
    High,
}

impl Side {
    /// Both sides, low first.
    pub const BOTH: [Side; 2] = [Side::Low, Side::High];

    /// The opposite face.
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Low => Side::High,
            Side::High => Side::Low,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Low => f.write_str("low"),
            Side::High => f.write_str("high"),
        }
    }
}

/// A value for each side of one axis.
///
/// # Example
///
/// ```
/// use cfd_rs::types::{AxisSides, Side};
///
/// let neighbors = AxisSides::new(Some(1), None::<usize>);
/// assert_eq!(neighbors[Side::Low], Some(1));
/// assert_eq!(neighbors.high, None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AxisSides<T> {
    /// Value at the low side
    pub low: T,
    /// Value at the high side
    pub high: T,
}

impl<T> AxisSides<T> {
    /// Create with explicit values.
    pub const fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    /// Same value on both sides.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            low: value.clone(),
            high: value,
        }
    }

    /// Map a function over both sides.
    pub fn map<U, F>(self, mut f: F) -> AxisSides<U>
    where
        F: FnMut(T) -> U,
    {
        AxisSides {
            low: f(self.low),
            high: f(self.high),
        }
    }
}

impl<T> std::ops::Index<Side> for AxisSides<T> {
    type Output = T;

    #[inline]
    fn index(&self, side: Side) -> &T {
        match side {
            Side::Low => &self.low,
            Side::High => &self.high,
        }
    }
}

impl<T> std::ops::IndexMut<Side> for AxisSides<T> {
    #[inline]
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Low => &mut self.low,
            Side::High => &mut self.high,
        }
    }
}

impl<T: fmt::Display> fmt::Display for AxisSides<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "low:{} high:{}", self.low, self.high)
    }
}
