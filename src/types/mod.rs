//! Strongly-typed grid and process types for safer APIs.
//!
//! This module provides newtypes and structured types to make APIs
//! self-documenting and prevent parameter mix-ups.
//!
//! # Design Philosophy
//!
//! - **Newtypes prevent mix-ups**: a [`Rank`] is not a line index, an
//!   [`Axis`] is not a bare `usize`
//! - **Named fields over positional**: `AxisSides { low, high }`
//! - **One layout convention**: every 3D array is row-major `[z][y][x]`,
//!   so `Axis::Z` is index 0 and `Axis::X` (fastest varying) is index 2
//!
//! # Example
//!
//! ```
//! use cfd_rs::types::{Axis, Bounds3D, GlobalGrid};
//!
//! let grid = GlobalGrid::new(8, 16, 32);
//! assert_eq!(grid.extent().get(Axis::X), 32);
//! assert_eq!(grid.total_points(), 8 * 16 * 32);
//!
//! let bounds = Bounds3D::cube(0.0, 1.0);
//! assert_eq!(bounds.length(Axis::Y), 1.0);
//! ```

mod axis;
mod bounds;
mod extent;
mod indices;
mod resolution;
mod sides;

pub use axis::Axis;
pub use bounds::Bounds3D;
pub use extent::Extent3;
pub use indices::{LineIndex, Rank};
pub use resolution::GlobalGrid;
pub use sides::{AxisSides, Side};
