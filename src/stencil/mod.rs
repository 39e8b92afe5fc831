//! Stencil assembly for compact first derivatives.
//!
//! A derivative along an axis turns every grid line of the local block
//! into a tridiagonal system. [`AxisStencil`] holds the left-hand side
//! shared by all lines of a rank; [`assemble`] evaluates the right-hand
//! sides from a halo-refreshed [`PaddedField`](crate::field::PaddedField)
//! and [`scatter_lines`] writes solved lines back into a field.

mod assembly;
mod scheme;

pub use assembly::{AxisStencil, MIN_ONE_SIDED_SIZE, MIN_SYSTEM_SIZE, assemble, scatter_lines};
pub use scheme::{CompactScheme, RowKind};
