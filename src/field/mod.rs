//! Field storage for local blocks.
//!
//! - [`PaddedField`]: a rank's block including halo layers (the input of a
//!   derivative request)
//! - [`Field3`]: interior-only block (the derivative output)
//!
//! Both store values row-major as `[z][y][x]`.

mod interior;
mod padded;

pub use interior::Field3;
pub use padded::PaddedField;
