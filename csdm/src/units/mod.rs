//! Parsing, checking and converting physical quantities.
//!
//! Only what the dimension model needs: scalar quantities with a unit, dimensionality checks,
//! unit conversion and the inverse units used by reciprocal dimensions. Affine units (eg degrees
//! Celsius) aren't supported.

mod dims;
mod quantity;
mod registry;
mod unit;

pub use dims::Dimensionality;
pub use quantity::ScalarQuantity;
pub use unit::Unit;
