//! The dimensions of the Core Scientific Dataset Model: linearly sampled, arbitrarily sampled and
//! labeled coordinate axes, their units, and their reciprocal (Fourier conjugate) dimensions.

mod dimension;
mod errors;
mod helpers;
mod range;
mod units;

#[cfg(test)]
mod testing;

pub use dimension::ArbitraryDimension;
pub use dimension::Coordinates;
pub use dimension::Dimension;
pub use dimension::DimensionConfig;
pub use dimension::DimensionKind;
pub use dimension::LabeledDimension;
pub use dimension::LinearDimension;
pub use dimension::PhaseCorrection;
pub use dimension::Quantitative;
pub use dimension::QuantitativeConfig;
pub use dimension::SamplingType;

pub use errors::Error;
pub use errors::Result;

pub use range::LinearRange;

pub use units::Dimensionality;
pub use units::ScalarQuantity;
pub use units::Unit;
