//! Dimensions, the coordinate axes of a scientific dataset.
//!
//! A [`Dimension`] is built from a [`DimensionConfig`] (or the equivalent JSON object) and is one
//! of three kinds: linearly sampled, arbitrarily sampled or labeled. The first two have physical
//! units and a reciprocal, the Fourier conjugate of the dimension.

mod arbitrary;
pub(crate) mod config;
mod labeled;
mod linear;
mod quantitative;

use ndarray::{s, Array1};
use paste::paste;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    errors::{Error, Result},
    units::{ScalarQuantity, Unit},
};

pub use arbitrary::ArbitraryDimension;
pub use config::{DimensionConfig, QuantitativeConfig, SamplingType};
pub use labeled::LabeledDimension;
pub use linear::{LinearDimension, PhaseCorrection};
pub use quantitative::Quantitative;

use config::VariantConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Dimension {
    kind: DimensionKind,
    reverse: bool,
    sampling_type: SamplingType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DimensionKind {
    Linear(LinearDimension),
    Arbitrary(ArbitraryDimension),
    Labeled(LabeledDimension),
}

/// Coordinates along a dimension: numbers in the dimension's unit, or labels.
#[derive(Clone, Debug, PartialEq)]
pub enum Coordinates {
    Quantities(Array1<f64>),
    Labels(Vec<Value>),
}

impl Coordinates {
    pub fn len(&self) -> usize {
        match self {
            Coordinates::Quantities(values) => values.len(),
            Coordinates::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn quantities(&self) -> Option<&Array1<f64>> {
        match self {
            Coordinates::Quantities(values) => Some(values),
            Coordinates::Labels(_) => None,
        }
    }

    pub fn labels(&self) -> Option<&[Value]> {
        match self {
            Coordinates::Quantities(_) => None,
            Coordinates::Labels(labels) => Some(labels),
        }
    }
}

/// Generate getters and setters for a quantity attribute of the dimension and of its reciprocal.
macro_rules! quantity_attributes {
    ($($name:ident),*) => {
        paste! {
            $(
                pub fn $name(&self) -> Result<&ScalarQuantity> {
                    Ok(self.fields(stringify!($name))?.$name())
                }

                pub fn [<set_ $name>](&mut self, value: &str) -> Result<()> {
                    self.fields_mut(stringify!($name))?.[<set_ $name>](value)
                }

                pub fn [<reciprocal_ $name>](&self) -> Result<&ScalarQuantity> {
                    Ok(self.reciprocal(concat!("reciprocal_", stringify!($name)))?.$name())
                }

                pub fn [<set_reciprocal_ $name>](&mut self, value: &str) -> Result<()> {
                    self.reciprocal_mut(concat!("reciprocal_", stringify!($name)))?
                        .[<set_ $name>](value)
                }
            )*
        }
    };
}

/// Same as `quantity_attributes` for free text attributes, which labeled dimensions have too.
macro_rules! text_attributes {
    ($($name:ident),*) => {
        paste! {
            $(
                pub fn $name(&self) -> &str {
                    match &self.kind {
                        DimensionKind::Linear(dimension) => dimension.fields().$name(),
                        DimensionKind::Arbitrary(dimension) => dimension.fields().$name(),
                        DimensionKind::Labeled(dimension) => dimension.$name(),
                    }
                }

                pub fn [<set_ $name>]<S: Into<String>>(&mut self, value: S) {
                    match &mut self.kind {
                        DimensionKind::Linear(dimension) => {
                            dimension.fields_mut().[<set_ $name>](value)
                        }
                        DimensionKind::Arbitrary(dimension) => {
                            dimension.fields_mut().[<set_ $name>](value)
                        }
                        DimensionKind::Labeled(dimension) => dimension.[<set_ $name>](value),
                    }
                }

                pub fn [<reciprocal_ $name>](&self) -> Result<&str> {
                    Ok(self.reciprocal(concat!("reciprocal_", stringify!($name)))?.$name())
                }

                pub fn [<set_reciprocal_ $name>]<S: Into<String>>(&mut self, value: S) -> Result<()> {
                    self.reciprocal_mut(concat!("reciprocal_", stringify!($name)))?
                        .[<set_ $name>](value);

                    Ok(())
                }
            )*
        }
    };
}

impl Dimension {
    pub fn new(config: DimensionConfig) -> Result<Self> {
        let reverse = config.reverse;
        let sampling_type = config.sampling_type;
        let kind = match config.variant()? {
            VariantConfig::Linear(config) => DimensionKind::Linear(LinearDimension::new(config)?),
            VariantConfig::Arbitrary(config) => {
                DimensionKind::Arbitrary(ArbitraryDimension::new(config)?)
            }
            VariantConfig::Labeled(config) => {
                DimensionKind::Labeled(LabeledDimension::new(config)?)
            }
        };

        let dimension = Self {
            kind,
            reverse,
            sampling_type,
        };
        debug!(
            kind = dimension.type_name(),
            count = dimension.count(),
            "created dimension"
        );

        Ok(dimension)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Self::new(DimensionConfig::try_from(value)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn kind(&self) -> &DimensionKind {
        &self.kind
    }

    /// "linear", "arbitrary" or "labeled"
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            DimensionKind::Linear(_) => "linear",
            DimensionKind::Arbitrary(_) => "arbitrary",
            DimensionKind::Labeled(_) => "labeled",
        }
    }

    pub fn is_quantitative(&self) -> bool {
        !matches!(self.kind, DimensionKind::Labeled(_))
    }

    pub fn count(&self) -> usize {
        match &self.kind {
            DimensionKind::Linear(dimension) => dimension.count(),
            DimensionKind::Arbitrary(dimension) => dimension.count(),
            DimensionKind::Labeled(dimension) => dimension.count(),
        }
    }

    /// Change the number of points. Linear dimensions grow or shrink, the others can only be
    /// truncated.
    ///
    pub fn set_count(&mut self, count: usize) -> Result<()> {
        match &mut self.kind {
            DimensionKind::Linear(dimension) => dimension.set_count(count),
            DimensionKind::Arbitrary(dimension) => dimension.set_count(count),
            DimensionKind::Labeled(dimension) => dimension.set_count(count),
        }
    }

    pub fn increment(&self) -> Result<&ScalarQuantity> {
        Ok(self.linear("increment")?.increment())
    }

    pub fn set_increment(&mut self, value: &str) -> Result<()> {
        self.linear_mut("increment")?.set_increment(value)
    }

    pub fn fft_output_order(&self) -> Result<bool> {
        Ok(self.linear("fft_output_order")?.fft_output_order())
    }

    pub fn set_fft_output_order(&mut self, fft_output_order: bool) -> Result<()> {
        self.linear_mut("fft_output_order")?
            .set_fft_output_order(fft_output_order);

        Ok(())
    }

    /// Quantity strings for arbitrary dimensions, labels for labeled ones.
    pub fn values(&self) -> Result<Vec<Value>> {
        match &self.kind {
            DimensionKind::Linear(_) => Err(self.no_attribute("values")),
            DimensionKind::Arbitrary(dimension) => Ok(dimension
                .values()
                .iter()
                .map(|value| Value::String(value.to_string()))
                .collect()),
            DimensionKind::Labeled(dimension) => Ok(dimension.values().to_vec()),
        }
    }

    pub fn set_values(&mut self, values: Vec<Value>) -> Result<()> {
        match &mut self.kind {
            DimensionKind::Linear(_) => Err(Error::Attribute {
                kind: "linear",
                attribute: "values",
            }),
            DimensionKind::Arbitrary(dimension) => {
                let values = values
                    .into_iter()
                    .map(|value| config::quantity_string("values", value))
                    .collect::<Result<Vec<_>>>()?;
                dimension.set_values(&values)
            }
            DimensionKind::Labeled(dimension) => dimension.set_values(values),
        }
    }

    quantity_attributes!(reference_offset, origin_offset, period);

    text_attributes!(label, description);

    /// Metadata that applications attach to the dimension, carried along but never interpreted.
    pub fn application(&self) -> &Map<String, Value> {
        match &self.kind {
            DimensionKind::Linear(dimension) => dimension.fields().application(),
            DimensionKind::Arbitrary(dimension) => dimension.fields().application(),
            DimensionKind::Labeled(dimension) => dimension.application(),
        }
    }

    pub fn set_application(&mut self, application: Map<String, Value>) {
        match &mut self.kind {
            DimensionKind::Linear(dimension) => dimension.fields_mut().set_application(application),
            DimensionKind::Arbitrary(dimension) => {
                dimension.fields_mut().set_application(application)
            }
            DimensionKind::Labeled(dimension) => dimension.set_application(application),
        }
    }

    pub fn reciprocal_application(&self) -> Result<&Map<String, Value>> {
        Ok(self.reciprocal("reciprocal_application")?.application())
    }

    pub fn set_reciprocal_application(&mut self, application: Map<String, Value>) -> Result<()> {
        self.reciprocal_mut("reciprocal_application")?
            .set_application(application);

        Ok(())
    }

    pub fn quantity_kind(&self) -> Result<&str> {
        Ok(self.fields("quantity_kind")?.quantity_kind())
    }

    /// Always fails. The quantity kind follows from the unit.
    pub fn set_quantity_kind(&mut self, value: &str) -> Result<()> {
        self.fields_mut("quantity_kind")?.set_quantity_kind(value)
    }

    pub fn reciprocal_quantity_kind(&self) -> Result<&str> {
        Ok(self.reciprocal("reciprocal_quantity_kind")?.quantity_kind())
    }

    /// The unit coordinates are reported in.
    pub fn unit(&self) -> Result<&Unit> {
        Ok(self.fields("unit")?.display_unit())
    }

    pub fn reciprocal_unit(&self) -> Result<&Unit> {
        Ok(self.reciprocal("reciprocal_unit")?.display_unit())
    }

    pub fn convert_unit(&mut self, unit: &str) -> Result<()> {
        match &mut self.kind {
            DimensionKind::Linear(dimension) => dimension.convert_unit(unit),
            DimensionKind::Arbitrary(dimension) => dimension.convert_unit(unit),
            DimensionKind::Labeled(_) => Err(Error::Attribute {
                kind: "labeled",
                attribute: "unit",
            }),
        }
    }

    pub fn convert_reciprocal_unit(&mut self, unit: &str) -> Result<()> {
        self.reciprocal_mut("reciprocal_unit")?.convert_unit(unit)
    }

    pub fn made_dimensionless(&self) -> Result<bool> {
        Ok(self.fields("made_dimensionless")?.made_dimensionless())
    }

    /// Report coordinates as ratios to the origin offset, which must not be zero.
    pub fn set_made_dimensionless(&mut self, made_dimensionless: bool) -> Result<()> {
        self.fields_mut("made_dimensionless")?
            .set_made_dimensionless(made_dimensionless)
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Report coordinates in reverse order. The stored values are left alone.
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    pub fn sampling_type(&self) -> SamplingType {
        self.sampling_type
    }

    pub fn set_sampling_type(&mut self, sampling_type: SamplingType) {
        self.sampling_type = sampling_type;
    }

    pub fn coordinates(&self) -> Coordinates {
        match &self.kind {
            DimensionKind::Linear(dimension) => {
                Coordinates::Quantities(self.oriented(dimension.coordinates()))
            }
            DimensionKind::Arbitrary(dimension) => {
                Coordinates::Quantities(self.oriented(dimension.coordinates()))
            }
            DimensionKind::Labeled(dimension) => {
                let labels = dimension.values().iter().cloned();
                if self.reverse {
                    Coordinates::Labels(labels.rev().collect())
                } else {
                    Coordinates::Labels(labels.collect())
                }
            }
        }
    }

    pub fn absolute_coordinates(&self) -> Result<Array1<f64>> {
        match &self.kind {
            DimensionKind::Linear(dimension) => Ok(self.oriented(dimension.absolute_coordinates())),
            DimensionKind::Arbitrary(dimension) => {
                Ok(self.oriented(dimension.absolute_coordinates()))
            }
            DimensionKind::Labeled(_) => Err(self.no_attribute("absolute_coordinates")),
        }
    }

    /// The coordinates the dimension will have after a Fourier transform.
    pub fn reciprocal_coordinates(&self) -> Result<Array1<f64>> {
        Ok(self.linear("reciprocal_coordinates")?.reciprocal_coordinates())
    }

    pub fn reciprocal_absolute_coordinates(&self) -> Result<Array1<f64>> {
        Ok(self
            .linear("reciprocal_absolute_coordinates")?
            .reciprocal_absolute_coordinates())
    }

    pub fn reciprocal_increment(&self) -> Result<ScalarQuantity> {
        Ok(self.linear("reciprocal_increment")?.reciprocal_increment())
    }

    /// Exchange the attributes of a linear dimension with those of its reciprocal.
    ///
    /// The increment becomes the reciprocal increment `1 / (count * increment)`. Swapping twice
    /// gives back every attribute exactly, except the increment, which comes back up to floating
    /// point rounding.
    ///
    pub fn swap(&mut self) -> Result<()> {
        match &mut self.kind {
            DimensionKind::Linear(dimension) => {
                dimension.swap();
                Ok(())
            }
            _ => Err(self.unsupported("swap")),
        }
    }

    /// Turn a grid sampled linear dimension into its Fourier conjugate.
    ///
    /// The returned phase correction accounts for the reference offset of the dimension before
    /// the transform and is meant for whoever transforms the data sampled along it.
    ///
    pub fn fourier_transform(&mut self) -> Result<PhaseCorrection> {
        if self.sampling_type != SamplingType::Grid {
            return Err(Error::UnsupportedOperation {
                operation: "fourier_transform",
                kind: "scan sampled",
            });
        }

        match &mut self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension.fourier_transform()),
            _ => Err(self.unsupported("fourier_transform")),
        }
    }

    /// A label for plot axes, eg "frequency / (Hz)".
    pub fn axis_label(&self) -> String {
        match self.fields("axis_label") {
            Ok(fields) => {
                let name = match fields.label().trim() {
                    "" => fields.quantity_kind(),
                    label => label,
                };
                let unit = fields.display_unit().to_string();
                if unit.is_empty() {
                    name.to_string()
                } else {
                    format!("{name} / ({unit})")
                }
            }
            Err(_) => self.label().to_string(),
        }
    }

    /// The non-default attributes of the dimension. Building a dimension from the result gives
    /// back an equal dimension.
    ///
    pub fn to_dictionary(&self) -> Map<String, Value> {
        let mut map = match &self.kind {
            DimensionKind::Linear(dimension) => dimension.to_dictionary(),
            DimensionKind::Arbitrary(dimension) => dimension.to_dictionary(),
            DimensionKind::Labeled(dimension) => dimension.to_dictionary(),
        };
        if self.reverse {
            map.insert("reverse".into(), true.into());
        }
        if self.sampling_type != SamplingType::Grid {
            map.insert("sampling_type".into(), self.sampling_type.as_str().into());
        }

        map
    }

    /// `to_dictionary` as pretty printed JSON.
    pub fn data_structure(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Value::Object(self.to_dictionary()))?)
    }

    fn oriented(&self, coordinates: Array1<f64>) -> Array1<f64> {
        if self.reverse {
            coordinates.slice(s![..;-1]).to_owned()
        } else {
            coordinates
        }
    }

    fn no_attribute(&self, attribute: &'static str) -> Error {
        Error::Attribute {
            kind: self.type_name(),
            attribute,
        }
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::UnsupportedOperation {
            operation,
            kind: self.type_name(),
        }
    }

    fn linear(&self, attribute: &'static str) -> Result<&LinearDimension> {
        match &self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension),
            _ => Err(self.no_attribute(attribute)),
        }
    }

    fn linear_mut(&mut self, attribute: &'static str) -> Result<&mut LinearDimension> {
        let kind = self.type_name();
        match &mut self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension),
            _ => Err(Error::Attribute { kind, attribute }),
        }
    }

    fn fields(&self, attribute: &'static str) -> Result<&Quantitative> {
        match &self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension.fields()),
            DimensionKind::Arbitrary(dimension) => Ok(dimension.fields()),
            DimensionKind::Labeled(_) => Err(self.no_attribute(attribute)),
        }
    }

    fn fields_mut(&mut self, attribute: &'static str) -> Result<&mut Quantitative> {
        match &mut self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension.fields_mut()),
            DimensionKind::Arbitrary(dimension) => Ok(dimension.fields_mut()),
            DimensionKind::Labeled(_) => Err(Error::Attribute {
                kind: "labeled",
                attribute,
            }),
        }
    }

    fn reciprocal(&self, attribute: &'static str) -> Result<&Quantitative> {
        match &self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension.reciprocal()),
            DimensionKind::Arbitrary(dimension) => Ok(dimension.reciprocal()),
            DimensionKind::Labeled(_) => Err(self.no_attribute(attribute)),
        }
    }

    fn reciprocal_mut(&mut self, attribute: &'static str) -> Result<&mut Quantitative> {
        match &mut self.kind {
            DimensionKind::Linear(dimension) => Ok(dimension.reciprocal_mut()),
            DimensionKind::Arbitrary(dimension) => Ok(dimension.reciprocal_mut()),
            DimensionKind::Labeled(_) => Err(Error::Attribute {
                kind: "labeled",
                attribute,
            }),
        }
    }
}

impl TryFrom<Value> for Dimension {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
