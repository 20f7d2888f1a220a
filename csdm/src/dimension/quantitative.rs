use ndarray::Array1;
use serde_json::{Map, Value};
use tracing::warn;

use super::config::QuantitativeConfig;
use crate::{
    errors::{Error, Result},
    helpers,
    units::{ScalarQuantity, Unit},
};

/// The attributes every dimension with physical units has, and that its reciprocal has as well.
///
/// Offsets and the period are always kept in `unit`, so converting the unit converts them too.
///
/// When the dimension is made dimensionless, coordinates are reported as the ratio of the
/// coordinate to the origin offset, in `ratio_unit` (a plain ratio or eg "ppm"). The origin offset
/// is added to form absolute coordinates and divides coordinates to form ratios. The reference
/// offset is only ever subtracted.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Quantitative {
    unit: Unit,
    ratio_unit: Option<Unit>,
    reference_offset: ScalarQuantity,
    origin_offset: ScalarQuantity,
    period: ScalarQuantity,
    quantity_kind: String,
    label: String,
    description: String,
    application: Map<String, Value>,
}

impl Quantitative {
    pub(crate) fn new(unit: Unit) -> Self {
        Self {
            reference_offset: ScalarQuantity::zero(&unit),
            origin_offset: ScalarQuantity::zero(&unit),
            period: ScalarQuantity::infinity(&unit),
            quantity_kind: unit.quantity_kind().to_string(),
            label: String::new(),
            description: String::new(),
            application: Map::new(),
            ratio_unit: None,
            unit,
        }
    }

    pub(crate) fn from_config(unit: Unit, config: &QuantitativeConfig) -> Result<Self> {
        let mut fields = Self::new(unit);
        if let Some(quantity_kind) = &config.quantity_kind {
            fields.check_quantity_kind(quantity_kind)?;
        }
        if let Some(reference_offset) = &config.reference_offset {
            fields.set_reference_offset(reference_offset)?;
        }
        if let Some(origin_offset) = &config.origin_offset {
            fields.set_origin_offset(origin_offset)?;
        }
        if let Some(period) = &config.period {
            fields.set_period(period)?;
        }
        if let Some(label) = &config.label {
            fields.label = label.clone();
        }
        if let Some(description) = &config.description {
            fields.description = description.clone();
        }
        if let Some(application) = &config.application {
            fields.application = application.clone();
        }
        if let Some(made_dimensionless) = config.made_dimensionless {
            fields.set_made_dimensionless(made_dimensionless)?;
        }

        Ok(fields)
    }

    /// The unit coordinates are computed in.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// The unit coordinates are reported in. Differs from `unit` only for dimensionless ratios.
    pub fn display_unit(&self) -> &Unit {
        self.ratio_unit.as_ref().unwrap_or(&self.unit)
    }

    pub fn reference_offset(&self) -> &ScalarQuantity {
        &self.reference_offset
    }

    pub fn origin_offset(&self) -> &ScalarQuantity {
        &self.origin_offset
    }

    pub fn period(&self) -> &ScalarQuantity {
        &self.period
    }

    pub fn quantity_kind(&self) -> &str {
        &self.quantity_kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free form metadata, keyed by the application that wrote it.
    pub fn application(&self) -> &Map<String, Value> {
        &self.application
    }

    pub fn made_dimensionless(&self) -> bool {
        self.ratio_unit.is_some()
    }

    pub(crate) fn set_reference_offset(&mut self, value: &str) -> Result<()> {
        self.reference_offset = self.parse_consistent("reference_offset", value)?;

        Ok(())
    }

    pub(crate) fn set_origin_offset(&mut self, value: &str) -> Result<()> {
        let origin_offset = self.parse_consistent("origin_offset", value)?;
        if self.made_dimensionless() && origin_offset.is_zero() {
            return Err(zero_origin());
        }
        self.origin_offset = origin_offset;

        Ok(())
    }

    /// Set the period from a quantity string or one of the infinity sentinels. A zero period
    /// means the dimension isn't periodic.
    ///
    pub(crate) fn set_period(&mut self, value: &str) -> Result<()> {
        if helpers::is_infinity_sentinel(value) {
            self.period = ScalarQuantity::infinity(&self.unit);
            return Ok(());
        }

        let period = self.parse_consistent("period", value)?;
        if period.value() < 0.0 {
            return Err(Error::value("period", "the period must not be negative"));
        }
        self.period = if period.is_zero() {
            ScalarQuantity::infinity(&self.unit)
        } else {
            period
        };

        Ok(())
    }

    pub(crate) fn set_quantity_kind(&mut self, _value: &str) -> Result<()> {
        Err(Error::NotImplemented {
            attribute: "quantity_kind",
        })
    }

    pub(crate) fn set_label<S: Into<String>>(&mut self, label: S) {
        self.label = label.into();
    }

    pub(crate) fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = description.into();
    }

    pub(crate) fn set_application(&mut self, application: Map<String, Value>) {
        self.application = application;
    }

    pub(crate) fn set_made_dimensionless(&mut self, made_dimensionless: bool) -> Result<()> {
        if !made_dimensionless {
            self.ratio_unit = None;
            Ok(())
        } else if self.ratio_unit.is_none() {
            self.make_ratio(Unit::dimensionless())
        } else {
            Ok(())
        }
    }

    /// Express the dimension in `unit`.
    ///
    /// A dimensionless ratio unit such as "ppm" given for a dimension with physical units turns
    /// the dimension into a ratio to its origin offset. Converting back to a physical unit turns
    /// the ratio off again.
    ///
    pub(crate) fn convert_unit(&mut self, unit: &str) -> Result<()> {
        let target = Unit::parse(unit)?;
        if self.unit.is_consistent(&target) {
            for quantity in [
                &mut self.reference_offset,
                &mut self.origin_offset,
                &mut self.period,
            ] {
                if let Some(converted) = quantity.converted(&target) {
                    *quantity = converted;
                }
            }
            self.unit = target;
            self.ratio_unit = None;

            Ok(())
        } else if target.is_dimensionless() {
            self.make_ratio(target)
        } else {
            Err(Error::Dimensionality {
                field: String::from("unit"),
                expected: describe(&self.unit),
                found: describe(&target),
            })
        }
    }

    /// Coordinates relative to the reference offset, from raw coordinates in `unit`.
    pub(crate) fn reference_coordinates(&self, raw: &Array1<f64>) -> Array1<f64> {
        self.as_ratio(raw - self.reference_offset.value())
    }

    pub(crate) fn absolute_coordinates(&self, raw: &Array1<f64>) -> Array1<f64> {
        self.as_ratio(raw - self.reference_offset.value() + self.origin_offset.value())
    }

    /// Parse `value` and express it in the dimension's unit.
    pub(crate) fn parse_consistent(&self, field: &str, value: &str) -> Result<ScalarQuantity> {
        let quantity = ScalarQuantity::parse(value)?;

        quantity
            .converted(&self.unit)
            .ok_or_else(|| Error::Dimensionality {
                field: field.to_string(),
                expected: describe(&self.unit),
                found: describe(quantity.unit()),
            })
    }

    /// The non-default attributes, in the form the configuration reads them.
    pub(crate) fn to_dictionary(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if !self.description.trim().is_empty() {
            map.insert("description".into(), self.description.clone().into());
        }
        if !self.reference_offset.is_zero() {
            map.insert("reference_offset".into(), self.reference_offset.to_string().into());
        }
        if !self.origin_offset.is_zero() {
            map.insert("origin_offset".into(), self.origin_offset.to_string().into());
        }
        if !matches!(self.quantity_kind.as_str(), "unknown" | "dimensionless") {
            map.insert("quantity_kind".into(), self.quantity_kind.clone().into());
        }
        if !(self.period.is_infinite() || self.period.is_zero()) {
            map.insert("period".into(), self.period.to_string().into());
        }
        if !self.label.trim().is_empty() {
            map.insert("label".into(), self.label.clone().into());
        }
        if self.made_dimensionless() {
            map.insert("made_dimensionless".into(), true.into());
        }
        if !self.application.is_empty() {
            map.insert("application".into(), self.application.clone().into());
        }

        map
    }

    fn check_quantity_kind(&mut self, quantity_kind: &str) -> Result<()> {
        let expected = self.unit.quantity_kind();
        if quantity_kind == expected {
            Ok(())
        } else if expected == "unknown" {
            warn!(
                quantity_kind,
                unit = %self.unit,
                "can't verify the quantity kind for this unit, keeping it as given"
            );
            self.quantity_kind = quantity_kind.to_string();
            Ok(())
        } else {
            Err(Error::Dimensionality {
                field: String::from("quantity_kind"),
                expected: expected.to_string(),
                found: quantity_kind.to_string(),
            })
        }
    }

    fn make_ratio(&mut self, ratio_unit: Unit) -> Result<()> {
        if self.origin_offset.is_zero() {
            return Err(zero_origin());
        }
        self.ratio_unit = Some(ratio_unit);

        Ok(())
    }

    fn as_ratio(&self, coordinates: Array1<f64>) -> Array1<f64> {
        match &self.ratio_unit {
            Some(ratio_unit) => coordinates / (self.origin_offset.value() * ratio_unit.scale()),
            None => coordinates,
        }
    }
}

fn zero_origin() -> Error {
    Error::value(
        "origin_offset",
        "a dimensionless ratio requires a non-zero origin offset",
    )
}

fn describe(unit: &Unit) -> String {
    match unit.to_string() {
        unit if unit.is_empty() => String::from("dimensionless"),
        unit => unit,
    }
}
