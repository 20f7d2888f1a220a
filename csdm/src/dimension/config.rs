use paste::paste;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::{Error, Result};

/// How the coordinates of a dimension were sampled.
///
/// Only grid sampled dimensions have a Fourier conjugate.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingType {
    #[default]
    Grid,
    Scan,
}

impl SamplingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingType::Grid => "grid",
            SamplingType::Scan => "scan",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "grid" => Ok(SamplingType::Grid),
            "scan" => Ok(SamplingType::Scan),
            _ => Err(Error::value(
                "sampling_type",
                format!("expecting 'grid' or 'scan', got '{value}'"),
            )),
        }
    }
}

/// Settings shared by a quantitative dimension and its reciprocal.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuantitativeConfig {
    pub reference_offset: Option<String>,
    pub origin_offset: Option<String>,
    pub period: Option<String>,
    pub quantity_kind: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub made_dimensionless: Option<bool>,
    pub application: Option<Map<String, Value>>,
}

/// Configuration of a dimension, as read from a JSON object or put together with the builder
/// methods.
///
/// Nothing is validated beyond the types of the individual keys until [`DimensionConfig::variant`]
/// decides which kind of dimension the keys describe.
///
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct DimensionConfig {
    pub sampling_type: SamplingType,
    pub non_quantitative: bool,
    pub count: Option<usize>,
    pub increment: Option<String>,
    pub values: Option<Vec<Value>>,
    pub reverse: bool,
    pub fft_output_order: bool,
    pub fields: QuantitativeConfig,
    pub reciprocal: QuantitativeConfig,
}

/// A configuration that has been checked to describe exactly one kind of dimension.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum VariantConfig {
    Linear(LinearConfig),
    Arbitrary(ArbitraryConfig),
    Labeled(LabeledConfig),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinearConfig {
    pub count: usize,
    pub increment: String,
    pub fft_output_order: bool,
    pub fields: QuantitativeConfig,
    pub reciprocal: QuantitativeConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ArbitraryConfig {
    pub values: Vec<String>,
    pub fields: QuantitativeConfig,
    pub reciprocal: QuantitativeConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LabeledConfig {
    pub values: Vec<Value>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub application: Option<Map<String, Value>>,
}

macro_rules! quantitative_setters {
    ($($name:ident: $type:ty;)*) => {
        paste! {
            impl QuantitativeConfig {
                $(
                    pub fn $name<T: Into<$type>>(mut self, value: T) -> Self {
                        self.$name = Some(value.into());
                        self
                    }
                )*
            }

            impl DimensionConfig {
                $(
                    pub fn $name<T: Into<$type>>(mut self, value: T) -> Self {
                        self.fields.$name = Some(value.into());
                        self
                    }

                    pub fn [<reciprocal_ $name>]<T: Into<$type>>(mut self, value: T) -> Self {
                        self.reciprocal.$name = Some(value.into());
                        self
                    }
                )*
            }
        }
    };
}

quantitative_setters! {
    reference_offset: String;
    origin_offset: String;
    period: String;
    quantity_kind: String;
    label: String;
    description: String;
    made_dimensionless: bool;
    application: Map<String, Value>;
}

impl DimensionConfig {
    /// A linearly sampled dimension, eg `DimensionConfig::linear(10, "0.1 s")`.
    pub fn linear<S: Into<String>>(count: usize, increment: S) -> Self {
        Self {
            count: Some(count),
            increment: Some(increment.into()),
            ..Self::default()
        }
    }

    /// An arbitrarily sampled dimension from quantity strings, eg `["1 m", "4 m", "9 m"]`.
    pub fn arbitrary<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: Some(values.into_iter().map(|v| Value::String(v.into())).collect()),
            ..Self::default()
        }
    }

    /// A labeled dimension over arbitrary JSON values.
    pub fn labeled<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            non_quantitative: true,
            values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn sampling_type(mut self, sampling_type: SamplingType) -> Self {
        self.sampling_type = sampling_type;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn fft_output_order(mut self, fft_output_order: bool) -> Self {
        self.fft_output_order = fft_output_order;
        self
    }

    pub fn reciprocal(mut self, reciprocal: QuantitativeConfig) -> Self {
        self.reciprocal = reciprocal;
        self
    }

    /// Decide which kind of dimension this configuration describes.
    ///
    /// `non_quantitative` takes precedence and requires `values`. Otherwise `count` together
    /// with `increment` make a linear dimension, and `values` alone an arbitrary one.
    ///
    pub(crate) fn variant(self) -> Result<VariantConfig> {
        if self.non_quantitative {
            let values = self.values.ok_or_else(|| {
                Error::Configuration(String::from(
                    "a non-quantitative dimension requires 'values'",
                ))
            })?;

            return Ok(VariantConfig::Labeled(LabeledConfig {
                values,
                label: self.fields.label,
                description: self.fields.description,
                application: self.fields.application,
            }));
        }

        match (self.count, self.increment, self.values) {
            (Some(count), Some(increment), _) => Ok(VariantConfig::Linear(LinearConfig {
                count,
                increment,
                fft_output_order: self.fft_output_order,
                fields: self.fields,
                reciprocal: self.reciprocal,
            })),
            (_, _, Some(values)) => {
                let values = values
                    .into_iter()
                    .map(|value| quantity_string("values", value))
                    .collect::<Result<Vec<_>>>()?;

                Ok(VariantConfig::Arbitrary(ArbitraryConfig {
                    values,
                    fields: self.fields,
                    reciprocal: self.reciprocal,
                }))
            }
            _ => Err(Error::Configuration(String::from(
                "either count+increment or values is required",
            ))),
        }
    }
}

impl TryFrom<Value> for DimensionConfig {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let object = as_object("dimension", &value)?;
        let sampling_type = match get_string(object, "sampling_type")? {
            Some(sampling_type) => SamplingType::parse(&sampling_type)?,
            None => SamplingType::default(),
        };
        let reciprocal = match object.get("reciprocal") {
            Some(reciprocal) => quantitative(as_object("reciprocal", reciprocal)?)?,
            None => QuantitativeConfig::default(),
        };

        Ok(Self {
            sampling_type,
            non_quantitative: get_bool(object, "non_quantitative")?.unwrap_or(false),
            count: get_count(object)?,
            increment: object
                .get("increment")
                .cloned()
                .map(|increment| quantity_string("increment", increment))
                .transpose()?,
            values: match object.get("values") {
                Some(Value::Array(values)) => Some(values.clone()),
                Some(other) => return Err(type_error("values", "list", other)),
                None => None,
            },
            reverse: get_bool(object, "reverse")?.unwrap_or(false),
            fft_output_order: get_bool(object, "fft_output_order")?.unwrap_or(false),
            fields: quantitative(object)?,
            reciprocal,
        })
    }
}

fn quantitative(object: &Map<String, Value>) -> Result<QuantitativeConfig> {
    Ok(QuantitativeConfig {
        reference_offset: get_string(object, "reference_offset")?,
        origin_offset: get_string(object, "origin_offset")?,
        period: get_string(object, "period")?,
        quantity_kind: get_string(object, "quantity_kind")?,
        label: get_string(object, "label")?,
        description: get_string(object, "description")?,
        made_dimensionless: get_bool(object, "made_dimensionless")?,
        application: match object.get("application") {
            Some(application) => Some(as_object("application", application)?.clone()),
            None => None,
        },
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn type_error(field: &str, expected: &'static str, found: &Value) -> Error {
    Error::Type {
        field: field.to_string(),
        expected,
        found: json_type(found).to_string(),
    }
}

fn as_object<'a>(field: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| type_error(field, "dict", value))
}

fn get_string(object: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(type_error(field, "str", other)),
        None => Ok(None),
    }
}

fn get_bool(object: &Map<String, Value>, field: &str) -> Result<Option<bool>> {
    match object.get(field) {
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(type_error(field, "bool", other)),
        None => Ok(None),
    }
}

fn get_count(object: &Map<String, Value>) -> Result<Option<usize>> {
    match object.get("count") {
        Some(Value::Number(number)) => match number.as_u64() {
            Some(count) => Ok(Some(count as usize)),
            None => Err(Error::value(
                "count",
                format!("expecting a positive integer, got {number}"),
            )),
        },
        Some(other) => Err(type_error("count", "int", other)),
        None => Ok(None),
    }
}

/// Quantity strings may also be given as bare numbers, which are dimensionless.
pub(crate) fn quantity_string(field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(value) => Ok(value),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(type_error(field, "str", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn parse(value: Value) -> Result<VariantConfig> {
        DimensionConfig::try_from(value)?.variant()
    }

    #[test]
    fn test_select_linear() -> Result<()> {
        let variant = parse(json!({
            "type": "linear",
            "count": 10,
            "increment": "0.1 s",
            "reference_offset": "1 s",
            "fft_output_order": true,
            "reciprocal": {"label": "frequency"},
            "unrecognized": [1, 2, 3],
        }))?;

        let expected = LinearConfig {
            count: 10,
            increment: String::from("0.1 s"),
            fft_output_order: true,
            fields: QuantitativeConfig::default().reference_offset("1 s"),
            reciprocal: QuantitativeConfig::default().label("frequency"),
        };
        assert_eq!(variant, VariantConfig::Linear(expected));

        Ok(())
    }

    #[test]
    fn test_select_linear_over_values() -> Result<()> {
        let variant = parse(json!({"count": 3, "increment": 2, "values": ["1 m"]}))?;
        assert!(matches!(
            variant,
            VariantConfig::Linear(LinearConfig { count: 3, ref increment, .. }) if increment == "2"
        ));

        Ok(())
    }

    #[test]
    fn test_select_arbitrary() -> Result<()> {
        let variant = parse(json!({"values": ["1 m", "2 m", 5], "label": "distance"}))?;
        let expected = ArbitraryConfig {
            values: vec![String::from("1 m"), String::from("2 m"), String::from("5")],
            fields: QuantitativeConfig::default().label("distance"),
            reciprocal: QuantitativeConfig::default(),
        };
        assert_eq!(variant, VariantConfig::Arbitrary(expected));

        // Only count, no increment
        let variant = parse(json!({"count": 3, "values": ["1 m"]}))?;
        assert!(matches!(variant, VariantConfig::Arbitrary(_)));

        Ok(())
    }

    #[test]
    fn test_select_labeled() -> Result<()> {
        let variant = parse(json!({
            "non_quantitative": true,
            "count": 2,
            "increment": "1 s",
            "values": ["a", 2],
            "label": "things",
        }))?;
        let expected = LabeledConfig {
            values: vec![json!("a"), json!(2)],
            label: Some(String::from("things")),
            description: None,
            application: None,
        };
        assert_eq!(variant, VariantConfig::Labeled(expected));

        Ok(())
    }

    #[test]
    fn test_select_nothing() {
        assert!(matches!(parse(json!({"count": 10})), Err(Error::Configuration(_))));
        assert!(matches!(parse(json!({})), Err(Error::Configuration(_))));
        assert!(matches!(
            parse(json!({"non_quantitative": true, "count": 2, "increment": "1 s"})),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_type_errors() {
        assert!(matches!(
            parse(json!({"count": 2, "increment": "1 s", "reverse": "yes"})),
            Err(Error::Type { field, expected: "bool", found }) if field == "reverse" && found == "str"
        ));
        assert!(matches!(
            parse(json!({"count": "2", "increment": "1 s"})),
            Err(Error::Type { expected: "int", .. })
        ));
        assert!(matches!(
            parse(json!({"values": "1 m"})),
            Err(Error::Type { expected: "list", .. })
        ));
        assert!(matches!(
            parse(json!({"values": ["1 m", true]})),
            Err(Error::Type { expected: "str", .. })
        ));
        assert!(matches!(
            parse(json!({"values": ["1 m"], "reciprocal": "none"})),
            Err(Error::Type { expected: "dict", .. })
        ));
        assert!(matches!(
            parse(json!({"values": ["1 m"], "application": ["com.example"]})),
            Err(Error::Type { field, expected: "dict", .. }) if field == "application"
        ));
        assert!(matches!(parse(json!([1, 2])), Err(Error::Type { .. })));
    }

    #[test]
    fn test_value_errors() {
        assert!(matches!(
            parse(json!({"count": 2.5, "increment": "1 s"})),
            Err(Error::Value { .. })
        ));
        assert!(matches!(
            parse(json!({"count": -1, "increment": "1 s"})),
            Err(Error::Value { .. })
        ));
        assert!(matches!(
            parse(json!({"count": 2, "increment": "1 s", "sampling_type": "random"})),
            Err(Error::Value { .. })
        ));
    }

    #[test]
    fn test_sampling_type() -> Result<()> {
        let config = DimensionConfig::try_from(json!({"values": ["1 m"], "sampling_type": "scan"}))?;
        assert_eq!(config.sampling_type, SamplingType::Scan);
        assert_eq!(config.sampling_type.as_str(), "scan");
        assert_eq!(SamplingType::default(), SamplingType::Grid);

        Ok(())
    }

    #[test]
    fn test_builder() -> Result<()> {
        let mut application = Map::new();
        application.insert("com.example".into(), json!({"window": "hann"}));
        let config = DimensionConfig::linear(10, "1 s")
            .origin_offset("5 s")
            .label("time")
            .reciprocal_label("frequency")
            .reciprocal_application(application)
            .made_dimensionless(false)
            .fft_output_order(true);

        let from_json = DimensionConfig::try_from(json!({
            "count": 10,
            "increment": "1 s",
            "origin_offset": "5 s",
            "label": "time",
            "made_dimensionless": false,
            "fft_output_order": true,
            "reciprocal": {
                "label": "frequency",
                "application": {"com.example": {"window": "hann"}},
            },
        }))?;
        assert_eq!(config, from_json);

        Ok(())
    }

    #[test]
    fn test_deserialize() -> Result<()> {
        let config: DimensionConfig =
            serde_json::from_str(r#"{"non_quantitative": true, "values": ["x", "y"]}"#)?;
        assert_eq!(config, DimensionConfig::labeled(["x", "y"]));

        let err = serde_json::from_str::<DimensionConfig>(r#"{"count": "ten"}"#);
        assert!(err.is_err());

        Ok(())
    }
}
