use ndarray::Array1;
use serde_json::{Map, Value};
use tracing::debug;

use super::{config::ArbitraryConfig, quantitative::Quantitative};
use crate::{
    errors::{Error, Result},
    helpers,
    units::ScalarQuantity,
};

/// A dimension sampled at an explicit, strictly ascending list of quantities.
///
/// The unit of the dimension is the unit of the first value. A reciprocal is kept for its
/// attributes, but there's no closed form for reciprocal coordinates.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ArbitraryDimension {
    values: Vec<ScalarQuantity>,
    fields: Quantitative,
    reciprocal: Quantitative,
    raw: Array1<f64>,
}

impl ArbitraryDimension {
    pub(crate) fn new(config: ArbitraryConfig) -> Result<Self> {
        let first = config
            .values
            .first()
            .ok_or_else(|| Error::value("values", "at least one value is required"))?;
        let unit = ScalarQuantity::parse(first)?.unit().clone();
        let fields = Quantitative::from_config(unit.clone(), &config.fields)?;
        let reciprocal = Quantitative::from_config(unit.inverse(), &config.reciprocal)?;

        let mut dimension = Self {
            values: vec![],
            fields,
            reciprocal,
            raw: Array1::zeros(0),
        };
        dimension.set_values(&config.values)?;

        Ok(dimension)
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// The values, expressed in the unit of the dimension.
    pub fn values(&self) -> &[ScalarQuantity] {
        &self.values
    }

    pub fn fields(&self) -> &Quantitative {
        &self.fields
    }

    pub fn reciprocal(&self) -> &Quantitative {
        &self.reciprocal
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Quantitative {
        &mut self.fields
    }

    pub(crate) fn reciprocal_mut(&mut self) -> &mut Quantitative {
        &mut self.reciprocal
    }

    pub fn coordinates(&self) -> Array1<f64> {
        self.fields.reference_coordinates(&self.raw)
    }

    pub fn absolute_coordinates(&self) -> Array1<f64> {
        self.fields.absolute_coordinates(&self.raw)
    }

    /// Replace every value. The new values must be consistent with the unit of the dimension.
    pub(crate) fn set_values<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        if values.is_empty() {
            return Err(Error::value("values", "at least one value is required"));
        }
        let values = values
            .iter()
            .map(|value| self.fields.parse_consistent("values", value.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let raw: Vec<f64> = values.iter().map(ScalarQuantity::value).collect();
        if !helpers::is_strictly_ascending(&raw) {
            return Err(Error::value("values", "values must be strictly ascending"));
        }

        self.values = values;
        self.recompute();

        Ok(())
    }

    pub(crate) fn set_count(&mut self, count: usize) -> Result<()> {
        helpers::truncate(&mut self.values, count)?;
        self.recompute();

        Ok(())
    }

    pub(crate) fn convert_unit(&mut self, unit: &str) -> Result<()> {
        self.fields.convert_unit(unit)?;
        let target = self.fields.unit();
        for value in self.values.iter_mut() {
            if let Some(converted) = value.converted(target) {
                *value = converted;
            }
        }
        self.recompute();

        Ok(())
    }

    pub(crate) fn to_dictionary(&self) -> Map<String, Value> {
        let mut map = self.fields.to_dictionary();
        map.insert("type".into(), "arbitrary".into());
        map.insert(
            "values".into(),
            self.values
                .iter()
                .map(|value| Value::String(value.to_string()))
                .collect(),
        );

        let reciprocal = self.reciprocal.to_dictionary();
        if !reciprocal.is_empty() {
            map.insert("reciprocal".into(), reciprocal.into());
        }

        map
    }

    fn recompute(&mut self) {
        self.raw = self.values.iter().map(ScalarQuantity::value).collect();
        debug!(count = self.values.len(), "computed arbitrary coordinates");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    use crate::dimension::config::{DimensionConfig, VariantConfig};

    fn arbitrary(config: DimensionConfig) -> Result<ArbitraryDimension> {
        match config.variant()? {
            VariantConfig::Arbitrary(config) => ArbitraryDimension::new(config),
            _ => panic!("not an arbitrary configuration"),
        }
    }

    #[test]
    fn test_coordinates() -> Result<()> {
        let dimension = arbitrary(
            DimensionConfig::arbitrary(["1 m", "400 cm", "0.009 km"]).reference_offset("1 m"),
        )?;
        assert_eq!(dimension.count(), 3);
        assert_eq!(dimension.fields().unit().to_string(), "m");
        assert_eq!(dimension.fields().quantity_kind(), "length");
        assert_eq!(dimension.reciprocal().unit().to_string(), "m^-1");
        assert_eq!(dimension.values()[1].to_string(), "4.0 m");

        let coordinates = dimension.coordinates();
        assert_relative_eq!(coordinates[0], 0.0);
        assert_relative_eq!(coordinates[1], 3.0, max_relative = 1e-12);
        assert_relative_eq!(coordinates[2], 8.0, max_relative = 1e-12);

        Ok(())
    }

    #[test]
    fn test_not_ascending() {
        for values in [vec!["1 m", "1 m"], vec!["2 m", "1 m"], vec!["1 m", "50 cm"]] {
            assert!(matches!(
                arbitrary(DimensionConfig::arbitrary(values)),
                Err(Error::Value { .. })
            ));
        }
        assert!(matches!(
            arbitrary(DimensionConfig::arbitrary(Vec::<String>::new())),
            Err(Error::Value { .. })
        ));
    }

    #[test]
    fn test_inconsistent_values() {
        assert!(matches!(
            arbitrary(DimensionConfig::arbitrary(["1 m", "2 s"])),
            Err(Error::Dimensionality { .. })
        ));
        assert!(matches!(
            arbitrary(DimensionConfig::arbitrary(["1 m", "2 bogus"])),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_set_count() -> Result<()> {
        crate::testing::init_logging();
        let mut dimension =
            arbitrary(DimensionConfig::arbitrary(["1 s", "2 s", "4 s", "8 s", "16 s"]))?;

        assert!(matches!(dimension.set_count(6), Err(Error::Value { .. })));
        assert_eq!(dimension.count(), 5);

        let (result, logs) = crate::testing::capture_logs(|| dimension.set_count(3));
        result?;
        assert!(logs.contains("WARN") && logs.contains("from=5 to=3"), "{logs}");
        assert_eq!(dimension.count(), 3);
        assert_eq!(dimension.coordinates(), array![1.0, 2.0, 4.0]);

        assert!(matches!(dimension.set_count(4), Err(Error::Value { .. })));

        Ok(())
    }

    #[test]
    fn test_set_values() -> Result<()> {
        let mut dimension = arbitrary(DimensionConfig::arbitrary(["1 s", "2 s"]))?;
        dimension.set_values(&["1 ms", "2 ms", "3 ms"])?;
        assert_eq!(dimension.count(), 3);
        assert_relative_eq!(dimension.coordinates()[2], 0.003, max_relative = 1e-12);

        assert!(dimension.set_values(&["1 m"]).is_err());
        assert!(dimension.set_values(&["3 s", "2 s"]).is_err());
        assert_eq!(dimension.count(), 3);

        Ok(())
    }

    #[test]
    fn test_convert_unit() -> Result<()> {
        let mut dimension = arbitrary(DimensionConfig::arbitrary(["1 s", "2 s"]))?;
        dimension.convert_unit("ms")?;
        assert_eq!(dimension.values()[1].to_string(), "2000.0 ms");
        assert_eq!(dimension.coordinates(), array![1000.0, 2000.0]);

        Ok(())
    }

    #[test]
    fn test_to_dictionary() -> Result<()> {
        let dimension = arbitrary(DimensionConfig::arbitrary(["1 s", "2 s"]).label("time"))?;
        let map = dimension.to_dictionary();
        assert_eq!(map["type"], "arbitrary");
        assert_eq!(map["values"], serde_json::json!(["1.0 s", "2.0 s"]));
        assert_eq!(map["label"], "time");
        assert_eq!(map["quantity_kind"], "time");
        assert!(!map.contains_key("count"));
        assert_eq!(map["reciprocal"], serde_json::json!({"quantity_kind": "frequency"}));

        Ok(())
    }
}
