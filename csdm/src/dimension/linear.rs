use std::{f64::consts::PI, mem};

use ndarray::Array1;
use serde_json::{Map, Value};
use tracing::debug;

use super::{config::LinearConfig, quantitative::Quantitative};
use crate::{
    errors::{Error, Result},
    range::LinearRange,
    units::ScalarQuantity,
};

/// A dimension sampled at `count` evenly spaced points, `increment` apart.
///
/// Raw coordinates `j * increment` are cached and recomputed by every mutator that changes
/// `count`, `increment`, `fft_output_order` or the unit.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LinearDimension {
    count: usize,
    increment: ScalarQuantity,
    fft_output_order: bool,
    fields: Quantitative,
    reciprocal: Quantitative,
    raw: Array1<f64>,
}

/// Per point phase angles, in radians, that the Fourier transform of data sampled along a
/// dimension has to be multiplied by, as `exp(-i * angle)`, to account for the reference offset
/// the dimension had before it was transformed.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseCorrection {
    pub angles: Array1<f64>,
}

impl PhaseCorrection {
    /// True if there's nothing to correct, ie the reference offset was zero.
    pub fn is_trivial(&self) -> bool {
        self.angles.iter().all(|angle| *angle == 0.0)
    }
}

impl LinearDimension {
    pub(crate) fn new(config: LinearConfig) -> Result<Self> {
        check_count(config.count)?;
        let increment = ScalarQuantity::parse(&config.increment)?;
        check_increment(&increment)?;

        let unit = increment.unit().clone();
        let fields = Quantitative::from_config(unit.clone(), &config.fields)?;
        let reciprocal = Quantitative::from_config(unit.inverse(), &config.reciprocal)?;

        let mut dimension = Self {
            count: config.count,
            increment,
            fft_output_order: config.fft_output_order,
            fields,
            reciprocal,
            raw: Array1::zeros(0),
        };
        dimension.recompute();

        Ok(dimension)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn increment(&self) -> &ScalarQuantity {
        &self.increment
    }

    pub fn fft_output_order(&self) -> bool {
        self.fft_output_order
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

    pub(crate) fn set_count(&mut self, count: usize) -> Result<()> {
        check_count(count)?;
        self.count = count;
        self.recompute();

        Ok(())
    }

    pub(crate) fn set_increment(&mut self, value: &str) -> Result<()> {
        let increment = self.fields.parse_consistent("increment", value)?;
        check_increment(&increment)?;
        self.increment = increment;
        self.recompute();

        Ok(())
    }

    pub(crate) fn set_fft_output_order(&mut self, fft_output_order: bool) {
        self.fft_output_order = fft_output_order;
        self.recompute();
    }

    pub(crate) fn convert_unit(&mut self, unit: &str) -> Result<()> {
        self.fields.convert_unit(unit)?;
        if let Some(increment) = self.increment.converted(self.fields.unit()) {
            self.increment = increment;
        }
        self.recompute();

        Ok(())
    }

    /// The increment of the Fourier conjugate, `1 / (count * increment)`, in the reciprocal unit.
    pub fn reciprocal_increment(&self) -> ScalarQuantity {
        let inverse = ScalarQuantity::new(
            1.0 / (self.count as f64 * self.increment.value()),
            self.increment.unit().inverse(),
        );

        inverse.converted(self.reciprocal.unit()).unwrap_or(inverse)
    }

    /// The coordinates this dimension will have once it is Fourier transformed.
    pub fn reciprocal_coordinates(&self) -> Array1<f64> {
        self.reciprocal.reference_coordinates(&self.reciprocal_raw())
    }

    pub fn reciprocal_absolute_coordinates(&self) -> Array1<f64> {
        self.reciprocal.absolute_coordinates(&self.reciprocal_raw())
    }

    /// Exchange this dimension's quantitative attributes with those of its reciprocal. The
    /// increment becomes the reciprocal increment, so it survives two swaps only up to rounding.
    ///
    pub(crate) fn swap(&mut self) {
        let increment = self.reciprocal_increment();
        mem::swap(&mut self.fields, &mut self.reciprocal);
        self.increment = increment;
        self.recompute();
    }

    /// Swap with the reciprocal and flip the coordinate order, so the coordinates match the
    /// output of a discrete Fourier transform of data sampled along the old coordinates.
    ///
    pub(crate) fn fourier_transform(&mut self) -> PhaseCorrection {
        let reference_offset = self.fields.reference_offset().si_value();
        self.swap();
        self.set_fft_output_order(!self.fft_output_order);

        let scale = self.fields.unit().scale();
        let angles = self
            .raw
            .mapv(|coordinate| 2.0 * PI * reference_offset * coordinate * scale);
        debug!(
            count = self.count,
            increment = %self.increment,
            fft_output_order = self.fft_output_order,
            "transformed linear dimension"
        );

        PhaseCorrection { angles }
    }

    pub(crate) fn to_dictionary(&self) -> Map<String, Value> {
        let mut map = self.fields.to_dictionary();
        map.insert("type".into(), "linear".into());
        map.insert("count".into(), self.count.into());
        map.insert("increment".into(), self.increment.to_string().into());
        if self.fft_output_order {
            map.insert("fft_output_order".into(), true.into());
        }

        let reciprocal = self.reciprocal.to_dictionary();
        if !reciprocal.is_empty() {
            map.insert("reciprocal".into(), reciprocal.into());
        }

        map
    }

    fn reciprocal_raw(&self) -> Array1<f64> {
        LinearRange::new(
            self.reciprocal_increment().value(),
            self.count,
            !self.fft_output_order,
        )
        .values()
    }

    fn recompute(&mut self) {
        self.raw = LinearRange::new(self.increment.value(), self.count, self.fft_output_order)
            .values();
        debug!(count = self.count, increment = %self.increment, "computed linear coordinates");
    }
}

fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        Err(Error::value("count", "the count must be a positive integer"))
    } else {
        Ok(())
    }
}

fn check_increment(increment: &ScalarQuantity) -> Result<()> {
    let value = increment.value();
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::value(
            "increment",
            format!("the increment must be positive and finite, got {increment}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;
    use paste::paste;
    use rand::Rng;

    use crate::dimension::config::{DimensionConfig, VariantConfig};

    fn linear(config: DimensionConfig) -> Result<LinearDimension> {
        match config.variant()? {
            VariantConfig::Linear(config) => LinearDimension::new(config),
            _ => panic!("not a linear configuration"),
        }
    }

    #[test]
    fn test_coordinates() -> Result<()> {
        let dimension = linear(DimensionConfig::linear(5, "0.5 s"))?;
        assert_eq!(dimension.coordinates(), array![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(dimension.absolute_coordinates(), dimension.coordinates());
        assert_eq!(dimension.increment().to_string(), "0.5 s");

        Ok(())
    }

    #[test]
    fn test_coordinates_random() -> Result<()> {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let count = rng.gen_range(1..200);
            let increment: f64 = rng.gen_range(0.001..100.0);
            let dimension = linear(DimensionConfig::linear(count, format!("{increment} m")))?;
            let coordinates = dimension.coordinates();
            assert_eq!(coordinates.len(), count);
            for (j, coordinate) in coordinates.iter().enumerate() {
                assert_relative_eq!(*coordinate, j as f64 * increment, max_relative = 1e-12);
            }
        }

        Ok(())
    }

    macro_rules! fft_order_tests {
        ($($count:literal => [$($index:expr),*];)*) => {
            paste! {
                $(
                    #[test]
                    fn [<test_fft_output_order_ $count>]() -> Result<()> {
                        let mut dimension = linear(DimensionConfig::linear($count, "2 cm"))?;
                        dimension.set_fft_output_order(true);
                        assert_eq!(dimension.coordinates(), array![$($index as f64 * 2.0),*]);

                        dimension.set_fft_output_order(false);
                        let natural: Vec<f64> = (0..$count).map(|j| j as f64 * 2.0).collect();
                        assert_eq!(dimension.coordinates().to_vec(), natural);

                        Ok(())
                    }
                )*
            }
        };
    }

    fft_order_tests! {
        5 => [0, 1, 2, -2, -1];
        10 => [0, 1, 2, 3, 4, -5, -4, -3, -2, -1];
    }

    #[test]
    fn test_reference_offset_shifts_coordinates() -> Result<()> {
        let mut dimension = linear(DimensionConfig::linear(6, "1 mT"))?;
        let before = dimension.coordinates();
        dimension.fields_mut().set_reference_offset("0.25 mT")?;
        let after = dimension.coordinates();
        assert_eq!(after.len(), before.len());
        assert_eq!(after, before - 0.25);

        dimension.fields_mut().set_origin_offset("10 mT")?;
        assert_eq!(dimension.coordinates(), after);
        assert_eq!(dimension.absolute_coordinates(), after + 10.0);

        Ok(())
    }

    #[test]
    fn test_inconsistent_units() {
        let err = linear(DimensionConfig::linear(10, "5 G").reference_offset("10 s")).unwrap_err();
        assert!(matches!(err, Error::Dimensionality { .. }));

        let err = linear(DimensionConfig::linear(10, "5 G").reciprocal_origin_offset("1 G"));
        assert!(matches!(err, Err(Error::Dimensionality { .. })));

        linear(DimensionConfig::linear(10, "5 G").reciprocal_origin_offset("1 G^-1")).unwrap();
    }

    #[test]
    fn test_bad_increment() {
        for increment in ["0 s", "-1 s", "inf s", "1/0 s"] {
            assert!(matches!(
                linear(DimensionConfig::linear(10, increment)),
                Err(Error::Value { .. })
            ));
        }
    }

    #[test]
    fn test_set_count_and_increment() -> Result<()> {
        let mut dimension = linear(DimensionConfig::linear(3, "1 s"))?;
        dimension.set_count(4)?;
        assert_eq!(dimension.coordinates(), array![0.0, 1.0, 2.0, 3.0]);
        assert!(matches!(dimension.set_count(0), Err(Error::Value { .. })));
        assert_eq!(dimension.count(), 4);

        dimension.set_increment("500 ms")?;
        assert_eq!(dimension.coordinates(), array![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(dimension.increment().unit().to_string(), "s");

        assert!(matches!(dimension.set_increment("1 m"), Err(Error::Dimensionality { .. })));
        assert!(matches!(dimension.set_increment("-1 s"), Err(Error::Value { .. })));
        assert_eq!(dimension.increment().value(), 0.5);

        Ok(())
    }

    #[test]
    fn test_convert_unit() -> Result<()> {
        let mut dimension = linear(DimensionConfig::linear(3, "1 s").reference_offset("1 s"))?;
        dimension.convert_unit("ms")?;
        assert_eq!(dimension.increment().to_string(), "1000.0 ms");
        assert_eq!(dimension.coordinates(), array![-1000.0, 0.0, 1000.0]);

        Ok(())
    }

    #[test]
    fn test_period_defaults() -> Result<()> {
        let dimension = linear(DimensionConfig::linear(10, "1 s"))?;
        assert!(dimension.fields().period().is_infinite());
        assert!(dimension.reciprocal().period().is_infinite());
        assert_eq!(dimension.reciprocal().unit().to_string(), "s^-1");
        assert_eq!(dimension.reciprocal().quantity_kind(), "frequency");

        Ok(())
    }

    #[test]
    fn test_reciprocal_increment() -> Result<()> {
        let dimension = linear(DimensionConfig::linear(100, "10 us"))?;
        let increment = dimension.reciprocal_increment();
        assert_eq!(increment.unit().to_string(), "us^-1");
        assert_relative_eq!(increment.value(), 0.001, max_relative = 1e-12);
        assert_relative_eq!(increment.si_value(), 1000.0, max_relative = 1e-12);

        Ok(())
    }

    #[test]
    fn test_swap_twice() -> Result<()> {
        let config = DimensionConfig::linear(8, "0.25 s")
            .reference_offset("1 s")
            .origin_offset("3 s")
            .period("20 s")
            .label("time")
            .description("acquisition")
            .reciprocal_reference_offset("0.5 Hz")
            .reciprocal_label("frequency");
        let mut dimension = linear(config)?;
        let original = dimension.clone();

        dimension.swap();
        assert_eq!(dimension.fields(), original.reciprocal());
        assert_eq!(dimension.reciprocal(), original.fields());
        assert_eq!(dimension.fields().label(), "frequency");
        assert_eq!(dimension.increment(), &original.reciprocal_increment());
        assert_relative_eq!(dimension.increment().value(), 0.5, max_relative = 1e-12);

        dimension.swap();
        assert_eq!(dimension.fields(), original.fields());
        assert_eq!(dimension.reciprocal(), original.reciprocal());
        assert_relative_eq!(dimension.increment().value(), 0.25, max_relative = 1e-12);
        assert_eq!(dimension.increment().unit(), original.increment().unit());

        Ok(())
    }

    #[test]
    fn test_reciprocal_coordinates_match_transform() -> Result<()> {
        for count in [1, 2, 5, 10, 11] {
            let config = DimensionConfig::linear(count, "0.1 ms")
                .reference_offset("0.2 ms")
                .reciprocal_reference_offset("1 kHz");
            let mut dimension = linear(config)?;
            let expected = dimension.reciprocal_coordinates();
            let expected_absolute = dimension.reciprocal_absolute_coordinates();

            dimension.fourier_transform();
            assert!(dimension.fft_output_order());
            assert_eq!(dimension.coordinates(), expected);
            assert_eq!(dimension.absolute_coordinates(), expected_absolute);
        }

        Ok(())
    }

    #[test]
    fn test_fourier_transform() -> Result<()> {
        let config = DimensionConfig::linear(4, "0.5 s").reference_offset("1 s");
        let mut dimension = linear(config)?;

        let phase = dimension.fourier_transform();
        assert_eq!(dimension.fields().unit().to_string(), "s^-1");
        assert_eq!(dimension.fields().quantity_kind(), "frequency");
        assert_eq!(dimension.reciprocal().reference_offset().value(), 1.0);
        assert_eq!(dimension.coordinates(), array![0.0, 0.5, -1.0, -0.5]);
        assert!(!phase.is_trivial());
        for (angle, frequency) in phase.angles.iter().zip(dimension.coordinates().iter()) {
            assert_relative_eq!(*angle, 2.0 * PI * frequency, max_relative = 1e-12);
        }

        let phase = dimension.fourier_transform();
        assert!(phase.is_trivial());
        assert!(!dimension.fft_output_order());
        assert_eq!(dimension.fields().unit().to_string(), "s");
        assert_relative_eq!(dimension.increment().value(), 0.5, max_relative = 1e-12);
        assert_eq!(dimension.coordinates(), array![-1.0, -0.5, 0.0, 0.5]);

        Ok(())
    }

    #[test]
    fn test_to_dictionary() -> Result<()> {
        let mut dimension = linear(DimensionConfig::linear(10, "1"))?;
        dimension.set_fft_output_order(true);
        let map = dimension.to_dictionary();
        assert_eq!(map["type"], "linear");
        assert_eq!(map["count"], 10);
        assert_eq!(map["increment"], "1.0");
        assert_eq!(map["fft_output_order"], true);
        for key in ["period", "reference_offset", "origin_offset", "quantity_kind", "reciprocal"] {
            assert!(!map.contains_key(key), "{key}");
        }

        Ok(())
    }
}
