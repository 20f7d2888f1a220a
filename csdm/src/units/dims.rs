//! Physical dimensionality as integer exponents over a fixed set of base kinds.
//!
use std::fmt;

const BASE_SYMBOLS: [&str; 8] = ["L", "M", "T", "I", "Θ", "N", "J", "A"];

/// Exponents of length, mass, time, electric current, temperature, amount of substance,
/// luminous intensity and plane angle, in that order.
///
/// Plane angle is carried as its own base so that angles and angular frequencies get their own
/// quantity kinds, even though it is formally dimensionless.
///
/// Exponents stay within `-127..=127`, so negating one never overflows. Products and powers that
/// would leave that range are refused.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensionality([i8; 8]);

impl Dimensionality {
    pub const DIMENSIONLESS: Dimensionality = Dimensionality([0; 8]);
    pub const LENGTH: Dimensionality = Dimensionality([1, 0, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Dimensionality = Dimensionality([0, 1, 0, 0, 0, 0, 0, 0]);
    pub const TIME: Dimensionality = Dimensionality([0, 0, 1, 0, 0, 0, 0, 0]);
    pub const CURRENT: Dimensionality = Dimensionality([0, 0, 0, 1, 0, 0, 0, 0]);
    pub const TEMPERATURE: Dimensionality = Dimensionality([0, 0, 0, 0, 1, 0, 0, 0]);
    pub const AMOUNT: Dimensionality = Dimensionality([0, 0, 0, 0, 0, 1, 0, 0]);
    pub const LUMINOUS_INTENSITY: Dimensionality = Dimensionality([0, 0, 0, 0, 0, 0, 1, 0]);
    pub const ANGLE: Dimensionality = Dimensionality([0, 0, 0, 0, 0, 0, 0, 1]);

    pub const fn new(exponents: [i8; 8]) -> Self {
        Self(exponents)
    }

    pub fn exponents(&self) -> [i8; 8] {
        self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0 == [0; 8]
    }

    pub fn checked_powi(self, power: i8) -> Option<Self> {
        let mut exponents = self.0;
        for exponent in exponents.iter_mut() {
            *exponent = checked_exponent(i16::from(*exponent) * i16::from(power))?;
        }

        Some(Self(exponents))
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let mut exponents = self.0;
        for (exponent, other) in exponents.iter_mut().zip(rhs.0) {
            *exponent = checked_exponent(i16::from(*exponent) + i16::from(other))?;
        }

        Some(Self(exponents))
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.checked_mul(rhs.inverse())
    }

    pub fn inverse(self) -> Self {
        Self(self.0.map(|exponent| -exponent))
    }

    /// Name of the physical type for this dimensionality, or "unknown" if it isn't one of the
    /// named kinds.
    ///
    pub fn quantity_kind(&self) -> &'static str {
        QUANTITY_KINDS
            .iter()
            .find(|(exponents, _)| *exponents == self.0)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}

/// An exponent, if it's within `-127..=127`.
pub(crate) fn checked_exponent(value: i16) -> Option<i8> {
    if value.abs() <= i16::from(i8::MAX) {
        i8::try_from(value).ok()
    } else {
        None
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }

        let factors: Vec<String> = BASE_SYMBOLS
            .iter()
            .zip(self.0)
            .filter(|(_, exponent)| *exponent != 0)
            .map(|(symbol, exponent)| match exponent {
                1 => symbol.to_string(),
                _ => format!("{symbol}^{exponent}"),
            })
            .collect();

        write!(f, "{}", factors.join(" "))
    }
}

//                                 L   M   T   I   Θ   N   J   A
#[rustfmt::skip]
const QUANTITY_KINDS: [([i8; 8], &str); 33] = [
    ([ 0,  0,  0,  0,  0,  0,  0,  0], "dimensionless"),
    ([ 1,  0,  0,  0,  0,  0,  0,  0], "length"),
    ([ 0,  1,  0,  0,  0,  0,  0,  0], "mass"),
    ([ 0,  0,  1,  0,  0,  0,  0,  0], "time"),
    ([ 0,  0,  0,  1,  0,  0,  0,  0], "electrical current"),
    ([ 0,  0,  0,  0,  1,  0,  0,  0], "temperature"),
    ([ 0,  0,  0,  0,  0,  1,  0,  0], "amount of substance"),
    ([ 0,  0,  0,  0,  0,  0,  1,  0], "luminous intensity"),
    ([ 0,  0,  0,  0,  0,  0,  0,  1], "angle"),
    ([ 2,  0,  0,  0,  0,  0,  0,  0], "area"),
    ([ 3,  0,  0,  0,  0,  0,  0,  0], "volume"),
    ([-1,  0,  0,  0,  0,  0,  0,  0], "wavenumber"),
    ([ 0,  0, -1,  0,  0,  0,  0,  0], "frequency"),
    ([ 0,  0, -1,  0,  0,  0,  0,  1], "angular frequency"),
    ([ 0,  0, -2,  0,  0,  0,  0,  1], "angular acceleration"),
    ([ 1,  0, -1,  0,  0,  0,  0,  0], "speed"),
    ([ 1,  0, -2,  0,  0,  0,  0,  0], "acceleration"),
    ([-1,  0,  1,  0,  0,  0,  0,  0], "slowness"),
    ([ 1,  1, -2,  0,  0,  0,  0,  0], "force"),
    ([ 2,  1, -2,  0,  0,  0,  0,  0], "energy"),
    ([ 2,  1, -3,  0,  0,  0,  0,  0], "power"),
    ([-1,  1, -2,  0,  0,  0,  0,  0], "pressure"),
    ([-3,  1,  0,  0,  0,  0,  0,  0], "mass density"),
    ([ 1,  1, -1,  0,  0,  0,  0,  0], "momentum/impulse"),
    ([ 0,  0,  1,  1,  0,  0,  0,  0], "electrical charge"),
    ([ 2,  1, -3, -1,  0,  0,  0,  0], "electrical potential"),
    ([ 2,  1, -3, -2,  0,  0,  0,  0], "electrical resistance"),
    ([-2, -1,  4,  2,  0,  0,  0,  0], "electrical capacitance"),
    ([ 2,  1, -2, -1,  0,  0,  0,  0], "magnetic flux"),
    ([ 0,  1, -2, -1,  0,  0,  0,  0], "magnetic flux density"),
    ([-1,  0,  0,  1,  0,  0,  0,  0], "magnetic field strength"),
    ([-3,  0,  0,  0,  0,  1,  0,  0], "molar concentration"),
    ([ 0,  0, -1,  0,  0,  1,  0,  0], "catalytic activity"),
];
