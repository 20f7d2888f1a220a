//! Table of recognized unit symbols and SI prefixes.
//!
use std::f64::consts::PI;

use super::dims::Dimensionality as D;

/// A named unit: its scale relative to the coherent SI unit of the same dimensionality, and
/// whether SI prefixes may be attached to it.
///
#[derive(Clone, Copy, Debug)]
pub(crate) struct BaseUnit {
    pub scale: f64,
    pub dims: D,
    pub prefixable: bool,
}

const fn unit(scale: f64, dims: D, prefixable: bool) -> BaseUnit {
    BaseUnit {
        scale,
        dims,
        prefixable,
    }
}

const FORCE: D = D::new([1, 1, -2, 0, 0, 0, 0, 0]);
const ENERGY: D = D::new([2, 1, -2, 0, 0, 0, 0, 0]);
const POWER: D = D::new([2, 1, -3, 0, 0, 0, 0, 0]);
const PRESSURE: D = D::new([-1, 1, -2, 0, 0, 0, 0, 0]);
const CHARGE: D = D::new([0, 0, 1, 1, 0, 0, 0, 0]);
const POTENTIAL: D = D::new([2, 1, -3, -1, 0, 0, 0, 0]);
const RESISTANCE: D = D::new([2, 1, -3, -2, 0, 0, 0, 0]);
const CAPACITANCE: D = D::new([-2, -1, 4, 2, 0, 0, 0, 0]);
const FLUX: D = D::new([2, 1, -2, -1, 0, 0, 0, 0]);
const FLUX_DENSITY: D = D::new([0, 1, -2, -1, 0, 0, 0, 0]);
const FREQUENCY: D = D::new([0, 0, -1, 0, 0, 0, 0, 0]);
const VOLUME: D = D::new([3, 0, 0, 0, 0, 0, 0, 0]);

const DAY: f64 = 86400.0;
const JULIAN_YEAR: f64 = 365.25 * DAY;
const LIGHT_YEAR: f64 = 299_792_458.0 * JULIAN_YEAR;

#[rustfmt::skip]
const UNITS: &[(&str, BaseUnit)] = &[
    // SI base units
    ("m",          unit(1.0, D::LENGTH, true)),
    ("g",          unit(1e-3, D::MASS, true)),
    ("s",          unit(1.0, D::TIME, true)),
    ("A",          unit(1.0, D::CURRENT, true)),
    ("K",          unit(1.0, D::TEMPERATURE, true)),
    ("mol",        unit(1.0, D::AMOUNT, true)),
    ("cd",         unit(1.0, D::LUMINOUS_INTENSITY, true)),
    ("rad",        unit(1.0, D::ANGLE, true)),

    // Derived units
    ("Hz",         unit(1.0, FREQUENCY, true)),
    ("N",          unit(1.0, FORCE, true)),
    ("J",          unit(1.0, ENERGY, true)),
    ("W",          unit(1.0, POWER, true)),
    ("Pa",         unit(1.0, PRESSURE, true)),
    ("C",          unit(1.0, CHARGE, true)),
    ("V",          unit(1.0, POTENTIAL, true)),
    ("Ohm",        unit(1.0, RESISTANCE, true)),
    ("Ω",          unit(1.0, RESISTANCE, true)),
    ("F",          unit(1.0, CAPACITANCE, true)),
    ("Wb",         unit(1.0, FLUX, true)),
    ("T",          unit(1.0, FLUX_DENSITY, true)),
    ("G",          unit(1e-4, FLUX_DENSITY, true)),
    ("eV",         unit(1.602_176_634e-19, ENERGY, true)),
    ("l",          unit(1e-3, VOLUME, true)),
    ("L",          unit(1e-3, VOLUME, true)),
    ("bar",        unit(1e5, PRESSURE, true)),
    ("atm",        unit(101_325.0, PRESSURE, false)),

    // Time
    ("min",        unit(60.0, D::TIME, false)),
    ("h",          unit(3600.0, D::TIME, false)),
    ("d",          unit(DAY, D::TIME, false)),
    ("yr",         unit(JULIAN_YEAR, D::TIME, true)),

    // Length
    ("Angstrom",   unit(1e-10, D::LENGTH, false)),
    ("Å",          unit(1e-10, D::LENGTH, false)),
    ("AU",         unit(1.495_978_707e11, D::LENGTH, false)),
    ("au",         unit(1.495_978_707e11, D::LENGTH, false)),
    ("lyr",        unit(LIGHT_YEAR, D::LENGTH, true)),
    ("pc",         unit(3.085_677_581_491_367e16, D::LENGTH, true)),

    // Angle
    ("deg",        unit(PI / 180.0, D::ANGLE, false)),
    ("°",          unit(PI / 180.0, D::ANGLE, false)),
    ("arcmin",     unit(PI / 10_800.0, D::ANGLE, false)),
    ("arcsec",     unit(PI / 648_000.0, D::ANGLE, false)),

    // Dimensionless ratios
    ("ppm",        unit(1e-6, D::DIMENSIONLESS, false)),
    ("ppb",        unit(1e-9, D::DIMENSIONLESS, false)),
    ("%",          unit(1e-2, D::DIMENSIONLESS, false)),
    ("tr",         unit(1.0, D::DIMENSIONLESS, false)),
    ("turn",       unit(1.0, D::DIMENSIONLESS, false)),
    ("cycle",      unit(1.0, D::DIMENSIONLESS, false)),
    ("revolution", unit(1.0, D::DIMENSIONLESS, false)),
];

#[rustfmt::skip]
const PREFIXES: &[(&str, f64)] = &[
    ("da", 1e1),
    ("Y", 1e24), ("Z", 1e21), ("E", 1e18), ("P", 1e15), ("T", 1e12), ("G", 1e9),
    ("M", 1e6), ("k", 1e3), ("h", 1e2), ("d", 1e-1), ("c", 1e-2), ("m", 1e-3),
    ("u", 1e-6), ("µ", 1e-6), ("μ", 1e-6), ("n", 1e-9), ("p", 1e-12), ("f", 1e-15),
    ("a", 1e-18), ("z", 1e-21), ("y", 1e-24),
];

/// Look up a unit symbol, possibly carrying an SI prefix.
///
/// Exact matches win over prefixed readings, so "T" is tesla, "cd" is candela and "min" is
/// minute, while "mT" is millitesla and "Gm" is gigameter.
///
pub(crate) fn lookup(symbol: &str) -> Option<BaseUnit> {
    if let Some(found) = exact(symbol) {
        return Some(found);
    }

    PREFIXES.iter().find_map(|(prefix, factor)| {
        let rest = symbol.strip_prefix(prefix)?;
        let base = exact(rest)?;
        if base.prefixable {
            Some(BaseUnit {
                scale: base.scale * factor,
                ..base
            })
        } else {
            None
        }
    })
}

fn exact(symbol: &str) -> Option<BaseUnit> {
    UNITS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, base)| *base)
}
