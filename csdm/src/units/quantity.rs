use std::fmt;
use std::str::FromStr;

use super::unit::Unit;
use crate::{
    errors::{Error, Result},
    helpers::INFINITY_SENTINELS,
};

/// A scalar value paired with its unit, eg "5 G" or "-10 mT".
///
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarQuantity {
    value: f64,
    unit: Unit,
}

impl ScalarQuantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn zero(unit: &Unit) -> Self {
        Self::new(0.0, unit.clone())
    }

    pub fn infinity(unit: &Unit) -> Self {
        Self::new(f64::INFINITY, unit.clone())
    }

    /// Parse a quantity string of the form `"<number expression> <unit expression>"`.
    ///
    /// The numerical part may be an arithmetic expression, so "20/2 m / s" is 10 m/s and
    /// "(1/0) T" is infinite. A bare unit has the value 1 and a bare number is dimensionless.
    ///
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let mut scanner = Scanner::new(text);
        let value = match scanner.expression() {
            Some(value) => value,
            None => {
                scanner.position = 0;
                1.0
            }
        };

        if value.is_nan() {
            return Err(Error::format(input, "the numerical value is undefined"));
        }

        let rest = text[scanner.position..].trim_start();
        let rest = rest.strip_prefix('*').unwrap_or(rest);

        // "1 / s" leaves "/ s" behind
        let rest = if rest.starts_with('/') {
            format!("1{rest}")
        } else {
            rest.to_string()
        };
        let unit = Unit::parse(&rest).map_err(|err| match err {
            Error::Format { reason, .. } => Error::format(input, reason),
            err => err,
        })?;

        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Numerical value of this quantity expressed in `unit`, or `None` if the two aren't
    /// dimensionally consistent.
    ///
    pub fn value_in(&self, unit: &Unit) -> Option<f64> {
        self.unit
            .conversion_factor(unit)
            .map(|factor| if factor == 1.0 { self.value } else { self.value * factor })
    }

    /// The same quantity expressed in `unit`.
    pub fn converted(&self, unit: &Unit) -> Option<Self> {
        self.value_in(unit).map(|value| Self::new(value, unit.clone()))
    }

    /// The same quantity expressed in `unit`, failing if the two aren't dimensionally consistent.
    pub fn to(&self, unit: &Unit) -> Result<Self> {
        self.converted(unit).ok_or_else(|| Error::Dimensionality {
            field: String::from("quantity"),
            expected: unit.to_string(),
            found: self.unit.to_string(),
        })
    }

    /// Numerical value in coherent SI units.
    pub fn si_value(&self) -> f64 {
        self.value * self.unit.scale()
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    pub fn is_infinite(&self) -> bool {
        self.value.is_infinite()
    }
}

impl FromStr for ScalarQuantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ScalarQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.unit.to_string();
        if unit.is_empty() {
            write!(f, "{:?}", self.value)
        } else {
            write!(f, "{:?} {}", self.value, unit)
        }
    }
}

/// Recursive descent evaluator for the numerical part of a quantity string.
///
/// Every method returns `None` without consuming input when it can't match, which lets the
/// scanner stop cleanly at the point where the unit expression starts.
///
struct Scanner<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// expression := term (("+" | "-") term)*
    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            let start = self.position;
            self.skip_whitespace();
            let operator = match self.peek() {
                Some(c @ ('+' | '-')) => c,
                _ => {
                    self.position = start;
                    return Some(value);
                }
            };
            self.position += 1;
            match self.term() {
                Some(rhs) if operator == '+' => value += rhs,
                Some(rhs) => value -= rhs,
                None => {
                    self.position = start;
                    return Some(value);
                }
            }
        }
    }

    /// term := factor (("*" | "/") factor)*
    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            let start = self.position;
            self.skip_whitespace();
            let operator = match self.peek() {
                Some(c @ ('*' | '/')) => c,
                _ => {
                    self.position = start;
                    return Some(value);
                }
            };
            self.position += 1;
            match self.factor() {
                Some(rhs) if operator == '*' => value *= rhs,
                Some(rhs) => value /= rhs,
                None => {
                    self.position = start;
                    return Some(value);
                }
            }
        }
    }

    /// factor := ("+" | "-") factor | number | infinity | "(" expression ")"
    fn factor(&mut self) -> Option<f64> {
        let start = self.position;
        self.skip_whitespace();
        let result = match self.peek() {
            Some('-') => {
                self.position += 1;
                self.factor().map(|value| -value)
            }
            Some('+') => {
                self.position += 1;
                self.factor()
            }
            Some('(') => {
                self.position += 1;
                let value = self.expression();
                self.skip_whitespace();
                match (value, self.peek()) {
                    (Some(value), Some(')')) => {
                        self.position += 1;
                        Some(value)
                    }
                    _ => None,
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(_) => self.infinity(),
            None => None,
        };

        if result.is_none() {
            self.position = start;
        }

        result
    }

    fn number(&mut self) -> Option<f64> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut end = 0;
        while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
            end += 1;
        }

        // Exponent, only when it is really followed by digits, so "5eV" reads as 5 eV
        if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut exponent_end = end + 1;
            if exponent_end < bytes.len()
                && (bytes[exponent_end] == b'+' || bytes[exponent_end] == b'-')
            {
                exponent_end += 1;
            }
            let digits_start = exponent_end;
            while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
                exponent_end += 1;
            }
            if exponent_end > digits_start {
                end = exponent_end;
            }
        }

        let value = rest[..end].parse::<f64>().ok()?;
        self.position += end;

        Some(value)
    }

    fn infinity(&mut self) -> Option<f64> {
        let rest = self.rest();
        let word = INFINITY_SENTINELS.iter().find(|word| {
            rest.strip_prefix(**word)
                .map(|after| after.chars().next().map_or(true, |c| !c.is_alphabetic()))
                .unwrap_or(false)
        })?;
        self.position += word.len();

        Some(f64::INFINITY)
    }
}
