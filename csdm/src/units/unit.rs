use std::fmt;
use std::str::FromStr;

use super::dims::{checked_exponent, Dimensionality};
use super::registry;
use crate::errors::{Error, Result};

/// A unit of measure, kept as a product of symbol factors with integer exponents.
///
/// Factors are merged on construction, so "m^2/m" and "m" are the same unit. The `scale` is the
/// size of the unit relative to the coherent SI unit with the same dimensionality, eg 1e-4 for
/// gauss.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    factors: Vec<(String, i8)>,
    scale: f64,
    dims: Dimensionality,
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self {
            factors: vec![],
            scale: 1.0,
            dims: Dimensionality::DIMENSIONLESS,
        }
    }

    /// Parse a unit expression such as "m / s", "m * s^-1", "cm^-1", "1/Hz" or "(m/s)^2".
    ///
    pub fn parse(expression: &str) -> Result<Self> {
        let tokens = tokenize(expression)?;
        if tokens.is_empty() {
            return Ok(Self::dimensionless());
        }

        let mut parser = Parser {
            expression,
            tokens,
            position: 0,
        };
        let unit = parser.expression()?;
        if parser.position < parser.tokens.len() {
            return Err(Error::format(expression, "unexpected trailing input"));
        }

        Ok(unit)
    }

    fn symbol(name: &str, source: &str) -> Result<Self> {
        let base = registry::lookup(name)
            .ok_or_else(|| Error::format(source, format!("unknown unit '{name}'")))?;

        Ok(Self {
            factors: vec![(name.to_string(), 1)],
            scale: base.scale,
            dims: base.dims,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dims
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_dimensionless()
    }

    /// Whether quantities in this unit can be expressed in `other`.
    pub fn is_consistent(&self, other: &Unit) -> bool {
        self.dims == other.dims
    }

    /// Name of the physical type this unit measures, eg "length" or "magnetic flux density".
    pub fn quantity_kind(&self) -> &'static str {
        self.dims.quantity_kind()
    }

    /// Factor that converts a value in this unit to a value in `other`, if they are consistent.
    pub fn conversion_factor(&self, other: &Unit) -> Option<f64> {
        if self.is_consistent(other) {
            Some(self.scale / other.scale)
        } else {
            None
        }
    }

    /// Raise the unit to an integer power, or `None` if an exponent would leave `-127..=127`.
    pub fn checked_powi(&self, power: i8) -> Option<Self> {
        let mut factors = Vec::with_capacity(self.factors.len());
        for (symbol, exponent) in &self.factors {
            let exponent = checked_exponent(i16::from(*exponent) * i16::from(power))?;
            if exponent != 0 {
                factors.push((symbol.clone(), exponent));
            }
        }

        Some(Self {
            factors,
            scale: self.scale.powi(i32::from(power)),
            dims: self.dims.checked_powi(power)?,
        })
    }

    pub fn inverse(&self) -> Self {
        Self {
            factors: self
                .factors
                .iter()
                .map(|(symbol, exponent)| (symbol.clone(), -exponent))
                .collect(),
            scale: 1.0 / self.scale,
            dims: self.dims.inverse(),
        }
    }

    /// The product of two units, or `None` if an exponent would leave `-127..=127`.
    pub fn checked_multiply(&self, other: &Unit) -> Option<Self> {
        let mut factors = self.factors.clone();
        for (symbol, exponent) in &other.factors {
            match factors.iter_mut().find(|(existing, _)| existing == symbol) {
                Some((_, existing)) => {
                    *existing = checked_exponent(i16::from(*existing) + i16::from(*exponent))?
                }
                None => factors.push((symbol.clone(), *exponent)),
            }
        }
        factors.retain(|(_, exponent)| *exponent != 0);

        Some(Self {
            factors,
            scale: self.scale * other.scale,
            dims: self.dims.checked_mul(other.dims)?,
        })
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factors: Vec<String> = self
            .factors
            .iter()
            .map(|(symbol, exponent)| match exponent {
                1 => symbol.clone(),
                _ => format!("{symbol}^{exponent}"),
            })
            .collect();

        write!(f, "{}", factors.join(" * "))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Symbol(String),
    One,
    Mul,
    Div,
    Pow,
    Integer(i8),
    Open,
    Close,
}

fn is_symbol_char(c: char) -> bool {
    !(c.is_whitespace() || c.is_ascii_digit() || "*/^()+-.".contains(c))
}

fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '*' {
            chars.next();
            if chars.peek() == Some(&'*') {
                chars.next();
                tokens.push(Token::Pow);
            } else {
                tokens.push(Token::Mul);
            }
        } else if c == '/' {
            chars.next();
            tokens.push(Token::Div);
        } else if c == '^' {
            chars.next();
            tokens.push(Token::Pow);
        } else if c == '(' {
            chars.next();
            tokens.push(Token::Open);
        } else if c == ')' {
            chars.next();
            tokens.push(Token::Close);
        } else if c.is_ascii_digit() || c == '-' || c == '+' {
            let mut number = String::new();
            number.push(c);
            chars.next();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                number.push(d);
                chars.next();
            }

            // A bare "1" may only appear as a numerator, as in "1/s". Anything else numeric is an
            // exponent.
            let after_pow = matches!(tokens.last(), Some(Token::Pow))
                || (matches!(tokens.last(), Some(Token::Open))
                    && matches!(tokens.iter().rev().nth(1), Some(Token::Pow)));
            if after_pow {
                let exponent = number.parse::<i8>().map_err(|_| {
                    Error::format(expression, format!("invalid exponent '{number}'"))
                })?;
                tokens.push(Token::Integer(exponent));
            } else if number == "1" {
                tokens.push(Token::One);
            } else {
                return Err(Error::format(
                    expression,
                    format!("unexpected number '{number}' in unit"),
                ));
            }
        } else {
            let mut symbol = String::new();
            while let Some(&d) = chars.peek() {
                if !is_symbol_char(d) {
                    break;
                }
                symbol.push(d);
                chars.next();
            }
            if symbol.is_empty() {
                return Err(Error::format(expression, format!("unexpected character '{c}'")));
            }
            tokens.push(Token::Symbol(symbol));
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<Token>,
    position: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;

        token
    }

    fn error(&self, reason: &str) -> Error {
        Error::format(self.expression, reason)
    }

    fn multiply(&self, unit: Unit, other: Unit) -> Result<Unit> {
        unit.checked_multiply(&other).ok_or_else(|| self.error("exponent out of range"))
    }

    /// expression := term (("*" | "/" | juxtaposition) term)*
    fn expression(&mut self) -> Result<Unit> {
        let mut unit = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Mul) => {
                    self.next();
                    let term = self.term()?;
                    unit = self.multiply(unit, term)?;
                }
                Some(Token::Div) => {
                    self.next();
                    let term = self.term()?.inverse();
                    unit = self.multiply(unit, term)?;
                }
                Some(Token::Symbol(_)) | Some(Token::Open) => {
                    let term = self.term()?;
                    unit = self.multiply(unit, term)?;
                }
                _ => break,
            }
        }

        Ok(unit)
    }

    /// term := atom ("^" integer)?
    fn term(&mut self) -> Result<Unit> {
        let unit = self.atom()?;
        if self.peek() != Some(&Token::Pow) {
            return Ok(unit);
        }

        self.next();
        let exponent = match self.next() {
            Some(Token::Integer(exponent)) => exponent,
            Some(Token::Open) => {
                let exponent = match self.next() {
                    Some(Token::Integer(exponent)) => exponent,
                    _ => return Err(self.error("expecting an integer exponent")),
                };
                if self.next() != Some(Token::Close) {
                    return Err(self.error("unbalanced parentheses"));
                }
                exponent
            }
            _ => return Err(self.error("expecting an integer exponent")),
        };

        unit.checked_powi(exponent).ok_or_else(|| self.error("exponent out of range"))
    }

    /// atom := symbol | "1" | "(" expression ")"
    fn atom(&mut self) -> Result<Unit> {
        match self.next() {
            Some(Token::Symbol(name)) => Unit::symbol(&name, self.expression),
            Some(Token::One) => Ok(Unit::dimensionless()),
            Some(Token::Open) => {
                let unit = self.expression()?;
                if self.next() != Some(Token::Close) {
                    return Err(self.error("unbalanced parentheses"));
                }
                Ok(unit)
            }
            _ => Err(self.error("expecting a unit symbol")),
        }
    }
}
