use std::fmt;
use std::result;

#[derive(Debug)]
pub enum Error {
    /// Contradictory or missing configuration keys.
    Configuration(String),

    /// A quantity's physical dimensionality doesn't match the one established for the field.
    Dimensionality {
        field: String,
        expected: String,
        found: String,
    },

    /// A quantity or unit string could not be parsed.
    Format { input: String, reason: String },

    /// A configuration value has the wrong type, eg a string where a boolean is expected.
    Type {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A value is out of its domain.
    Value { field: String, reason: String },

    /// An operation that the dimension variant (or sampling type) doesn't support.
    UnsupportedOperation {
        operation: &'static str,
        kind: &'static str,
    },

    /// An attribute that doesn't exist on the dimension variant.
    Attribute {
        kind: &'static str,
        attribute: &'static str,
    },

    /// An attribute that exists but can't be modified.
    NotImplemented { attribute: &'static str },

    Json(serde_json::Error),
}

impl Error {
    pub(crate) fn format<I, R>(input: I, reason: R) -> Self
    where
        I: Into<String>,
        R: Into<String>,
    {
        Self::Format {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn value<F, R>(field: F, reason: R) -> Self
    where
        F: Into<String>,
        R: Into<String>,
    {
        Self::Value {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(message) => write!(f, "invalid dimension configuration: {message}"),
            Error::Dimensionality {
                field,
                expected,
                found,
            } => write!(
                f,
                "the unit '{found}' given for '{field}' is inconsistent with the dimension's \
                 unit '{expected}'"
            ),
            Error::Format { input, reason } => {
                write!(f, "cannot parse '{input}' as a quantity: {reason}")
            }
            Error::Type {
                field,
                expected,
                found,
            } => write!(
                f,
                "expecting an instance of type '{expected}' for '{field}', but got '{found}'"
            ),
            Error::Value { field, reason } => write!(f, "invalid value for '{field}': {reason}"),
            Error::UnsupportedOperation { operation, kind } => {
                write!(f, "'{operation}' is not supported for {kind} dimensions")
            }
            Error::Attribute { kind, attribute } => {
                write!(f, "{kind} dimension has no attribute '{attribute}'")
            }
            Error::NotImplemented { attribute } => {
                write!(f, "the attribute '{attribute}' cannot be modified")
            }
            Error::Json(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::Dimensionality {
            field: String::from("reference_offset"),
            expected: String::from("G"),
            found: String::from("s"),
        };
        assert_eq!(
            err.to_string(),
            "the unit 's' given for 'reference_offset' is inconsistent with the dimension's \
             unit 'G'"
        );

        let err = Error::Attribute {
            kind: "labeled",
            attribute: "increment",
        };
        assert_eq!(err.to_string(), "labeled dimension has no attribute 'increment'");
    }

    #[test]
    fn test_from_json() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
