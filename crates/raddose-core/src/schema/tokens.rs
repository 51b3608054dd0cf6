//! Space-separated token values used by tuple-shaped RADDOSE-3D keywords.
//!
//! Keywords such as `Dimensions`, `UnitCell` or `Collimation` take several
//! whitespace-separated values on one line. Callers either hand over a
//! structured tuple, which is shape-checked per keyword, or a preformatted
//! string that is emitted untouched.

use crate::domain::{RaddoseError, RaddoseResult};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl Scalar {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Integer(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Integer(_) | Self::Real(_) => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => f.write_str(&format_real(*value)),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

/// Renders a real so that integral values keep a trailing `.0`.
pub fn format_real(value: f64) -> String {
    format!("{value:?}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tokens {
    Structured(Vec<Scalar>),
    Preformatted(String),
}

impl Tokens {
    pub fn structured<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Self::Structured(values.into_iter().map(Into::into).collect())
    }

    pub fn render(&self) -> String {
        match self {
            Self::Preformatted(value) => value.clone(),
            Self::Structured(values) => values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn as_structured(&self) -> Option<&[Scalar]> {
        match self {
            Self::Structured(values) => Some(values),
            Self::Preformatted(_) => None,
        }
    }
}

impl Display for Tokens {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Tokens {
    fn from(value: &str) -> Self {
        Self::Preformatted(value.to_string())
    }
}

impl From<String> for Tokens {
    fn from(value: String) -> Self {
        Self::Preformatted(value)
    }
}

impl From<Vec<Scalar>> for Tokens {
    fn from(values: Vec<Scalar>) -> Self {
        Self::Structured(values)
    }
}

impl<const N: usize> From<[f64; N]> for Tokens {
    fn from(values: [f64; N]) -> Self {
        Self::structured(values)
    }
}

impl<const N: usize> From<[i32; N]> for Tokens {
    fn from(values: [i32; N]) -> Self {
        Self::structured(values)
    }
}

/// Builds a structured [`Tokens`] value from heterogeneous elements.
///
/// ```
/// use raddose_core::tokens;
///
/// assert_eq!(tokens!["Zn", 2, "S", 6].render(), "Zn 2 S 6");
/// ```
#[macro_export]
macro_rules! tokens {
    ($($value:expr),* $(,)?) => {
        $crate::schema::Tokens::Structured(vec![$($crate::schema::Scalar::from($value)),*])
    };
}

pub fn normalize_tokens(value: Option<&Tokens>) -> Option<String> {
    value.map(Tokens::render)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenShape {
    NonNegative { arities: &'static [usize] },
    Signed { arities: &'static [usize] },
    /// A label from a fixed set followed by non-negative numbers.
    Labelled {
        labels: &'static [&'static str],
        numbers: usize,
    },
    /// Element symbols and amounts in any arity; amounts are non-negative.
    Composition,
}

impl TokenShape {
    /// Checks a structured value against the shape. Preformatted values only
    /// have to be plain space-separated text.
    pub fn check(self, field: &'static str, value: &Tokens) -> RaddoseResult<()> {
        let elements = match value {
            Tokens::Structured(elements) => elements,
            Tokens::Preformatted(text) if text.contains(':') => {
                return Err(RaddoseError::MalformedTuple {
                    field,
                    detail: format!("'{text}' contains a ':' separator"),
                });
            }
            Tokens::Preformatted(_) => return Ok(()),
        };

        match self {
            Self::NonNegative { arities } => {
                check_arity(field, elements, arities)?;
                for element in elements {
                    check_non_negative_element(field, element)?;
                }
                Ok(())
            }
            Self::Signed { arities } => {
                check_arity(field, elements, arities)?;
                for element in elements {
                    number_element(field, element)?;
                }
                Ok(())
            }
            Self::Labelled { labels, numbers } => {
                check_arity(field, elements, &[numbers + 1])?;
                let label = elements[0].as_text().ok_or_else(|| RaddoseError::MalformedTuple {
                    field,
                    detail: format!("expected a leading label, found '{}'", elements[0]),
                })?;
                if !labels
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(label))
                {
                    return Err(RaddoseError::InvalidEnumValue {
                        field,
                        value: label.to_string(),
                        allowed: labels.iter().map(|allowed| allowed.to_string()).collect(),
                    });
                }
                for element in &elements[1..] {
                    check_non_negative_element(field, element)?;
                }
                Ok(())
            }
            Self::Composition => {
                for element in elements.iter().filter(|element| element.as_text().is_none()) {
                    check_non_negative_element(field, element)?;
                }
                Ok(())
            }
        }
    }
}

fn check_arity(field: &'static str, elements: &[Scalar], arities: &[usize]) -> RaddoseResult<()> {
    if arities.contains(&elements.len()) {
        return Ok(());
    }
    let expected = arities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    Err(RaddoseError::MalformedTuple {
        field,
        detail: format!("expected {} values, found {}", expected, elements.len()),
    })
}

fn number_element(field: &'static str, element: &Scalar) -> RaddoseResult<f64> {
    element.as_number().ok_or_else(|| RaddoseError::MalformedTuple {
        field,
        detail: format!("expected a number, found '{}'", element),
    })
}

fn check_non_negative_element(field: &'static str, element: &Scalar) -> RaddoseResult<()> {
    let number = number_element(field, element)?;
    if number >= 0.0 {
        Ok(())
    } else {
        Err(RaddoseError::OutOfRange {
            field,
            value: element.to_string(),
            constraint: "must be >= 0",
        })
    }
}
