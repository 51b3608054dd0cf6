//! Untyped field records and the per-field tables that bind them to the
//! typed specs.

use super::tokens::{Scalar, Tokens, format_real};
use crate::domain::{RaddoseError, RaddoseResult, Section};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "string",
            Self::List(_) => "list",
        }
    }

    pub fn from_json(field: &str, value: &Value) -> RaddoseResult<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(flag) => Ok(Self::Bool(*flag)),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Ok(Self::Integer(integer))
                } else if let Some(real) = number.as_f64() {
                    Ok(Self::Real(real))
                } else {
                    Err(RaddoseError::Document(format!(
                        "field '{}' holds a number outside the supported range: {}",
                        field, number
                    )))
                }
            }
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| Self::from_json(field, item))
                .collect::<RaddoseResult<Vec<_>>>()
                .map(Self::List),
            Value::Object(_) => Err(RaddoseError::Document(format!(
                "field '{}' must not be an object",
                field
            ))),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRecord {
    entries: Vec<(String, FieldValue)>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing an earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_object(section: Section, value: &Value) -> RaddoseResult<Self> {
        let Value::Object(map) = value else {
            return Err(RaddoseError::Document(format!(
                "'{}' must be an object of field names to values",
                section
            )));
        };

        let mut record = Self::new();
        for (name, value) in map {
            record.insert(name.clone(), FieldValue::from_json(name, value)?);
        }
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    pub reject_unknown_fields: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            reject_unknown_fields: true,
        }
    }
}

/// Conversion between raw field values, typed members and wire text.
pub trait FieldCodec: Sized {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self>;

    fn encode(&self) -> Option<String>;
}

impl<T: FieldCodec> FieldCodec for Option<T> {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::decode(field, other).map(Some),
        }
    }

    fn encode(&self) -> Option<String> {
        self.as_ref().and_then(FieldCodec::encode)
    }
}

impl FieldCodec for f64 {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        match value {
            FieldValue::Integer(integer) => Ok(*integer as f64),
            FieldValue::Real(real) => Ok(*real),
            other => Err(type_error(field, "number", other)),
        }
    }

    fn encode(&self) -> Option<String> {
        Some(format_real(*self))
    }
}

impl FieldCodec for i64 {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        match value {
            FieldValue::Integer(integer) => Ok(*integer),
            FieldValue::Real(real) if real.fract() == 0.0 => Ok(*real as i64),
            other => Err(type_error(field, "integer", other)),
        }
    }

    fn encode(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FieldCodec for u64 {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        let integer = i64::decode(field, value)?;
        u64::try_from(integer).map_err(|_| RaddoseError::OutOfRange {
            field,
            value: integer.to_string(),
            constraint: "must be >= 0",
        })
    }

    fn encode(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl FieldCodec for bool {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        match value {
            FieldValue::Bool(flag) => Ok(*flag),
            FieldValue::Text(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            FieldValue::Text(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(type_error(field, "boolean", other)),
        }
    }

    fn encode(&self) -> Option<String> {
        Some(if *self { "TRUE" } else { "FALSE" }.to_string())
    }
}

impl FieldCodec for String {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        match value {
            FieldValue::Text(text) => Ok(text.clone()),
            other => Err(type_error(field, "string", other)),
        }
    }

    fn encode(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl FieldCodec for Tokens {
    fn decode(field: &'static str, value: &FieldValue) -> RaddoseResult<Self> {
        match value {
            FieldValue::Text(text) => Ok(Tokens::Preformatted(text.clone())),
            FieldValue::List(items) => items
                .iter()
                .map(|item| match item {
                    FieldValue::Text(text) => Ok(Scalar::Text(text.clone())),
                    FieldValue::Integer(integer) => Ok(Scalar::Integer(*integer)),
                    FieldValue::Real(real) => Ok(Scalar::Real(*real)),
                    other => Err(RaddoseError::MalformedTuple {
                        field,
                        detail: format!("tuple elements must be scalars, found {}", other.kind()),
                    }),
                })
                .collect::<RaddoseResult<Vec<_>>>()
                .map(Tokens::Structured),
            other => Err(type_error(field, "list or string", other)),
        }
    }

    fn encode(&self) -> Option<String> {
        Some(self.render())
    }
}

pub(crate) fn type_error(field: &'static str, expected: &'static str, found: &FieldValue) -> RaddoseError {
    RaddoseError::InvalidFieldType {
        field,
        expected,
        found: found.kind(),
    }
}

pub struct FieldDef<T> {
    pub name: &'static str,
    pub assign: fn(&mut T, &FieldValue) -> RaddoseResult<()>,
    pub render: fn(&T) -> Option<String>,
    pub validate: fn(&T) -> RaddoseResult<()>,
}

/// Declares a [`FieldDef`] for `$member`, optionally constrained.
macro_rules! field {
    (@def $spec:ty, $name:literal, $member:ident, $validate:expr) => {
        $crate::schema::record::FieldDef::<$spec> {
            name: $name,
            assign: |spec: &mut $spec, value| {
                spec.$member = $crate::schema::record::FieldCodec::decode($name, value)?;
                Ok(())
            },
            render: |spec: &$spec| $crate::schema::record::FieldCodec::encode(&spec.$member),
            validate: $validate,
        }
    };
    ($spec:ty, $name:literal, $member:ident) => {
        $crate::schema::record::field!(@def $spec, $name, $member, |_spec: &$spec| Ok(()))
    };
    ($spec:ty, $name:literal, $member:ident, non_negative) => {
        $crate::schema::record::field!(@def $spec, $name, $member, |spec: &$spec| {
            $crate::schema::record::check_non_negative($name, spec.$member)
        })
    };
    ($spec:ty, $name:literal, $member:ident, shape = $shape:expr) => {
        $crate::schema::record::field!(@def $spec, $name, $member, |spec: &$spec| {
            $crate::schema::record::check_shape($name, $shape, &spec.$member)
        })
    };
}

pub(crate) use field;

pub trait RealValue: Copy {
    fn real(self) -> Option<f64>;
}

impl RealValue for f64 {
    fn real(self) -> Option<f64> {
        Some(self)
    }
}

impl RealValue for Option<f64> {
    fn real(self) -> Option<f64> {
        self
    }
}

pub fn check_non_negative(field: &'static str, value: impl RealValue) -> RaddoseResult<()> {
    match value.real() {
        Some(number) if number.is_nan() || number < 0.0 => Err(RaddoseError::OutOfRange {
            field,
            value: format_real(number),
            constraint: "must be >= 0",
        }),
        _ => Ok(()),
    }
}

pub trait TokenValue {
    fn tokens(&self) -> Option<&Tokens>;
}

impl TokenValue for Tokens {
    fn tokens(&self) -> Option<&Tokens> {
        Some(self)
    }
}

impl TokenValue for Option<Tokens> {
    fn tokens(&self) -> Option<&Tokens> {
        self.as_ref()
    }
}

pub fn check_shape(
    field: &'static str,
    shape: super::tokens::TokenShape,
    value: &impl TokenValue,
) -> RaddoseResult<()> {
    match value.tokens() {
        Some(tokens) => shape.check(field, tokens),
        None => Ok(()),
    }
}

pub(crate) fn apply_record<T>(
    section: Section,
    table: &[FieldDef<T>],
    record: &FieldRecord,
    options: SchemaOptions,
    spec: &mut T,
) -> RaddoseResult<()> {
    for (name, value) in record.iter() {
        match table.iter().find(|def| def.name == name) {
            Some(def) => (def.assign)(spec, value)?,
            None if options.reject_unknown_fields => {
                return Err(RaddoseError::UnknownField {
                    section,
                    field: name.to_string(),
                });
            }
            None => tracing::warn!(%section, field = name, "ignoring unknown field"),
        }
    }
    Ok(())
}

/// Decodes a required field, treating `null` as missing.
pub(crate) fn required<V: FieldCodec>(
    section: Section,
    field: &'static str,
    record: &FieldRecord,
) -> RaddoseResult<V> {
    match record.get(field) {
        None | Some(FieldValue::Null) => Err(RaddoseError::MissingRequiredField { section, field }),
        Some(value) => V::decode(field, value),
    }
}

/// Runs every field validator in schema order. Each rendered value must
/// stay on its keyword's line.
pub(crate) fn validate_fields<T>(table: &[FieldDef<T>], spec: &T) -> RaddoseResult<()> {
    table.iter().try_for_each(|def| {
        (def.validate)(spec)?;
        match (def.render)(spec) {
            Some(text) if text.contains(['\n', '\r']) => {
                Err(RaddoseError::LineBreakInValue { field: def.name })
            }
            _ => Ok(()),
        }
    })
}

pub(crate) fn render_fields<T>(table: &[FieldDef<T>], spec: &T) -> Vec<(&'static str, String)> {
    table
        .iter()
        .filter_map(|def| (def.render)(spec).map(|value| (def.name, value)))
        .collect()
}
