//! Codec strategies: domain ⇄ relational conversion for enum values.
//!
//! Two variants share one capability set (`encode`, `decode`, `sql_literal`):
//! [`OrdinalCodec`] stores declaration positions, [`NamedCodec`] stores names.
//! The variant is picked once when a field is bound. `None` maps to `None` in
//! both directions without touching the registry.

use crate::error::{CodenumError, CodenumResult};
use crate::io::{ValueReader, ValueWriter};
use crate::registry::{EnumType, EnumValue, UNDEFINED_ORDINAL};
use crate::resolver::{EnumStrategy, IntWidth, Representation};
use std::fmt;

/// A value in the native form of a relational representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationalValue {
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Text(String),
}

impl RelationalValue {
    /// Integer payload, widened.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RelationalValue::TinyInt(v) => Some(i64::from(*v)),
            RelationalValue::SmallInt(v) => Some(i64::from(*v)),
            RelationalValue::Int(v) => Some(i64::from(*v)),
            RelationalValue::BigInt(v) => Some(*v),
            RelationalValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RelationalValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            RelationalValue::Text(_) => "text",
            _ => "integer",
        }
    }

    /// Integer of the given width, or `None` when `value` does not fit.
    pub fn integer(value: i64, width: IntWidth) -> Option<Self> {
        match width {
            IntWidth::I8 => i8::try_from(value).ok().map(RelationalValue::TinyInt),
            IntWidth::I16 => i16::try_from(value).ok().map(RelationalValue::SmallInt),
            IntWidth::I32 => i32::try_from(value).ok().map(RelationalValue::Int),
            IntWidth::I64 => Some(RelationalValue::BigInt(value)),
        }
    }

    /// Convert into the native form of `representation`. Integers are
    /// re-width'd, text stays text; crossing families is a type mismatch.
    pub fn coerce(self, representation: Representation) -> CodenumResult<Self> {
        match (representation.int_width(), self) {
            (Some(width), value) => {
                let n = value.as_i64().ok_or_else(|| mismatch("integer", &value))?;
                Self::integer(n, width).ok_or_else(|| CodenumError::TypeMismatch {
                    expected: representation.to_string(),
                    actual: format!("integer {n}"),
                })
            }
            (None, value @ RelationalValue::Text(_)) => Ok(value),
            (None, value) => Err(mismatch("text", &value)),
        }
    }

    /// Inline SQL literal.
    pub fn to_sql_literal(&self) -> String {
        match self {
            RelationalValue::Text(s) => quote_literal(s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for RelationalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationalValue::TinyInt(v) => write!(f, "{v}"),
            RelationalValue::SmallInt(v) => write!(f, "{v}"),
            RelationalValue::Int(v) => write!(f, "{v}"),
            RelationalValue::BigInt(v) => write!(f, "{v}"),
            RelationalValue::Text(s) => f.write_str(s),
        }
    }
}

pub(crate) fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn mismatch(expected: &str, actual: &RelationalValue) -> CodenumError {
    CodenumError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.family().to_string(),
    }
}

fn foreign_value(enum_type: &EnumType, value: &EnumValue) -> CodenumError {
    CodenumError::TypeMismatch {
        expected: enum_type.name().to_string(),
        actual: value.enum_type().to_string(),
    }
}

/// Stores the declaration position of each constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalCodec {
    enum_type: EnumType,
    representation: Representation,
    width: IntWidth,
}

impl OrdinalCodec {
    /// Fails when `representation` does not carry ordinals.
    pub fn new(enum_type: EnumType, representation: Representation) -> CodenumResult<Self> {
        let width = representation.int_width().ok_or_else(|| {
            CodenumError::configuration(
                enum_type.name(),
                format!("{representation} cannot store ordinals"),
            )
        })?;
        Ok(Self {
            enum_type,
            representation,
            width,
        })
    }

    pub fn encode(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>> {
        let Some(value) = value else {
            return Ok(None);
        };
        if !self.enum_type.owns(value) {
            return Err(foreign_value(&self.enum_type, value));
        }
        if value.ordinal() == UNDEFINED_ORDINAL {
            return Err(CodenumError::configuration(
                self.enum_type.name(),
                format!(
                    "constant '{}' was synthesized from a name and has no ordinal",
                    value.name()
                ),
            ));
        }
        RelationalValue::integer(i64::from(value.ordinal()), self.width)
            .map(Some)
            .ok_or_else(|| {
                CodenumError::configuration(
                    self.enum_type.name(),
                    format!(
                        "ordinal {} of constant '{}' does not fit {}",
                        value.ordinal(),
                        value.name(),
                        self.representation
                    ),
                )
            })
    }

    pub fn decode(&self, value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
        let Some(value) = value else {
            return Ok(None);
        };
        let n = value.as_i64().ok_or_else(|| mismatch("integer", value))?;
        let ordinal = i32::try_from(n).map_err(|_| CodenumError::TypeMismatch {
            expected: "ordinal".to_string(),
            actual: format!("integer {n}"),
        })?;

        Ok(Some(
            self.enum_type
                .lookup_by_ordinal(ordinal)
                .unwrap_or_else(|| self.enum_type.register_unknown_by_ordinal(ordinal)),
        ))
    }

    pub fn sql_literal(&self, value: &EnumValue) -> String {
        value.ordinal().to_string()
    }
}

/// Stores the name of each constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCodec {
    enum_type: EnumType,
    representation: Representation,
}

impl NamedCodec {
    /// Fails when `representation` carries ordinals.
    pub fn new(enum_type: EnumType, representation: Representation) -> CodenumResult<Self> {
        if representation.carries_ordinals() {
            return Err(CodenumError::configuration(
                enum_type.name(),
                format!("{representation} cannot store names"),
            ));
        }
        Ok(Self {
            enum_type,
            representation,
        })
    }

    pub fn encode(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>> {
        let Some(value) = value else {
            return Ok(None);
        };
        if !self.enum_type.owns(value) {
            return Err(foreign_value(&self.enum_type, value));
        }
        Ok(Some(RelationalValue::Text(value.name().to_string())))
    }

    /// Surrounding whitespace is ignored (`CHAR` columns pad); matching is
    /// otherwise case-sensitive.
    pub fn decode(&self, value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
        let Some(value) = value else {
            return Ok(None);
        };
        let name = value.as_str().ok_or_else(|| mismatch("text", value))?.trim();

        Ok(Some(
            self.enum_type
                .lookup_by_name(name)
                .unwrap_or_else(|| self.enum_type.register_unknown_by_name(name)),
        ))
    }

    pub fn sql_literal(&self, value: &EnumValue) -> String {
        quote_literal(value.name())
    }
}

/// Conversion strategy bound to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    Ordinal(OrdinalCodec),
    Named(NamedCodec),
}

impl Codec {
    /// Build the codec for `strategy` over `representation`.
    pub fn new(
        strategy: EnumStrategy,
        enum_type: EnumType,
        representation: Representation,
    ) -> CodenumResult<Self> {
        Ok(match strategy {
            EnumStrategy::Ordinal => Codec::Ordinal(OrdinalCodec::new(enum_type, representation)?),
            EnumStrategy::Name => Codec::Named(NamedCodec::new(enum_type, representation)?),
        })
    }

    pub fn strategy(&self) -> EnumStrategy {
        match self {
            Codec::Ordinal(_) => EnumStrategy::Ordinal,
            Codec::Named(_) => EnumStrategy::Name,
        }
    }

    pub fn is_ordinal(&self) -> bool {
        matches!(self, Codec::Ordinal(_))
    }

    pub fn enum_type(&self) -> &EnumType {
        match self {
            Codec::Ordinal(c) => &c.enum_type,
            Codec::Named(c) => &c.enum_type,
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            Codec::Ordinal(c) => c.representation,
            Codec::Named(c) => c.representation,
        }
    }

    pub fn encode(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>> {
        match self {
            Codec::Ordinal(c) => c.encode(value),
            Codec::Named(c) => c.encode(value),
        }
    }

    pub fn decode(&self, value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
        match self {
            Codec::Ordinal(c) => c.decode(value),
            Codec::Named(c) => c.decode(value),
        }
    }

    pub fn sql_literal(&self, value: &EnumValue) -> String {
        match self {
            Codec::Ordinal(c) => c.sql_literal(value),
            Codec::Named(c) => c.sql_literal(value),
        }
    }

    /// Parse the textual form of a relational value of this codec's family.
    pub fn parse_relational(&self, text: &str) -> CodenumResult<RelationalValue> {
        match self {
            Codec::Ordinal(c) => {
                let n: i64 = text.trim().parse().map_err(|_| CodenumError::TypeMismatch {
                    expected: "integer".to_string(),
                    actual: format!("'{text}'"),
                })?;
                RelationalValue::BigInt(n).coerce(c.representation)
            }
            Codec::Named(_) => Ok(RelationalValue::Text(text.to_string())),
        }
    }

    /// Read position `position` through `reader` and decode it.
    pub fn read(
        &self,
        reader: &dyn ValueReader,
        position: usize,
    ) -> CodenumResult<Option<EnumValue>> {
        let relational = reader.read(position, self.representation())?;
        self.decode(relational.as_ref())
    }

    /// Encode `value` and write it at `position` through `writer`.
    pub fn write(
        &self,
        writer: &mut dyn ValueWriter,
        value: Option<&EnumValue>,
        position: usize,
    ) -> CodenumResult<()> {
        let relational = self.encode(value)?;
        writer.write(relational, position, self.representation())
    }
}
