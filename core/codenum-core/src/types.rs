//! SQL type codes, the integer vocabulary shared with the host storage layer.
//!
//! Codes follow the JDBC numbering so that an explicit `type` parameter taken
//! from a mapping file means the same thing here as it does to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer type code of a relational column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqlTypeCode(pub i32);

impl SqlTypeCode {
    pub const BIT: Self = Self(-7);
    pub const TINYINT: Self = Self(-6);
    pub const SMALLINT: Self = Self(5);
    pub const INTEGER: Self = Self(4);
    pub const BIGINT: Self = Self(-5);
    pub const FLOAT: Self = Self(6);
    pub const REAL: Self = Self(7);
    pub const DOUBLE: Self = Self(8);
    pub const NUMERIC: Self = Self(2);
    pub const DECIMAL: Self = Self(3);
    pub const CHAR: Self = Self(1);
    pub const VARCHAR: Self = Self(12);
    pub const LONGVARCHAR: Self = Self(-1);
    pub const NCHAR: Self = Self(-15);
    pub const NVARCHAR: Self = Self(-9);
    pub const DATE: Self = Self(91);
    pub const BLOB: Self = Self(2004);

    /// Engine-native string enum column
    pub const ENUM: Self = Self(6000);
    /// Named (user-defined) native enum type
    pub const NAMED_ENUM: Self = Self(6001);
    /// Engine-native enum column storing ordinals
    pub const ORDINAL_ENUM: Self = Self(6002);
    /// Named native enum type storing ordinals
    pub const NAMED_ORDINAL_ENUM: Self = Self(6003);

    /// Codes an ordinal codec may store into.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::NUMERIC
                | Self::SMALLINT
                | Self::TINYINT
                | Self::BIGINT
                | Self::DECIMAL
                | Self::DOUBLE
                | Self::FLOAT
        )
    }

    /// Codes a named codec may store into.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            Self::CHAR | Self::VARCHAR | Self::LONGVARCHAR | Self::NCHAR | Self::NVARCHAR
        )
    }

    pub fn is_native_enum(self) -> bool {
        matches!(
            self,
            Self::ENUM | Self::NAMED_ENUM | Self::ORDINAL_ENUM | Self::NAMED_ORDINAL_ENUM
        )
    }

    /// Human-readable name, when the code is one we know.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::BIT => "BIT",
            Self::TINYINT => "TINYINT",
            Self::SMALLINT => "SMALLINT",
            Self::INTEGER => "INTEGER",
            Self::BIGINT => "BIGINT",
            Self::FLOAT => "FLOAT",
            Self::REAL => "REAL",
            Self::DOUBLE => "DOUBLE",
            Self::NUMERIC => "NUMERIC",
            Self::DECIMAL => "DECIMAL",
            Self::CHAR => "CHAR",
            Self::VARCHAR => "VARCHAR",
            Self::LONGVARCHAR => "LONGVARCHAR",
            Self::NCHAR => "NCHAR",
            Self::NVARCHAR => "NVARCHAR",
            Self::DATE => "DATE",
            Self::BLOB => "BLOB",
            Self::ENUM => "ENUM",
            Self::NAMED_ENUM => "NAMED_ENUM",
            Self::ORDINAL_ENUM => "ORDINAL_ENUM",
            Self::NAMED_ORDINAL_ENUM => "NAMED_ORDINAL_ENUM",
            _ => return None,
        };
        Some(name)
    }

    /// Parse a code written as decimal, `0x`/`0X`/`#` hexadecimal or
    /// leading-zero octal, with an optional sign.
    pub fn decode(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (radix, digits) = if let Some(hex) = body
            .strip_prefix("0x")
            .or_else(|| body.strip_prefix("0X"))
            .or_else(|| body.strip_prefix('#'))
        {
            (16, hex)
        } else if body.len() > 1 && body.starts_with('0') {
            (8, &body[1..])
        } else {
            (10, body)
        };

        // a second sign after the prefix is malformed
        if digits.is_empty() || digits.starts_with(['-', '+']) {
            return None;
        }

        let magnitude = i64::from_str_radix(digits, radix).ok()?;
        let value = if negative { -magnitude } else { magnitude };
        i32::try_from(value).ok().map(Self)
    }
}

impl fmt::Display for SqlTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
