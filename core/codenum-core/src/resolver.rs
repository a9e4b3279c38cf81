//! Relational Representation Resolver
//!
//! Pure decision procedure mapping a field's [`ConversionConfig`] to the storage
//! kind used for it. Native enum kinds win over width-based choices; ordinal
//! storage widens from one byte to two once an enum has more than
//! [`MANY_VALUES_THRESHOLD`] constants.

use crate::config::{NativeEnumSupport, TypeConfiguration};
use crate::types::SqlTypeCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column length sentinel meaning "not specified".
pub const NO_COLUMN_LENGTH: i64 = -1;

/// Largest cardinality still stored in a narrow (one byte) integer.
pub const MANY_VALUES_THRESHOLD: usize = 128;

/// How a field persists its enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumStrategy {
    /// Store the declaration position
    Ordinal,
    /// Store the constant name
    Name,
}

impl EnumStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumStrategy::Ordinal => "ORDINAL",
            EnumStrategy::Name => "NAMED",
        }
    }

    /// Accepts `ordinal`, `name`, `named` and `string`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinal" => Some(EnumStrategy::Ordinal),
            "name" | "named" | "string" => Some(EnumStrategy::Name),
            _ => None,
        }
    }
}

/// Width of an integer representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
}

impl IntWidth {
    /// Number of ordinals `0..n` this width can hold.
    pub fn capacity(self) -> u64 {
        match self {
            IntWidth::I8 => 1 << 7,
            IntWidth::I16 => 1 << 15,
            IntWidth::I32 => 1 << 31,
            IntWidth::I64 => 1 << 63,
        }
    }
}

/// Storage kind chosen for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Representation {
    /// One-byte integer
    NarrowInteger,
    /// Two-byte integer
    WideInteger,
    /// Four-byte integer (explicit `INTEGER` code only)
    Integer,
    /// Eight-byte integer (explicit `BIGINT`/numeric codes only)
    BigInteger,
    /// Engine-native enum column storing ordinals
    OrdinalEnum,
    /// Named native enum type storing ordinals
    NamedOrdinalEnum,
    /// Engine-native enum column storing names
    NativeEnum,
    /// Named native enum type storing names
    NamedEnum,
    /// `CHAR(1)`
    FixedChar,
    /// `NCHAR(1)`
    NationalizedFixedChar,
    VariableChar,
    NationalizedVariableChar,
    LongVariableChar,
}

impl Representation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::NarrowInteger => "narrow-integer",
            Representation::WideInteger => "wide-integer",
            Representation::Integer => "integer",
            Representation::BigInteger => "big-integer",
            Representation::OrdinalEnum => "ordinal-enum",
            Representation::NamedOrdinalEnum => "named-ordinal-enum",
            Representation::NativeEnum => "native-enum",
            Representation::NamedEnum => "named-enum",
            Representation::FixedChar => "fixed-char",
            Representation::NationalizedFixedChar => "nationalized-fixed-char",
            Representation::VariableChar => "variable-char",
            Representation::NationalizedVariableChar => "nationalized-variable-char",
            Representation::LongVariableChar => "long-variable-char",
        }
    }

    pub fn type_code(&self) -> SqlTypeCode {
        match self {
            Representation::NarrowInteger => SqlTypeCode::TINYINT,
            Representation::WideInteger => SqlTypeCode::SMALLINT,
            Representation::Integer => SqlTypeCode::INTEGER,
            Representation::BigInteger => SqlTypeCode::BIGINT,
            Representation::OrdinalEnum => SqlTypeCode::ORDINAL_ENUM,
            Representation::NamedOrdinalEnum => SqlTypeCode::NAMED_ORDINAL_ENUM,
            Representation::NativeEnum => SqlTypeCode::ENUM,
            Representation::NamedEnum => SqlTypeCode::NAMED_ENUM,
            Representation::FixedChar => SqlTypeCode::CHAR,
            Representation::NationalizedFixedChar => SqlTypeCode::NCHAR,
            Representation::VariableChar => SqlTypeCode::VARCHAR,
            Representation::NationalizedVariableChar => SqlTypeCode::NVARCHAR,
            Representation::LongVariableChar => SqlTypeCode::LONGVARCHAR,
        }
    }

    /// Representation for an explicit storage-type code, if the code denotes an
    /// integral or character family type.
    pub fn from_type_code(code: SqlTypeCode) -> Option<Self> {
        let representation = match code {
            SqlTypeCode::TINYINT => Representation::NarrowInteger,
            SqlTypeCode::SMALLINT => Representation::WideInteger,
            SqlTypeCode::INTEGER => Representation::Integer,
            SqlTypeCode::CHAR => Representation::FixedChar,
            SqlTypeCode::NCHAR => Representation::NationalizedFixedChar,
            SqlTypeCode::VARCHAR => Representation::VariableChar,
            SqlTypeCode::NVARCHAR => Representation::NationalizedVariableChar,
            SqlTypeCode::LONGVARCHAR => Representation::LongVariableChar,
            code if code.is_integral() => Representation::BigInteger,
            _ => return None,
        };
        Some(representation)
    }

    /// Integer width of the values stored, for every ordinal-carrying kind.
    pub fn int_width(&self) -> Option<IntWidth> {
        match self {
            Representation::NarrowInteger => Some(IntWidth::I8),
            Representation::WideInteger => Some(IntWidth::I16),
            Representation::Integer
            | Representation::OrdinalEnum
            | Representation::NamedOrdinalEnum => Some(IntWidth::I32),
            Representation::BigInteger => Some(IntWidth::I64),
            _ => None,
        }
    }

    /// Plain integer column (range-checkable).
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Representation::NarrowInteger
                | Representation::WideInteger
                | Representation::Integer
                | Representation::BigInteger
        )
    }

    /// Plain character column (membership-checkable).
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            Representation::FixedChar
                | Representation::NationalizedFixedChar
                | Representation::VariableChar
                | Representation::NationalizedVariableChar
                | Representation::LongVariableChar
        )
    }

    pub fn is_native_enum(&self) -> bool {
        matches!(
            self,
            Representation::OrdinalEnum
                | Representation::NamedOrdinalEnum
                | Representation::NativeEnum
                | Representation::NamedEnum
        )
    }

    /// Whether every ordinal of an enum with `cardinality` constants fits.
    /// Always true for name-carrying kinds.
    pub fn holds_cardinality(&self, cardinality: usize) -> bool {
        self.int_width()
            .is_none_or(|width| cardinality as u64 <= width.capacity())
    }

    /// Whether values of this kind are ordinals (as opposed to names).
    pub fn carries_ordinals(&self) -> bool {
        self.int_width().is_some()
    }

    pub fn is_nationalized(&self) -> bool {
        matches!(
            self,
            Representation::NationalizedFixedChar | Representation::NationalizedVariableChar
        )
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals consulted when resolving one field's representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Declared strategy; `None` resolves as ordinal
    pub strategy: Option<EnumStrategy>,
    /// Declared column length or [`NO_COLUMN_LENGTH`]
    pub column_length: i64,
    pub nationalized: bool,
    pub prefer_native_enum_types: bool,
    /// Declared constant count of the enum type
    pub cardinality: usize,
    /// Native kinds the target engine registers
    pub native_enum_support: NativeEnumSupport,
}

impl ConversionConfig {
    pub fn new(cardinality: usize) -> Self {
        Self {
            strategy: None,
            column_length: NO_COLUMN_LENGTH,
            nationalized: false,
            prefer_native_enum_types: false,
            cardinality,
            native_enum_support: NativeEnumSupport::none(),
        }
    }

    /// Seed the process-level indicators from a type configuration.
    pub fn from_type_configuration(config: &TypeConfiguration, cardinality: usize) -> Self {
        Self {
            strategy: config.default_strategy,
            nationalized: config.nationalized,
            prefer_native_enum_types: config.prefer_native_enum_types,
            native_enum_support: config.native_enum_support,
            ..Self::new(cardinality)
        }
    }

    pub fn with_strategy(mut self, strategy: EnumStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_column_length(mut self, length: i64) -> Self {
        self.column_length = length;
        self
    }

    pub fn with_nationalized(mut self, nationalized: bool) -> Self {
        self.nationalized = nationalized;
        self
    }

    pub fn with_prefer_native_enum_types(mut self, prefer: bool) -> Self {
        self.prefer_native_enum_types = prefer;
        self
    }

    pub fn with_native_enum_support(mut self, support: NativeEnumSupport) -> Self {
        self.native_enum_support = support;
        self
    }

    pub fn effective_strategy(&self) -> EnumStrategy {
        self.strategy.unwrap_or(EnumStrategy::Ordinal)
    }

    /// More constants than fit one signed byte of ordinals.
    pub fn has_many_values(&self) -> bool {
        self.cardinality > MANY_VALUES_THRESHOLD
    }
}

/// Resolve the storage representation for a field.
pub fn resolve(config: &ConversionConfig) -> Representation {
    let native = &config.native_enum_support;
    let prefer = config.prefer_native_enum_types;

    match config.effective_strategy() {
        EnumStrategy::Ordinal => {
            if prefer && native.ordinal_enum {
                Representation::OrdinalEnum
            } else if prefer && native.named_ordinal_enum {
                Representation::NamedOrdinalEnum
            } else if config.has_many_values() {
                Representation::WideInteger
            } else {
                Representation::NarrowInteger
            }
        }
        EnumStrategy::Name => {
            if native.enum_kind {
                Representation::NativeEnum
            } else if prefer && native.named_enum {
                Representation::NamedEnum
            } else if config.column_length == 1 {
                if config.nationalized {
                    Representation::NationalizedFixedChar
                } else {
                    Representation::FixedChar
                }
            } else if config.nationalized {
                Representation::NationalizedVariableChar
            } else {
                Representation::VariableChar
            }
        }
    }
}
