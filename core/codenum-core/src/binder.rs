//! Configuration Binder
//!
//! Turns the raw parameters of one enum-typed field into a fixed
//! ([`Representation`], conversion) pair. Precedence:
//!
//! 1. explicit storage-type code (`type`): used as the representation as-is;
//!    integral codes get the ordinal codec, character codes the named codec
//! 2. `useNamed` flag: picks the strategy, the resolver picks the storage
//! 3. field metadata (strategy, map-key strategy, column length,
//!    nationalization), fed to the resolver; no strategy means ordinal
//!
//! [`EnumFieldType`] holds a binding for the lifetime of a mapped field and
//! guards every operation against use before a successful bind.

use crate::codec::{Codec, RelationalValue};
use crate::config::TypeConfiguration;
use crate::constraint::{ConstraintSource, EnumeratedValueConverter, check_constraint};
use crate::error::{CodenumError, CodenumResult};
use crate::io::{ValueReader, ValueWriter};
use crate::registry::{EnumRegistry, EnumValue};
use crate::resolver::{ConversionConfig, EnumStrategy, NO_COLUMN_LENGTH, Representation, resolve};
use crate::types::SqlTypeCode;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Parameter key naming the enum type.
pub const ENUM_CLASS: &str = "enumClass";
/// Parameter key of the boolean named-storage switch.
pub const USE_NAMED: &str = "useNamed";
/// Parameter key of the explicit storage-type code.
pub const TYPE: &str = "type";

const UNBOUND: &str = "<unbound>";

/// Field-level signals gathered by the host's mapping front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMetadata {
    /// Enum type of the field (or of the collection element)
    pub enum_type: Option<String>,
    pub strategy: Option<EnumStrategy>,
    /// Field is the key of a map
    pub map_key: bool,
    /// Strategy declared for the map key; wins over `strategy` on map keys
    pub map_key_strategy: Option<EnumStrategy>,
    /// `None` when the mapping declares no length
    pub column_length: Option<i64>,
    pub nationalized: bool,
    /// Element-level signals of a collection field
    pub element: Option<Box<FieldMetadata>>,
}

impl FieldMetadata {
    pub fn new(enum_type: impl Into<String>) -> Self {
        Self {
            enum_type: Some(enum_type.into()),
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: EnumStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_map_key_strategy(mut self, strategy: EnumStrategy) -> Self {
        self.map_key = true;
        self.map_key_strategy = Some(strategy);
        self
    }

    pub fn with_column_length(mut self, length: i64) -> Self {
        self.column_length = Some(length);
        self
    }

    pub fn with_nationalized(mut self, nationalized: bool) -> Self {
        self.nationalized = nationalized;
        self
    }

    pub fn with_element(mut self, element: FieldMetadata) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    /// Declared strategy, honouring the map-key override.
    pub fn declared_strategy(&self) -> Option<EnumStrategy> {
        match self.map_key_strategy {
            Some(strategy) if self.map_key => Some(strategy),
            _ => self.strategy,
        }
    }

    /// Resolver input for this field.
    pub fn conversion_config(
        &self,
        config: &TypeConfiguration,
        cardinality: usize,
    ) -> ConversionConfig {
        let base = ConversionConfig::from_type_configuration(config, cardinality)
            .with_column_length(self.column_length.unwrap_or(NO_COLUMN_LENGTH))
            .with_nationalized(config.nationalized || self.nationalized);
        match self.declared_strategy() {
            Some(strategy) => base.with_strategy(strategy),
            None => base,
        }
    }
}

/// Raw parameter bag for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pub enum_type: Option<String>,
    pub use_named: Option<bool>,
    pub type_code: Option<SqlTypeCode>,
    pub metadata: Option<FieldMetadata>,
}

impl Parameters {
    pub fn for_enum(enum_type: impl Into<String>) -> Self {
        Self {
            enum_type: Some(enum_type.into()),
            ..Self::default()
        }
    }

    pub fn with_use_named(mut self, use_named: bool) -> Self {
        self.use_named = Some(use_named);
        self
    }

    pub fn with_type_code(mut self, code: SqlTypeCode) -> Self {
        self.type_code = Some(code);
        self
    }

    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Parse string properties (`enumClass`, `useNamed`, `type`). Unknown keys
    /// are ignored.
    pub fn from_properties<I, K, V>(properties: I) -> CodenumResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut enum_type = None;
        let mut raw_named = None;
        let mut raw_type = None;

        for (key, value) in properties {
            let value = value.as_ref().to_string();
            match key.as_ref() {
                ENUM_CLASS => enum_type = Some(value),
                USE_NAMED => raw_named = Some(value),
                TYPE => raw_type = Some(value),
                _ => {}
            }
        }

        let label = enum_type.as_deref().unwrap_or(UNBOUND);

        let use_named = raw_named
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(CodenumError::configuration(
                    label,
                    format!("{USE_NAMED} must be true or false, got '{raw}'"),
                )),
            })
            .transpose()?;

        let type_code = raw_type
            .map(|raw| {
                SqlTypeCode::decode(&raw).ok_or_else(|| {
                    CodenumError::configuration(
                        label,
                        format!("{TYPE} must be an integer type code, got '{raw}'"),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            enum_type,
            use_named,
            type_code,
            metadata: None,
        })
    }

    /// Enum type named by the metadata, else by `enumClass`.
    pub fn enum_type_name(&self) -> CodenumResult<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.enum_type.as_deref())
            .or(self.enum_type.as_deref())
            .ok_or_else(|| CodenumError::configuration(UNBOUND, "no enum type referenced"))
    }

    /// Parameters describing the element of a collection field.
    pub fn element(&self) -> CodenumResult<Parameters> {
        let element = self
            .metadata
            .as_ref()
            .and_then(|m| m.element.as_deref())
            .ok_or_else(|| {
                CodenumError::configuration(
                    self.enum_type_name().unwrap_or(UNBOUND),
                    "field carries no element metadata",
                )
            })?;

        Ok(Parameters {
            enum_type: self.enum_type.clone(),
            use_named: None,
            type_code: None,
            metadata: Some(element.clone()),
        })
    }
}

/// How a bound field converts values.
#[derive(Clone)]
pub enum Conversion {
    Codec(Codec),
    /// Host-supplied converter; bypasses codec selection
    External(Arc<dyn EnumeratedValueConverter>),
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Codec(codec) => f.debug_tuple("Codec").field(codec).finish(),
            Conversion::External(_) => f.write_str("External(..)"),
        }
    }
}

/// The (representation, conversion) pair fixed for one field.
#[derive(Debug, Clone)]
pub struct Binding {
    representation: Representation,
    conversion: Conversion,
}

impl Binding {
    pub fn from_codec(codec: Codec) -> Self {
        Self {
            representation: codec.representation(),
            conversion: Conversion::Codec(codec),
        }
    }

    pub fn external(
        converter: Arc<dyn EnumeratedValueConverter>,
        representation: Representation,
    ) -> Self {
        Self {
            representation,
            conversion: Conversion::External(converter),
        }
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    pub fn codec(&self) -> Option<&Codec> {
        match &self.conversion {
            Conversion::Codec(codec) => Some(codec),
            Conversion::External(_) => None,
        }
    }

    pub fn is_ordinal(&self) -> bool {
        self.codec().is_some_and(Codec::is_ordinal)
    }

    pub fn encode(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>> {
        match &self.conversion {
            Conversion::Codec(codec) => codec.encode(value),
            Conversion::External(converter) => converter.to_relational(value),
        }
    }

    pub fn decode(&self, value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
        match &self.conversion {
            Conversion::Codec(codec) => codec.decode(value),
            Conversion::External(converter) => converter.to_domain(value),
        }
    }

    pub fn sql_literal(&self, value: &EnumValue) -> CodenumResult<String> {
        match &self.conversion {
            Conversion::Codec(codec) => Ok(codec.sql_literal(value)),
            Conversion::External(converter) => Ok(converter
                .to_relational(Some(value))?
                .map_or_else(|| "null".to_string(), |v| v.to_sql_literal())),
        }
    }

    pub fn check_constraint(&self, column: &str) -> Option<String> {
        let source = match &self.conversion {
            Conversion::Codec(codec) => ConstraintSource::Codec(codec),
            Conversion::External(converter) => ConstraintSource::Converter(converter.as_ref()),
        };
        check_constraint(column, self.representation, source)
    }

    /// Same representation and the same conversion (codec by value, external
    /// converter by identity).
    fn same_as(&self, other: &Binding) -> bool {
        self.representation == other.representation
            && match (&self.conversion, &other.conversion) {
                (Conversion::Codec(a), Conversion::Codec(b)) => a == b,
                (Conversion::External(a), Conversion::External(b)) => {
                    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
                }
                _ => false,
            }
    }

    fn label(&self) -> String {
        match &self.conversion {
            Conversion::Codec(codec) => codec.enum_type().name().to_string(),
            Conversion::External(_) => "<external>".to_string(),
        }
    }

    fn describe(&self) -> String {
        let kind = match &self.conversion {
            Conversion::Codec(codec) => codec.strategy().as_str(),
            Conversion::External(_) => "EXTERNAL",
        };
        format!("{} ({kind})", self.representation)
    }
}

/// Bind one field: resolve its enum type, representation and codec.
pub fn bind(
    registry: &EnumRegistry,
    config: &TypeConfiguration,
    params: &Parameters,
) -> CodenumResult<Binding> {
    let name = params.enum_type_name()?;
    let enum_type = registry.enum_type(name).map_err(|err| match err {
        CodenumError::UnknownEnumType(missing) => {
            CodenumError::configuration(missing, "enum type reference cannot be resolved")
        }
        other => other,
    })?;
    let cardinality = enum_type.cardinality();

    let (strategy, representation) = if let Some(code) = params.type_code {
        let representation = Representation::from_type_code(code).ok_or_else(|| {
            CodenumError::configuration(
                name,
                format!("passed type code [{code}] not recognized as numeric nor character"),
            )
        })?;
        let strategy = if code.is_integral() {
            EnumStrategy::Ordinal
        } else {
            EnumStrategy::Name
        };
        (strategy, representation)
    } else {
        let conversion = match params.use_named {
            Some(use_named) => {
                let strategy = if use_named {
                    EnumStrategy::Name
                } else {
                    EnumStrategy::Ordinal
                };
                ConversionConfig::from_type_configuration(config, cardinality).with_strategy(strategy)
            }
            None => params
                .metadata
                .clone()
                .unwrap_or_default()
                .conversion_config(config, cardinality),
        };
        (conversion.effective_strategy(), resolve(&conversion))
    };

    if !representation.holds_cardinality(cardinality) {
        return Err(CodenumError::configuration(
            name,
            format!("{cardinality} constants do not fit {representation}"),
        ));
    }

    let codec = Codec::new(strategy, enum_type, representation)?;

    debug!(
        enum_type = %name,
        representation = %representation,
        "Using {}-based conversion for enum {}",
        strategy.as_str(),
        name
    );

    Ok(Binding::from_codec(codec))
}

/// Bind the element of a collection field from its element-level metadata.
pub fn bind_element(
    registry: &EnumRegistry,
    config: &TypeConfiguration,
    params: &Parameters,
) -> CodenumResult<Binding> {
    bind(registry, config, &params.element()?)
}

/// Enum-typed field of a mapped entity.
///
/// Starts unbound; [`configure`](Self::configure) fixes its binding once.
/// Everything else fails with [`CodenumError::NotConfigured`] until then.
#[derive(Debug, Default)]
pub struct EnumFieldType {
    binding: OnceLock<Binding>,
    /// Enum type the field was declared or configured for
    enum_type: OnceLock<String>,
}

impl EnumFieldType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbound field that names `enum_type` in its errors.
    pub fn for_enum(enum_type: impl Into<String>) -> Self {
        let field = Self::default();
        let _ = field.enum_type.set(enum_type.into());
        field
    }

    /// Bind from parameters. Re-binding with an equivalent configuration
    /// returns the existing binding; a different one is a configuration error.
    pub fn configure(
        &self,
        registry: &EnumRegistry,
        config: &TypeConfiguration,
        params: &Parameters,
    ) -> CodenumResult<&Binding> {
        if let Ok(name) = params.enum_type_name() {
            let _ = self.enum_type.set(name.to_string());
        }
        self.install(bind(registry, config, params)?)
    }

    /// Bind to a host-supplied converter.
    pub fn configure_external(
        &self,
        converter: Arc<dyn EnumeratedValueConverter>,
        representation: Representation,
    ) -> CodenumResult<&Binding> {
        self.install(Binding::external(converter, representation))
    }

    fn install(&self, candidate: Binding) -> CodenumResult<&Binding> {
        let rejected = match self.binding.set(candidate) {
            Ok(()) => return self.binding(),
            Err(rejected) => rejected,
        };

        let bound = self.binding()?;
        if bound.same_as(&rejected) {
            return Ok(bound);
        }
        Err(CodenumError::configuration(
            rejected.label(),
            format!(
                "field already bound to {}, cannot rebind to {}",
                bound.describe(),
                rejected.describe()
            ),
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.binding.get().is_some()
    }

    pub fn binding(&self) -> CodenumResult<&Binding> {
        self.binding
            .get()
            .ok_or_else(|| {
                let name = self.enum_type.get().map_or(UNBOUND, String::as_str);
                CodenumError::NotConfigured(name.to_string())
            })
    }

    pub fn representation(&self) -> CodenumResult<Representation> {
        Ok(self.binding()?.representation())
    }

    pub fn sql_type(&self) -> CodenumResult<SqlTypeCode> {
        Ok(self.binding()?.representation().type_code())
    }

    pub fn is_ordinal(&self) -> CodenumResult<bool> {
        Ok(self.binding()?.is_ordinal())
    }

    pub fn encode(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>> {
        self.binding()?.encode(value)
    }

    pub fn decode(&self, value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
        self.binding()?.decode(value)
    }

    /// Read and decode the value at `position`.
    pub fn null_safe_get(
        &self,
        reader: &dyn ValueReader,
        position: usize,
    ) -> CodenumResult<Option<EnumValue>> {
        let binding = self.binding()?;
        let relational = reader.read(position, binding.representation)?;
        binding.decode(relational.as_ref())
    }

    /// Encode `value` and bind it at `position`.
    pub fn null_safe_set(
        &self,
        writer: &mut dyn ValueWriter,
        value: Option<&EnumValue>,
        position: usize,
    ) -> CodenumResult<()> {
        let binding = self.binding()?;
        writer.write(binding.encode(value)?, position, binding.representation)
    }

    pub fn to_sql_literal(&self, value: &EnumValue) -> CodenumResult<String> {
        self.binding()?.sql_literal(value)
    }

    /// Text form of the relational value.
    pub fn to_relational_string(&self, value: Option<&EnumValue>) -> CodenumResult<Option<String>> {
        Ok(self.encode(value)?.map(|v| v.to_string()))
    }

    /// Decode the text form of a relational value.
    pub fn from_string_value(&self, text: Option<&str>) -> CodenumResult<Option<EnumValue>> {
        let binding = self.binding()?;
        let Some(text) = text else {
            return Ok(None);
        };
        let relational = match binding.codec() {
            Some(codec) => codec.parse_relational(text)?,
            None if binding.representation.carries_ordinals() => {
                let n: i64 = text.trim().parse().map_err(|_| CodenumError::TypeMismatch {
                    expected: "integer".to_string(),
                    actual: format!("'{text}'"),
                })?;
                RelationalValue::BigInt(n).coerce(binding.representation)?
            }
            None => RelationalValue::Text(text.to_string()),
        };
        binding.decode(Some(&relational))
    }

    /// Constant name for logs, `<null>` for none.
    pub fn to_loggable_string(&self, value: Option<&EnumValue>) -> CodenumResult<String> {
        self.binding()?;
        Ok(value.map_or_else(|| "<null>".to_string(), |v| v.name().to_string()))
    }

    /// Cacheable form of a value.
    pub fn disassemble(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>> {
        self.encode(value)
    }

    /// Rebuild a value from its cacheable form.
    pub fn assemble(&self, cached: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
        self.decode(cached)
    }

    pub fn check_constraint(&self, column: &str) -> CodenumResult<Option<String>> {
        Ok(self.binding()?.check_constraint(column))
    }

    /// Identity comparison.
    pub fn equals(x: Option<&EnumValue>, y: Option<&EnumValue>) -> bool {
        x == y
    }

    pub fn hash_code(x: Option<&EnumValue>) -> u64 {
        x.map_or(0, |value| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Values are immutable singletons; copying returns the same handle.
    pub fn deep_copy(value: Option<&EnumValue>) -> Option<EnumValue> {
        value.cloned()
    }

    pub fn replace(original: Option<&EnumValue>, _target: Option<&EnumValue>) -> Option<EnumValue> {
        original.cloned()
    }

    pub fn is_mutable(&self) -> bool {
        false
    }
}
