//! Enum Constant Registry
//!
//! Process-wide, per-enum-type tables of known constants. Each table keeps an
//! append-only arena of constants plus two indexes (by name, by ordinal).
//! Lookups are lock-free `DashMap` reads; unknown values met while decoding are
//! synthesized under a per-type lock so that concurrent callers racing on the
//! same key all observe one constant.
//!
//! Declared constants are taken from an [`EnumDescriptor`] handed to
//! [`EnumRegistry::declare`] and materialized lazily on first access to the type.

use crate::error::{CodenumError, CodenumResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{info, trace};
use uuid::Uuid;

/// Ordinal carried by constants synthesized from an unknown name.
pub const UNDEFINED_ORDINAL: i32 = i32::MIN;

/// Where a constant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantOrigin {
    /// Part of the enum's fixed definition
    Declared,
    /// Created while decoding a persisted value nobody declared
    Synthesized,
}

/// A single `(name, ordinal)` pair of one enum type.
#[derive(Debug)]
pub struct EnumConstant {
    enum_type: Arc<str>,
    name: String,
    ordinal: i32,
    origin: ConstantOrigin,
}

impl EnumConstant {
    pub fn enum_type(&self) -> &str {
        &self.enum_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }

    pub fn origin(&self) -> ConstantOrigin {
        self.origin
    }

    pub fn is_declared(&self) -> bool {
        self.origin == ConstantOrigin::Declared
    }
}

/// Domain value: a shared handle to a registry constant.
///
/// Equality and hashing are by identity. Two handles are equal only when they
/// point at the same registered constant.
#[derive(Clone)]
pub struct EnumValue(Arc<EnumConstant>);

impl EnumValue {
    fn new(constant: EnumConstant) -> Self {
        Self(Arc::new(constant))
    }

    pub fn ptr_eq(a: &EnumValue, b: &EnumValue) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for EnumValue {
    type Target = EnumConstant;

    fn deref(&self) -> &EnumConstant {
        &self.0
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.enum_type, self.name, self.ordinal)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Static definition of an enum type: its name and declared constant names in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: String,
    constants: Vec<String>,
}

impl EnumDescriptor {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Descriptor of a Rust enum implementing [`CodeEnum`].
    pub fn of<E: CodeEnum>() -> Self {
        Self::new(E::TYPE_NAME, E::CONSTANTS.iter().copied())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constants(&self) -> &[String] {
        &self.constants
    }

    fn validate(&self) -> CodenumResult<()> {
        if self.name.is_empty() {
            return Err(CodenumError::configuration("", "enum type name must not be empty"));
        }
        if i32::try_from(self.constants.len()).is_err() {
            return Err(CodenumError::configuration(
                &self.name,
                format!("{} constants exceed the ordinal range", self.constants.len()),
            ));
        }
        let mut seen = HashSet::with_capacity(self.constants.len());
        for name in &self.constants {
            if !seen.insert(name.as_str()) {
                return Err(CodenumError::configuration(
                    &self.name,
                    format!("constant '{name}' declared twice"),
                ));
            }
        }
        Ok(())
    }
}

/// Rust enums usable as registry-backed domain types.
///
/// Usually derived with `#[derive(CodeEnum)]`.
pub trait CodeEnum: Sized + 'static {
    /// Registry key of the enum type
    const TYPE_NAME: &'static str;
    /// Declared constant names in declaration order
    const CONSTANTS: &'static [&'static str];

    /// Declaration position of this variant
    fn ordinal(&self) -> i32;

    /// Constant name of this variant
    fn name(&self) -> &'static str;
}

struct EnumTable {
    name: Arc<str>,
    declared: usize,
    /// Append-only arena; its write lock also serializes synthesis
    constants: RwLock<Vec<EnumValue>>,
    by_name: DashMap<String, EnumValue>,
    by_ordinal: DashMap<i32, EnumValue>,
}

/// Handle to one enum type's constant table.
///
/// Cheap to clone; equality is by identity of the underlying table.
#[derive(Clone)]
pub struct EnumType(Arc<EnumTable>);

impl EnumType {
    fn load(descriptor: &EnumDescriptor) -> Self {
        let name: Arc<str> = Arc::from(descriptor.name.as_str());
        let by_name = DashMap::with_capacity(descriptor.constants.len());
        let by_ordinal = DashMap::with_capacity(descriptor.constants.len());
        let mut constants = Vec::with_capacity(descriptor.constants.len());

        for (ordinal, constant) in (0i32..).zip(&descriptor.constants) {
            let value = EnumValue::new(EnumConstant {
                enum_type: name.clone(),
                name: constant.clone(),
                ordinal,
                origin: ConstantOrigin::Declared,
            });
            by_name.insert(constant.clone(), value.clone());
            by_ordinal.insert(ordinal, value.clone());
            constants.push(value);
        }

        trace!(enum_type = %name, declared = constants.len(), "enum type loaded");

        Self(Arc::new(EnumTable {
            name,
            declared: descriptor.constants.len(),
            constants: RwLock::new(constants),
            by_name,
            by_ordinal,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Number of declared constants; synthesized ones are not counted.
    pub fn cardinality(&self) -> usize {
        self.0.declared
    }

    /// Number of constants, declared and synthesized.
    pub fn len(&self) -> usize {
        self.0.constants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared constants in declaration order.
    pub fn declared(&self) -> Vec<EnumValue> {
        self.0.constants.read()[..self.0.declared].to_vec()
    }

    /// Snapshot of every constant, declared first, then synthesized in
    /// registration order.
    pub fn values(&self) -> Vec<EnumValue> {
        self.0.constants.read().clone()
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<EnumValue> {
        self.0.by_name.get(name).map(|r| r.value().clone())
    }

    pub fn lookup_by_ordinal(&self, ordinal: i32) -> Option<EnumValue> {
        self.0.by_ordinal.get(&ordinal).map(|r| r.value().clone())
    }

    /// Whether `value` belongs to this type.
    pub fn owns(&self, value: &EnumValue) -> bool {
        Arc::ptr_eq(&value.enum_type, &self.0.name)
    }

    /// Return the constant with this ordinal, synthesizing one with a generated
    /// name if nobody holds it yet.
    pub fn register_unknown_by_ordinal(&self, ordinal: i32) -> EnumValue {
        if let Some(existing) = self.lookup_by_ordinal(ordinal) {
            return existing;
        }

        let mut constants = self.0.constants.write();
        if let Some(existing) = self.lookup_by_ordinal(ordinal) {
            return existing;
        }

        let mut name = Uuid::new_v4().to_string();
        while self.0.by_name.contains_key(&name) {
            name = Uuid::new_v4().to_string();
        }

        let value = self.synthesize(name, ordinal);
        self.0.by_name.insert(value.name.clone(), value.clone());
        self.0.by_ordinal.insert(ordinal, value.clone());
        constants.push(value.clone());
        value
    }

    /// Return the constant with this name, synthesizing one carrying
    /// [`UNDEFINED_ORDINAL`] if nobody holds it yet.
    ///
    /// Name-synthesized constants are not reachable through the ordinal index.
    pub fn register_unknown_by_name(&self, name: &str) -> EnumValue {
        if let Some(existing) = self.lookup_by_name(name) {
            return existing;
        }

        let mut constants = self.0.constants.write();
        if let Some(existing) = self.lookup_by_name(name) {
            return existing;
        }

        let value = self.synthesize(name.to_string(), UNDEFINED_ORDINAL);
        self.0.by_name.insert(value.name.clone(), value.clone());
        constants.push(value.clone());
        value
    }

    fn synthesize(&self, name: String, ordinal: i32) -> EnumValue {
        info!(
            enum_type = %self.0.name,
            name = %name,
            ordinal,
            "synthesizing unknown enum constant"
        );
        EnumValue::new(EnumConstant {
            enum_type: self.0.name.clone(),
            name,
            ordinal,
            origin: ConstantOrigin::Synthesized,
        })
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.0.name)
            .field("declared", &self.0.declared)
            .field("len", &self.len())
            .finish()
    }
}

/// Registry of enum types keyed by type name.
///
/// Construct one per process (or per test) and pass it by reference; nothing
/// here is reachable through statics.
#[derive(Default)]
pub struct EnumRegistry {
    descriptors: DashMap<String, EnumDescriptor>,
    types: DashMap<String, EnumType>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make an enum type known. Declaring the same descriptor twice is a no-op;
    /// redeclaring a name with different constants is a configuration error.
    pub fn declare(&self, descriptor: EnumDescriptor) -> CodenumResult<()> {
        descriptor.validate()?;
        match self.descriptors.entry(descriptor.name.clone()) {
            Entry::Occupied(existing) if existing.get() != &descriptor => {
                Err(CodenumError::configuration(
                    &descriptor.name,
                    "enum type already declared with different constants",
                ))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
                Ok(())
            }
        }
    }

    /// Declare a Rust enum implementing [`CodeEnum`].
    pub fn declare_enum<E: CodeEnum>(&self) -> CodenumResult<()> {
        self.declare(EnumDescriptor::of::<E>())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Resolve an enum type, loading its declared constants on first access.
    pub fn enum_type(&self, name: &str) -> CodenumResult<EnumType> {
        if let Some(existing) = self.types.get(name) {
            return Ok(existing.value().clone());
        }

        let descriptor = self
            .descriptors
            .get(name)
            .map(|r| r.value().clone())
            .ok_or_else(|| CodenumError::UnknownEnumType(name.to_string()))?;

        Ok(self
            .types
            .entry(name.to_string())
            .or_insert_with(|| EnumType::load(&descriptor))
            .value()
            .clone())
    }

    pub fn lookup_by_name(&self, enum_type: &EnumType, name: &str) -> Option<EnumValue> {
        enum_type.lookup_by_name(name)
    }

    pub fn lookup_by_ordinal(&self, enum_type: &EnumType, ordinal: i32) -> Option<EnumValue> {
        enum_type.lookup_by_ordinal(ordinal)
    }

    pub fn register_unknown_by_ordinal(&self, enum_type: &EnumType, ordinal: i32) -> EnumValue {
        enum_type.register_unknown_by_ordinal(ordinal)
    }

    pub fn register_unknown_by_name(&self, enum_type: &EnumType, name: &str) -> EnumValue {
        enum_type.register_unknown_by_name(name)
    }

    /// The registered constant behind a Rust enum variant.
    pub fn value_of<E: CodeEnum>(&self, variant: &E) -> CodenumResult<EnumValue> {
        let enum_type = self.enum_type(E::TYPE_NAME)?;
        enum_type
            .lookup_by_ordinal(variant.ordinal())
            .ok_or_else(|| {
                CodenumError::configuration(
                    E::TYPE_NAME,
                    format!("ordinal {} is not declared", variant.ordinal()),
                )
            })
    }
}
