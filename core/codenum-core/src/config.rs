//! Type configuration: the explicit context handed to the resolver and binder.
//!
//! Holds the base indicators that apply to every field (native enum preference,
//! nationalization, default strategy) and the set of native enum column kinds the
//! target engine registers. Loadable from builder calls, JSON files and
//! environment variables.

use crate::error::CodenumResult;
use crate::resolver::EnumStrategy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable prefix for all configuration overrides.
pub const ENV_PREFIX: &str = "CODENUM_";

/// Native enum column kinds registered by the target engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeEnumSupport {
    /// Anonymous enum column storing ordinals
    pub ordinal_enum: bool,
    /// Named enum type storing ordinals
    pub named_ordinal_enum: bool,
    /// Anonymous enum column storing names (e.g. MySQL `enum(...)`)
    pub enum_kind: bool,
    /// Named enum type storing names (e.g. PostgreSQL `create type ... as enum`)
    pub named_enum: bool,
}

impl NativeEnumSupport {
    /// Engine without any native enum column kind.
    pub fn none() -> Self {
        Self::default()
    }

    /// Engine registering every native enum kind.
    pub fn all() -> Self {
        Self {
            ordinal_enum: true,
            named_ordinal_enum: true,
            enum_kind: true,
            named_enum: true,
        }
    }

    fn kinds_mut(&mut self) -> [(&'static str, &mut bool); 4] {
        [
            ("ORDINAL_ENUM", &mut self.ordinal_enum),
            ("NAMED_ORDINAL_ENUM", &mut self.named_ordinal_enum),
            ("ENUM", &mut self.enum_kind),
            ("NAMED_ENUM", &mut self.named_enum),
        ]
    }
}

/// Process-level indicators consulted when a field is bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeConfiguration {
    /// Prefer engine-native enum column types when the engine registers them
    pub prefer_native_enum_types: bool,
    /// Treat every character column as nationalized
    pub nationalized: bool,
    /// Strategy used when a field declares none (`None` → ordinal)
    pub default_strategy: Option<EnumStrategy>,
    /// Native enum column kinds of the target engine
    pub native_enum_support: NativeEnumSupport,
}

impl TypeConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefer_native_enum_types(mut self, prefer: bool) -> Self {
        self.prefer_native_enum_types = prefer;
        self
    }

    pub fn with_nationalized(mut self, nationalized: bool) -> Self {
        self.nationalized = nationalized;
        self
    }

    pub fn with_default_strategy(mut self, strategy: EnumStrategy) -> Self {
        self.default_strategy = Some(strategy);
        self
    }

    pub fn with_native_enum_support(mut self, support: NativeEnumSupport) -> Self {
        self.native_enum_support = support;
        self
    }

    /// Parse from a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> CodenumResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> CodenumResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 파일에서 로드
    pub fn load_from_file(path: impl AsRef<Path>) -> CodenumResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// 파일에 저장
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> CodenumResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// 환경 변수에서 로드
    ///
    /// Recognized variables:
    /// - `CODENUM_PREFER_NATIVE_ENUMS`
    /// - `CODENUM_NATIONALIZED`
    /// - `CODENUM_DEFAULT_STRATEGY` (`ordinal` | `name`)
    /// - `CODENUM_NATIVE_ENUM`, `CODENUM_NATIVE_NAMED_ENUM`,
    ///   `CODENUM_NATIVE_ORDINAL_ENUM`, `CODENUM_NATIVE_NAMED_ORDINAL_ENUM`
    ///
    /// Unset or unrecognized values leave the current setting untouched.
    pub fn load_from_env(&mut self) {
        if let Some(prefer) = env_flag("PREFER_NATIVE_ENUMS") {
            self.prefer_native_enum_types = prefer;
        }
        if let Some(nationalized) = env_flag("NATIONALIZED") {
            self.nationalized = nationalized;
        }
        if let Ok(value) = env::var(format!("{ENV_PREFIX}DEFAULT_STRATEGY"))
            && let Some(strategy) = EnumStrategy::parse(&value)
        {
            self.default_strategy = Some(strategy);
        }
        for (kind, slot) in self.native_enum_support.kinds_mut() {
            if let Some(enabled) = env_flag(&format!("NATIVE_{kind}")) {
                *slot = enabled;
            }
        }
    }
}

fn env_flag(suffix: &str) -> Option<bool> {
    env::var(format!("{ENV_PREFIX}{suffix}"))
        .ok()
        .map(|value| value.eq_ignore_ascii_case("true") || value == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = TypeConfiguration::new();
        assert!(!config.prefer_native_enum_types);
        assert!(!config.nationalized);
        assert_eq!(config.default_strategy, None);
        assert_eq!(config.native_enum_support, NativeEnumSupport::none());
    }

    #[test]
    fn json_partial_document() {
        let config = TypeConfiguration::from_json(
            r#"{ "prefer_native_enum_types": true, "native_enum_support": { "named_enum": true } }"#,
        )
        .unwrap();
        assert!(config.prefer_native_enum_types);
        assert!(config.native_enum_support.named_enum);
        assert!(!config.native_enum_support.enum_kind);
        assert!(!config.nationalized);
    }

    #[test]
    fn json_strategy_spelling() {
        let config = TypeConfiguration::from_json(r#"{ "default_strategy": "name" }"#).unwrap();
        assert_eq!(config.default_strategy, Some(EnumStrategy::Name));
    }

    #[test]
    fn json_rejects_malformed() {
        assert!(TypeConfiguration::from_json("{ prefer_native_enum_types: }").is_err());
    }

    #[test]
    fn file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("codenum.json");

        let config = TypeConfiguration::new()
            .with_nationalized(true)
            .with_default_strategy(EnumStrategy::Name)
            .with_native_enum_support(NativeEnumSupport::all());
        config.save_to_file(&path).unwrap();

        let loaded = TypeConfiguration::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn env_overrides() {
        // 환경 변수 설정 (unsafe)
        unsafe {
            env::set_var("CODENUM_PREFER_NATIVE_ENUMS", "TRUE");
            env::set_var("CODENUM_NATIONALIZED", "1");
            env::set_var("CODENUM_DEFAULT_STRATEGY", "Name");
            env::set_var("CODENUM_NATIVE_NAMED_ENUM", "true");
            env::set_var("CODENUM_NATIVE_ENUM", "false");
        }

        let mut config = TypeConfiguration::new();
        config.native_enum_support.enum_kind = true;
        config.load_from_env();

        assert!(config.prefer_native_enum_types);
        assert!(config.nationalized);
        assert_eq!(config.default_strategy, Some(EnumStrategy::Name));
        assert!(config.native_enum_support.named_enum);
        assert!(!config.native_enum_support.enum_kind);

        // 정리 (unsafe)
        unsafe {
            env::remove_var("CODENUM_PREFER_NATIVE_ENUMS");
            env::remove_var("CODENUM_NATIONALIZED");
            env::remove_var("CODENUM_DEFAULT_STRATEGY");
            env::remove_var("CODENUM_NATIVE_NAMED_ENUM");
            env::remove_var("CODENUM_NATIVE_ENUM");
        }
    }
}
