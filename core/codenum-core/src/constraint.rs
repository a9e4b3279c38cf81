//! Check-Constraint Generator
//!
//! Produces the `CHECK` condition declared for an enum column from the same
//! (representation, codec) pair used for I/O:
//!
//! | source                         | representation | condition                      |
//! |--------------------------------|----------------|--------------------------------|
//! | enumerated-value converter     | not native     | `col in (<converter values>)`  |
//! | codec                          | integral       | `col between 0 and <n-1>`      |
//! | codec                          | character      | `col in ('A','B',...)`         |
//! | any                            | native enum    | none                           |
//!
//! Only declared constants are considered; constants synthesized while decoding
//! are a runtime accommodation and never widen the schema.

use crate::codec::{Codec, RelationalValue, quote_literal};
use crate::error::CodenumResult;
use crate::registry::EnumValue;
use crate::resolver::Representation;

/// Externally supplied conversion that knows its own legal relational values.
pub trait EnumeratedValueConverter: Send + Sync {
    fn to_relational(&self, value: Option<&EnumValue>) -> CodenumResult<Option<RelationalValue>>;

    fn to_domain(&self, value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>>;

    /// Every relational value the converter may produce.
    fn value_set(&self) -> Vec<RelationalValue>;
}

/// What the constraint is derived from.
#[derive(Clone, Copy)]
pub enum ConstraintSource<'a> {
    Codec(&'a Codec),
    Converter(&'a dyn EnumeratedValueConverter),
}

/// `CHECK` condition for `column`, or `None` when nothing needs declaring.
pub fn check_constraint(
    column: &str,
    representation: Representation,
    source: ConstraintSource<'_>,
) -> Option<String> {
    if representation.is_native_enum() {
        return None;
    }

    match source {
        ConstraintSource::Converter(converter) => {
            let literals: Vec<String> = converter
                .value_set()
                .iter()
                .map(RelationalValue::to_sql_literal)
                .collect();
            membership(column, &literals)
        }
        ConstraintSource::Codec(codec) => {
            let enum_type = codec.enum_type();
            if representation.is_integral() {
                let cardinality = enum_type.cardinality();
                (cardinality > 0)
                    .then(|| format!("{column} between 0 and {}", cardinality - 1))
            } else if representation.is_character() {
                let literals: Vec<String> = enum_type
                    .declared()
                    .iter()
                    .map(|value| quote_literal(value.name()))
                    .collect();
                membership(column, &literals)
            } else {
                None
            }
        }
    }
}

fn membership(column: &str, literals: &[String]) -> Option<String> {
    (!literals.is_empty()).then(|| format!("{column} in ({})", literals.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EnumDescriptor, EnumRegistry, EnumType};
    use crate::resolver::EnumStrategy;

    fn declare(registry: &EnumRegistry, name: &str, constants: &[&str]) -> EnumType {
        registry
            .declare(EnumDescriptor::new(name, constants.iter().copied()))
            .unwrap();
        registry.enum_type(name).unwrap()
    }

    struct Flags;

    impl EnumeratedValueConverter for Flags {
        fn to_relational(
            &self,
            value: Option<&EnumValue>,
        ) -> CodenumResult<Option<RelationalValue>> {
            Ok(value.map(|v| RelationalValue::Text(v.name()[..1].to_string())))
        }

        fn to_domain(&self, _value: Option<&RelationalValue>) -> CodenumResult<Option<EnumValue>> {
            Ok(None)
        }

        fn value_set(&self) -> Vec<RelationalValue> {
            vec![
                RelationalValue::Text("Y".into()),
                RelationalValue::Text("N".into()),
            ]
        }
    }

    #[test]
    fn integral_range() {
        let registry = EnumRegistry::new();
        let quarter = declare(&registry, "Quarter", &["Q1", "Q2", "Q3", "Q4"]);
        let codec = Codec::new(EnumStrategy::Ordinal, quarter, Representation::NarrowInteger).unwrap();

        assert_eq!(
            check_constraint("quarter", Representation::NarrowInteger, ConstraintSource::Codec(&codec)),
            Some("quarter between 0 and 3".to_string())
        );
    }

    #[test]
    fn character_membership() {
        let registry = EnumRegistry::new();
        let grade = declare(&registry, "Grade", &["A", "B", "C"]);
        let codec = Codec::new(EnumStrategy::Name, grade, Representation::FixedChar).unwrap();

        assert_eq!(
            check_constraint("grade", Representation::FixedChar, ConstraintSource::Codec(&codec)),
            Some("grade in ('A','B','C')".to_string())
        );
    }

    #[test]
    fn synthesized_constants_are_not_declared() {
        let registry = EnumRegistry::new();
        let grade = declare(&registry, "Grade", &["A", "B", "C"]);
        grade.register_unknown_by_name("F");
        grade.register_unknown_by_ordinal(9);

        let named = Codec::new(EnumStrategy::Name, grade.clone(), Representation::VariableChar).unwrap();
        assert_eq!(
            check_constraint("g", Representation::VariableChar, ConstraintSource::Codec(&named)),
            Some("g in ('A','B','C')".to_string())
        );

        let ordinal = Codec::new(EnumStrategy::Ordinal, grade, Representation::WideInteger).unwrap();
        assert_eq!(
            check_constraint("g", Representation::WideInteger, ConstraintSource::Codec(&ordinal)),
            Some("g between 0 and 2".to_string())
        );
    }

    #[test]
    fn native_enum_has_no_constraint() {
        let registry = EnumRegistry::new();
        let grade = declare(&registry, "Grade", &["A", "B"]);
        let codec = Codec::new(EnumStrategy::Name, grade, Representation::NamedEnum).unwrap();

        assert_eq!(
            check_constraint("g", Representation::NamedEnum, ConstraintSource::Codec(&codec)),
            None
        );
        assert_eq!(
            check_constraint("g", Representation::NativeEnum, ConstraintSource::Converter(&Flags)),
            None
        );
    }

    #[test]
    fn ordinal_native_enum_has_no_constraint() {
        let registry = EnumRegistry::new();
        let grade = declare(&registry, "Grade", &["A", "B"]);
        let codec = Codec::new(EnumStrategy::Ordinal, grade, Representation::OrdinalEnum).unwrap();
        assert_eq!(
            check_constraint("g", Representation::OrdinalEnum, ConstraintSource::Codec(&codec)),
            None
        );
    }

    #[test]
    fn converter_values_win() {
        assert_eq!(
            check_constraint("flag", Representation::FixedChar, ConstraintSource::Converter(&Flags)),
            Some("flag in ('Y','N')".to_string())
        );
    }

    #[test]
    fn empty_enum_has_no_constraint() {
        let registry = EnumRegistry::new();
        let empty = declare(&registry, "Empty", &[]);
        let ordinal = Codec::new(EnumStrategy::Ordinal, empty.clone(), Representation::NarrowInteger).unwrap();
        let named = Codec::new(EnumStrategy::Name, empty, Representation::VariableChar).unwrap();

        assert_eq!(
            check_constraint("e", Representation::NarrowInteger, ConstraintSource::Codec(&ordinal)),
            None
        );
        assert_eq!(
            check_constraint("e", Representation::VariableChar, ConstraintSource::Codec(&named)),
            None
        );
    }
}
