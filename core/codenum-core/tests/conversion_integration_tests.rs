// 종단 간 통합 테스트: registry → binder → codec → row buffer → constraint

use codenum_core::binder::{ENUM_CLASS, TYPE, USE_NAMED};
use codenum_core::error::CodenumResult;
use codenum_core::{
    CodeEnum, CodenumError, EnumDescriptor, EnumFieldType, EnumRegistry, EnumStrategy, EnumValue,
    FieldMetadata, NativeEnumSupport, Parameters, RelationalValue, Representation, RowBuffer,
    SqlTypeCode, TypeConfiguration,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

#[derive(CodeEnum, Debug, Clone, Copy)]
enum Weekday {
    #[codenum(name = "MON")]
    Monday,
    #[codenum(name = "TUE")]
    Tuesday,
    #[codenum(name = "WED")]
    Wednesday,
}

fn registry() -> EnumRegistry {
    let registry = EnumRegistry::new();
    registry.declare_enum::<Weekday>().unwrap();
    registry
        .declare(EnumDescriptor::new(
            "Country",
            (0..250).map(|i| format!("C{i:03}")),
        ))
        .unwrap();
    registry
}

#[test]
fn test_default_ordinal_round_trip() -> CodenumResult<()> {
    codenum_core::logging::init_test();
    let registry = registry();
    let field = EnumFieldType::new();
    field.configure(&registry, &TypeConfiguration::new(), &Parameters::for_enum("Weekday"))?;

    let tuesday = registry.value_of(&Weekday::Tuesday)?;
    assert_eq!(field.representation()?, Representation::NarrowInteger);
    assert_eq!(field.encode(Some(&tuesday))?, Some(RelationalValue::TinyInt(1)));

    let mut row = RowBuffer::new();
    field.null_safe_set(&mut row, Some(&tuesday), 0)?;
    let read = field.null_safe_get(&row, 0)?.unwrap();
    assert!(EnumValue::ptr_eq(&read, &tuesday));

    field.null_safe_set(&mut row, None, 1)?;
    assert_eq!(field.null_safe_get(&row, 1)?, None);

    assert_eq!(
        field.check_constraint("day")?,
        Some("day between 0 and 2".to_string())
    );
    Ok(())
}

#[test]
fn test_many_values_widen_storage() -> CodenumResult<()> {
    let registry = registry();
    let field = EnumFieldType::new();
    field.configure(&registry, &TypeConfiguration::new(), &Parameters::for_enum("Country"))?;

    assert_eq!(field.representation()?, Representation::WideInteger);
    assert_eq!(field.sql_type()?, SqlTypeCode::SMALLINT);

    let last = registry.enum_type("Country")?.lookup_by_ordinal(249).unwrap();
    assert_eq!(field.encode(Some(&last))?, Some(RelationalValue::SmallInt(249)));
    assert_eq!(
        field.check_constraint("country")?,
        Some("country between 0 and 249".to_string())
    );
    Ok(())
}

#[test]
fn test_named_fixed_char_with_unknown_values() -> CodenumResult<()> {
    let registry = registry();
    let params = Parameters::default().with_metadata(
        FieldMetadata::new("Weekday")
            .with_strategy(EnumStrategy::Name)
            .with_column_length(1),
    );
    let field = EnumFieldType::new();
    field.configure(&registry, &TypeConfiguration::new(), &params)?;
    assert_eq!(field.representation()?, Representation::FixedChar);

    // 호스트가 미리 채운 행: 선언되지 않은 값 포함
    let row = RowBuffer::with_cells(vec![
        Some(RelationalValue::Text("WED".into())),
        Some(RelationalValue::Text("SUN".into())),
    ]);
    let wednesday = field.null_safe_get(&row, 0)?.unwrap();
    assert_eq!(wednesday, registry.value_of(&Weekday::Wednesday)?);

    let sunday = field.null_safe_get(&row, 1)?.unwrap();
    assert_eq!(sunday.name(), "SUN");
    assert!(!sunday.is_declared());
    assert_eq!(field.null_safe_get(&row, 1)?, Some(sunday));

    // 합성된 상수는 스키마를 넓히지 않음
    assert_eq!(
        field.check_constraint("day")?,
        Some("day in ('MON','TUE','WED')".to_string())
    );
    Ok(())
}

#[test]
fn test_properties_bag_binding() -> CodenumResult<()> {
    let registry = registry();
    let config = TypeConfiguration::new();

    let properties = HashMap::from([
        (ENUM_CLASS.to_string(), "Weekday".to_string()),
        (USE_NAMED.to_string(), "true".to_string()),
    ]);
    let named = EnumFieldType::new();
    named.configure(&registry, &config, &Parameters::from_properties(&properties)?)?;
    assert!(!named.is_ordinal()?);
    assert_eq!(named.sql_type()?, SqlTypeCode::VARCHAR);

    let properties = HashMap::from([
        (ENUM_CLASS, "Weekday"),
        (USE_NAMED, "true"),
        (TYPE, "4"),
    ]);
    let explicit = EnumFieldType::new();
    explicit.configure(&registry, &config, &Parameters::from_properties(properties)?)?;
    assert!(explicit.is_ordinal()?);
    assert_eq!(explicit.sql_type()?, SqlTypeCode::INTEGER);

    let bad = Parameters::from_properties([(ENUM_CLASS, "Weekday"), (TYPE, "91")])?;
    let err = EnumFieldType::new()
        .configure(&registry, &config, &bad)
        .unwrap_err();
    assert!(matches!(err, CodenumError::Configuration { .. }));
    Ok(())
}

#[test]
fn test_native_enum_preference() -> CodenumResult<()> {
    let registry = registry();
    let config = TypeConfiguration::new()
        .with_prefer_native_enum_types(true)
        .with_native_enum_support(NativeEnumSupport {
            ordinal_enum: true,
            ..NativeEnumSupport::none()
        });

    let field = EnumFieldType::new();
    field.configure(&registry, &config, &Parameters::for_enum("Country"))?;
    assert_eq!(field.representation()?, Representation::OrdinalEnum);
    assert_eq!(field.check_constraint("country")?, None);

    let c7 = registry.enum_type("Country")?.lookup_by_name("C007").unwrap();
    let mut row = RowBuffer::new();
    field.null_safe_set(&mut row, Some(&c7), 0)?;
    assert_eq!(row.get(0), Some(&RelationalValue::Int(7)));
    Ok(())
}

#[test]
fn test_nationalized_from_global_config() -> CodenumResult<()> {
    let registry = registry();
    let config = TypeConfiguration::new().with_nationalized(true);
    let params = Parameters::default()
        .with_metadata(FieldMetadata::new("Weekday").with_strategy(EnumStrategy::Name));

    let field = EnumFieldType::new();
    field.configure(&registry, &config, &params)?;
    assert_eq!(field.representation()?, Representation::NationalizedVariableChar);
    assert_eq!(field.sql_type()?, SqlTypeCode::NVARCHAR);
    Ok(())
}

#[test]
fn test_config_file_drives_binding() -> CodenumResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("codenum.json");
    TypeConfiguration::new()
        .with_default_strategy(EnumStrategy::Name)
        .save_to_file(&path)?;

    let config = TypeConfiguration::load_from_file(&path)?;
    let field = EnumFieldType::new();
    field.configure(&registry(), &config, &Parameters::for_enum("Weekday"))?;
    assert!(!field.is_ordinal()?);
    Ok(())
}

#[test]
fn test_unconfigured_field_type() {
    let field = EnumFieldType::new();
    let err = field.is_ordinal().unwrap_err();
    assert!(matches!(err, CodenumError::NotConfigured(_)));
    assert!(err.to_string().contains("not properly, fully configured"));
}

#[test]
fn test_concurrent_decoding_of_unknown_values() -> CodenumResult<()> {
    let registry = registry();
    let field = Arc::new(EnumFieldType::new());
    field.configure(&registry, &TypeConfiguration::new(), &Parameters::for_enum("Weekday"))?;

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let field = Arc::clone(&field);
            thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        let ordinal = 10 + (i + t) % 5;
                        let row = RowBuffer::with_cells(vec![Some(RelationalValue::Int(ordinal))]);
                        field.null_safe_get(&row, 0).unwrap().unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let decoded: HashSet<EnumValue> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    // 5개의 미지 ordinal → 정확히 5개의 합성 상수
    assert_eq!(decoded.len(), 5);
    let weekday = registry.enum_type("Weekday")?;
    assert_eq!(weekday.len(), 8);
    assert_eq!(weekday.cardinality(), 3);
    Ok(())
}
