//! 로깅 시스템 사용 예제
//!
//! 실행: RUST_LOG=debug cargo run --example logging --features logging

use codenum_core::{
    EnumDescriptor, EnumFieldType, EnumRegistry, Parameters, RelationalValue, RowBuffer,
    TypeConfiguration,
};

fn main() -> codenum_core::CodenumResult<()> {
    // 로깅 초기화
    #[cfg(feature = "logging")]
    codenum_core::logging::init();

    println!("=== codenum 로깅 예제 ===\n");
    println!("환경 변수 RUST_LOG로 로그 레벨 조정 가능:");
    println!("  RUST_LOG=trace  - enum 타입 로딩 포함");
    println!("  RUST_LOG=debug  - 필드 바인딩 결정");
    println!("  RUST_LOG=info   - 미지 상수 합성 (기본값)\n");

    let registry = EnumRegistry::new();
    registry.declare(EnumDescriptor::new("Color", ["RED", "GREEN", "BLUE"]))?;

    let mut config = TypeConfiguration::new();
    config.load_from_env();

    println!("필드 바인딩 중...");
    let field = EnumFieldType::new();
    field.configure(&registry, &config, &Parameters::for_enum("Color").with_use_named(true))?;
    println!("  representation = {}", field.representation()?);

    println!("\n미지 값 디코딩 중...");
    let row = RowBuffer::with_cells(vec![Some(RelationalValue::Text("PURPLE".into()))]);
    let purple = field.null_safe_get(&row, 0)?;
    println!("  decoded = {}", field.to_loggable_string(purple.as_ref())?);

    if let Some(check) = field.check_constraint("color")? {
        println!("\ncheck ({check})");
    }

    println!("\n=== 예제 완료 ===");
    println!("\n주의: logging feature가 활성화되어야 로그가 출력됩니다.");

    Ok(())
}
