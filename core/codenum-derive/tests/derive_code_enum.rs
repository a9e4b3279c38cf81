//! derive(CodeEnum) 매크로 테스트

use codenum_core::registry::CodeEnum;
use codenum_core::{EnumDescriptor, EnumRegistry};

#[derive(codenum_derive::CodeEnum, Debug, Clone, Copy, PartialEq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(codenum_derive::CodeEnum)]
#[codenum(type_name = "OrderStatus")]
pub enum Status {
    #[codenum(name = "NEW")]
    New,
    #[codenum(name = "SHIPPED")]
    Shipped = 10,
    Cancelled,
}

#[test]
fn test_type_name_defaults_to_ident() {
    assert_eq!(Priority::TYPE_NAME, "Priority");
    assert_eq!(Priority::CONSTANTS, ["Low", "Medium", "High"]);
}

#[test]
fn test_ordinal_is_declaration_position() {
    assert_eq!(Priority::Low.ordinal(), 0);
    assert_eq!(Priority::High.ordinal(), 2);
    // 명시적 discriminant는 무시
    assert_eq!(Status::Shipped.ordinal(), 1);
}

#[test]
fn test_renamed_constants() {
    assert_eq!(Status::TYPE_NAME, "OrderStatus");
    assert_eq!(Status::CONSTANTS, ["NEW", "SHIPPED", "Cancelled"]);
    assert_eq!(Status::New.name(), "NEW");
    assert_eq!(Status::Cancelled.name(), "Cancelled");
}

#[test]
fn test_registry_integration() {
    let registry = EnumRegistry::new();
    registry.declare_enum::<Status>().unwrap();

    let shipped = registry.value_of(&Status::Shipped).unwrap();
    assert_eq!(shipped.name(), "SHIPPED");
    assert_eq!(shipped.ordinal(), 1);
    assert_eq!(shipped.enum_type(), "OrderStatus");

    // 같은 정의를 다시 선언해도 무방
    registry
        .declare(EnumDescriptor::new("OrderStatus", ["NEW", "SHIPPED", "Cancelled"]))
        .unwrap();
}
