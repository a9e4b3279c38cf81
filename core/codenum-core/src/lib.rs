//! # codenum — Enum Conversion & Storage Resolution
//!
//! 도메인 enum 값과 관계형 컬럼 값 사이의 변환 계층입니다.
//! 필드마다 저장 방식(ordinal / name)과 컬럼 표현을 한 번 결정하고,
//! 이후 읽기·쓰기·리터럴·CHECK 제약 조건을 같은 결정에서 파생합니다.
//!
//! ## 주요 특징
//!
//! - **Registry**: enum 타입별 상수 테이블, lock-free 조회, 미지의 값 합성
//! - **Resolver**: 전략 + 컬럼 메타데이터 + 엔진 기능 → 저장 표현
//! - **Codec**: Ordinal / Named 변환, NULL 투명 처리
//! - **Binder**: 명시적 타입 코드 > `useNamed` > 필드 메타데이터 우선순위
//! - **Constraint**: `between` / `in (...)` CHECK 조건 생성
//!
//! ## 빠른 시작
//!
//! ```rust
//! use codenum_core::{EnumDescriptor, EnumFieldType, EnumRegistry, Parameters, RowBuffer, TypeConfiguration};
//!
//! # fn main() -> codenum_core::CodenumResult<()> {
//! let registry = EnumRegistry::new();
//! registry.declare(EnumDescriptor::new("Color", ["RED", "GREEN", "BLUE"]))?;
//!
//! // 필드 바인딩 (전략 미지정 → ordinal, 상수 3개 → narrow integer)
//! let field = EnumFieldType::new();
//! field.configure(&registry, &TypeConfiguration::new(), &Parameters::for_enum("Color"))?;
//!
//! let green = registry.enum_type("Color")?.lookup_by_name("GREEN");
//! assert_eq!(field.to_relational_string(green.as_ref())?.as_deref(), Some("1"));
//!
//! // 쓰기 → 읽기: 같은 인스턴스가 돌아옵니다
//! let mut row = RowBuffer::new();
//! field.null_safe_set(&mut row, green.as_ref(), 0)?;
//! assert_eq!(field.null_safe_get(&row, 0)?, green);
//!
//! assert_eq!(
//!     field.check_constraint("color")?.as_deref(),
//!     Some("color between 0 and 2")
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Derive
//!
//! ```rust
//! use codenum_core::{CodeEnum, EnumRegistry};
//!
//! #[derive(CodeEnum)]
//! enum Suit {
//!     Clubs,
//!     Diamonds,
//!     #[codenum(name = "HEARTS")]
//!     Hearts,
//!     Spades,
//! }
//!
//! # fn main() -> codenum_core::CodenumResult<()> {
//! let registry = EnumRegistry::new();
//! registry.declare_enum::<Suit>()?;
//! let hearts = registry.value_of(&Suit::Hearts)?;
//! assert_eq!(hearts.name(), "HEARTS");
//! assert_eq!(hearts.ordinal(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## 모듈 구조
//!
//! - [`registry`] — enum 타입 / 상수 레지스트리
//! - [`resolver`] — 저장 표현 결정
//! - [`codec`] — Ordinal / Named 코덱
//! - [`binder`] — 필드 파라미터 바인딩 ([`EnumFieldType`])
//! - [`constraint`] — CHECK 제약 조건
//! - [`io`] — 호스트 읽기/쓰기 프리미티브
//! - [`config`] — 프로세스 수준 설정
//! - [`types`] — SQL 타입 코드

extern crate self as codenum_core;

pub mod binder;
pub mod codec;
pub mod config;
pub mod constraint;
pub mod error;
pub mod io;
pub mod registry;
pub mod resolver;
pub mod types;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use binder::{Binding, EnumFieldType, FieldMetadata, Parameters, bind, bind_element};
pub use codec::{Codec, RelationalValue};
pub use config::{NativeEnumSupport, TypeConfiguration};
pub use constraint::{EnumeratedValueConverter, check_constraint};
pub use error::{CodenumError, CodenumResult};
pub use io::{RowBuffer, ValueReader, ValueWriter};
pub use registry::{CodeEnum, EnumDescriptor, EnumRegistry, EnumType, EnumValue};
pub use resolver::{ConversionConfig, EnumStrategy, Representation, resolve};
pub use types::SqlTypeCode;

// Re-export derive macros
pub use codenum_derive::CodeEnum;
