//! Type descriptors for columnar schemas: a textual descriptor grammar, its
//! parser, the immutable descriptor model, and the bridge to value accessors.

pub mod accessor;
pub mod bridge;
pub mod descriptor;
pub mod parser;
pub mod primitive;
pub mod tokenizer;
pub mod type_system;

pub use descriptor::{Category, StructField, TypeDescriptor};
pub use primitive::PrimitiveKind;
pub use type_system::TypeSystem;
