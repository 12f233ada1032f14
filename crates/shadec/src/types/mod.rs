//! Semantic type system
//!
//! The value types of the shading language, shared by the AST (declared
//! types) and the checker (inferred types).

mod shader_type;

pub use shader_type::Type;
