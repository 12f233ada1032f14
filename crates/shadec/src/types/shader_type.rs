//! Shading-language value types

use std::fmt;

/// A semantic type.
///
/// Equality is structural: arrays compare by element type only, the
/// declared length is not part of the type. `Type::Error` is the sentinel
/// returned by a failed check; it never equals a real type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Array(Box<Type>),
    Error,
}

impl Type {
    pub fn array_of(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// `int` and `float`
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Number of components of a vector type
    pub fn components(&self) -> Option<usize> {
        match self {
            Type::Vec2 => Some(2),
            Type::Vec3 => Some(3),
            Type::Vec4 => Some(4),
            _ => None,
        }
    }

    /// Element type of an array
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Type of a swizzle selecting `len` components: a scalar for one
    /// component, a vector otherwise. `None` past four components.
    pub fn swizzle_result(len: usize) -> Option<Type> {
        match len {
            1 => Some(Type::Float),
            2 => Some(Type::Vec2),
            3 => Some(Type::Vec3),
            4 => Some(Type::Vec4),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Vec2 => write!(f, "vec2"),
            Type::Vec3 => write!(f, "vec3"),
            Type::Vec4 => write!(f, "vec4"),
            Type::Array(element) => write!(f, "{}[]", element),
            Type::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::array_of(Type::Int), Type::array_of(Type::Int));
        assert_ne!(Type::array_of(Type::Int), Type::array_of(Type::Float));
        assert_ne!(Type::array_of(Type::Int), Type::Int);
        assert_eq!(
            Type::array_of(Type::array_of(Type::Vec3)),
            Type::array_of(Type::array_of(Type::Vec3))
        );
    }

    #[test]
    fn test_error_never_equals_real_type() {
        for ty in [Type::Void, Type::Bool, Type::Int, Type::Float, Type::Vec4] {
            assert_ne!(Type::Error, ty);
        }
        assert_eq!(Type::Error, Type::Error);
    }

    #[test]
    fn test_numeric() {
        assert!(Type::Int.is_numeric());
        assert!(Type::Float.is_numeric());
        assert!(!Type::Bool.is_numeric());
        assert!(!Type::Vec2.is_numeric());
        assert!(!Type::Error.is_numeric());
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Vec3.to_string(), "vec3");
        assert_eq!(Type::array_of(Type::Float).to_string(), "float[]");
        assert_eq!(Type::Error.to_string(), "error");
    }

    #[test]
    fn test_swizzle_result() {
        assert_eq!(Type::swizzle_result(1), Some(Type::Float));
        assert_eq!(Type::swizzle_result(4), Some(Type::Vec4));
        assert_eq!(Type::swizzle_result(5), None);
    }
}
