//! Types
//!
//! The scalar types, the numeric coercion order `char < int < float`, and fixed-size arrays.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Char,
    Int,
    Float,
    Bool,
    Array(ArrayType),
}

/// A fixed-size array
///
/// The width is computed once, when the array type is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    of: Box<Type>,
    size: usize,
    width: usize,
}

impl ArrayType {
    pub fn element(&self) -> &Type {
        &self.of
    }

    pub fn into_element(self) -> Type {
        *self.of
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Type {
    /// An array of `size` elements, `None` if its width does not fit in `usize`
    pub fn array(size: usize, of: Type) -> Option<Self> {
        let width = size.checked_mul(of.width())?;
        Some(Type::Array(ArrayType {
            of: Box::new(of),
            size,
            width,
        }))
    }

    /// Storage width in bytes
    pub fn width(&self) -> usize {
        match self {
            Type::Char | Type::Bool => 1,
            Type::Int => 4,
            Type::Float => 8,
            Type::Array(array) => array.width,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.rank().is_some()
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    fn rank(&self) -> Option<u8> {
        match self {
            Type::Char => Some(0),
            Type::Int => Some(1),
            Type::Float => Some(2),
            Type::Bool | Type::Array(_) => None,
        }
    }

    /// The wider of two numeric types, `None` if either is not numeric
    pub fn max(lhs: &Type, rhs: &Type) -> Option<Type> {
        let (l, r) = (lhs.rank()?, rhs.rank()?);
        Some(if l >= r { lhs.clone() } else { rhs.clone() })
    }

    /// Whether two operands can be related by `==`, `<`, etc.
    pub fn comparable(lhs: &Type, rhs: &Type) -> bool {
        if lhs.is_array() || rhs.is_array() {
            return false;
        }
        lhs == rhs || (lhs.is_numeric() && rhs.is_numeric())
    }

    /// The type produced by assigning `value` to a location of type `target`
    pub fn assign(target: &Type, value: &Type) -> Option<Type> {
        match (target, value) {
            (Type::Bool, Type::Bool) => Some(Type::Bool),
            _ if target.is_numeric() && value.is_numeric() => Some(value.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Char => write!(f, "char"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::Array(array) => write!(f, "[{}]{}", array.size, array.of),
        }
    }
}
