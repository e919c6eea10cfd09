//! Parameter types.
//!
//! A parametric word that rejects an argument reports the [`Type`] it
//! wanted and the type it got. Handlers can also check a whole signature
//! up front with [`expect_param`](crate::args::expect_param).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The type of a parameter [`Value`](crate::Value), or a pattern over such
/// types.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Only `nil`.
    Nil,
    /// `true` or `false`.
    Bool,
    /// `i64`.
    Int,
    /// `f64`. Integers are accepted where a float is wanted.
    Float,
    /// Text.
    String,
    /// A list whose items all have the given type.
    Vec(Box<Type>),
    /// The given type, or `nil`.
    Option(Box<Type>),
    /// Anything.
    Any,
}

impl Type {
    /// `vec<item>`.
    #[must_use]
    pub fn vec(item: Type) -> Self {
        Self::Vec(Box::new(item))
    }

    /// `option<inner>`.
    #[must_use]
    pub fn option(inner: Type) -> Self {
        Self::Option(Box::new(inner))
    }

    /// True for the wildcard type.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Whether a parameter of type `actual` satisfies this type.
    ///
    /// Values report `Any` as the item type of their lists, so a list is
    /// accepted on its shape alone.
    #[must_use]
    pub fn accepts(&self, actual: &Type) -> bool {
        match (self, actual) {
            (Self::Any, _) => true,
            (Self::Option(_), Self::Nil) => true,
            (Self::Option(inner), _) => inner.accepts(actual),
            (Self::Float, Self::Int | Self::Float) => true,
            (Self::Vec(item), Self::Vec(actual_item)) => {
                actual_item.is_any() || item.accepts(actual_item)
            }
            (Self::Nil, Self::Nil)
            | (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::String, Self::String) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Vec(item) => write!(f, "vec<{item}>"),
            Self::Option(inner) => write!(f, "option<{inner}>"),
            Self::Any => f.write_str("any"),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
