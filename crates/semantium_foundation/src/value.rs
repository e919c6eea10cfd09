//! Parameter value type for parametric and hybrid words.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::collections::LtVec;
use crate::error::Error;
use crate::types::Type;

/// A parameter passed to a parametric or hybrid word.
///
/// Values are immutable and cheaply cloneable (O(1) for every variant).
/// Composite values use structural sharing via persistent data structures.
#[derive(Clone)]
pub enum Value {
    /// The nil value (represents absence).
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Persistent vector.
    Vec(LtVec<Value>),
}

/// Generates a borrowing accessor for one variant.
macro_rules! variant_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $out:ty, |$v:ident| $map:expr) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(&self) -> Option<$out> {
            match self {
                Self::$variant($v) => Some($map),
                _ => None,
            }
        }
    };
}

impl Value {
    /// The runtime type, with composite element types widened to `any`.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::Vec(_) => Type::vec(Type::Any),
        }
    }

    /// True for [`Value::Nil`].
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    variant_accessor!(
        /// The boolean payload, if any.
        as_bool, Bool, bool, |b| *b
    );
    variant_accessor!(
        /// The integer payload, if any.
        as_int, Int, i64, |n| *n
    );
    variant_accessor!(
        /// The float payload, if any. Integers are not widened.
        as_float, Float, f64, |n| *n
    );
    variant_accessor!(
        /// The string payload, if any.
        as_str, String, &str, |s| &**s
    );
    variant_accessor!(
        /// The vector payload, if any.
        as_vec, Vec, &LtVec<Value>, |v| v
    );

    fn require<T>(&self, found: Option<T>, expected: Type) -> crate::Result<T> {
        found.ok_or_else(|| Error::type_mismatch(expected, self.value_type()))
    }

    /// The integer payload.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` for any other variant.
    pub fn expect_int(&self) -> crate::Result<i64> {
        self.require(self.as_int(), Type::Int)
    }

    /// The string payload.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` for any other variant.
    pub fn expect_str(&self) -> crate::Result<&str> {
        self.require(self.as_str(), Type::String)
    }

    /// The boolean payload.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` for any other variant.
    pub fn expect_bool(&self) -> crate::Result<bool> {
        self.require(self.as_bool(), Type::Bool)
    }

    /// Writes the value; `quoted` selects the debug rendering of strings.
    fn render(&self, f: &mut fmt::Formatter<'_>, quoted: bool) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) if quoted => write!(f, "{s:?}"),
            Self::String(s) => f.write_str(s),
            Self::Vec(items) => {
                f.write_str("[")?;
                let mut sep = "";
                for item in items {
                    f.write_str(sep)?;
                    item.render(f, quoted)?;
                    sep = " ";
                }
                f.write_str("]")
            }
        }
    }
}

/// Floats compare by bit pattern so that `Eq` stays reflexive.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::{Bool, Float, Int, Nil, String, Vec};
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (Vec(a), Vec(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::Vec(items) => items.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, true)
    }
}

/// Strings display unquoted so recorded paths read `either(A,B)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::Vec(items) => serializer.collect_seq(items),
        }
    }
}

macro_rules! value_from {
    ($($source:ty => |$x:ident| $build:expr;)*) => {
        $(
            impl From<$source> for Value {
                fn from($x: $source) -> Self {
                    $build
                }
            }
        )*
    };
}

value_from! {
    bool => |b| Self::Bool(b);
    i64 => |n| Self::Int(n);
    i32 => |n| Self::Int(i64::from(n));
    f64 => |n| Self::Float(n);
    &str => |s| Self::String(Arc::from(s));
    String => |s| Self::String(Arc::from(s));
    Arc<str> => |s| Self::String(s);
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Vec(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(item: Option<T>) -> Self {
        item.map_or(Self::Nil, Into::into)
    }
}
