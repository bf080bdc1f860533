//! The abstract value domain.
//!
//! Every register of a method state holds an [`AbstractValue`]: either a
//! concrete primitive, a reference to a heap object, or the [`Unknown`] top
//! element of a static type.
//!
//! [`Unknown`]: AbstractValue::Unknown

use crate::errors::{DecoderError, SymexResult};
use crate::heap::{ArrayHandle, ObjectHandle};
use dw_dex::types::Type;
use std::fmt;

/// Descriptor reported for the `null` reference.
pub const NULL_DESCRIPTOR: &str = "Ljava/lang/Object;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractValue {
    Int32(i32),
    Int64(i64),
    Bool(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    /// A reference to an array, carrying its declared descriptor.
    ArrayRef(ArrayHandle),
    /// A reference to a non-array object.
    ObjectRef(ObjectHandle),
    /// The `null` reference.
    Null,
    /// Any value of the given type descriptor.
    Unknown(String),
}

impl fmt::Display for AbstractValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "int({v})"),
            Self::Int64(v) => write!(f, "long({v})"),
            Self::Bool(v) => write!(f, "boolean({v})"),
            Self::Byte(v) => write!(f, "byte({v})"),
            Self::Char(v) => write!(f, "char({v:#06x})"),
            Self::Short(v) => write!(f, "short({v})"),
            Self::ArrayRef(h) => write!(f, "{h}"),
            Self::ObjectRef(h) => write!(f, "{h}"),
            Self::Null => write!(f, "null"),
            Self::Unknown(t) => write!(f, "unknown({t})"),
        }
    }
}

impl From<i32> for AbstractValue {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for AbstractValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<bool> for AbstractValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for AbstractValue {
    fn from(v: i8) -> Self {
        Self::Byte(v)
    }
}

impl From<u16> for AbstractValue {
    fn from(v: u16) -> Self {
        Self::Char(v)
    }
}

impl From<i16> for AbstractValue {
    fn from(v: i16) -> Self {
        Self::Short(v)
    }
}

impl From<ArrayHandle> for AbstractValue {
    fn from(h: ArrayHandle) -> Self {
        Self::ArrayRef(h)
    }
}

impl From<ObjectHandle> for AbstractValue {
    fn from(h: ObjectHandle) -> Self {
        Self::ObjectRef(h)
    }
}

fn violation<T>(expected: &str, found: &AbstractValue) -> SymexResult<T> {
    Err(DecoderError::PreconditionViolation(format!("expected {expected}, found {found}")).into())
}

impl AbstractValue {
    pub fn unknown<S: Into<String>>(descriptor: S) -> Self {
        Self::Unknown(descriptor.into())
    }

    /// Builds the unknown value of the given type.
    #[must_use]
    pub fn unknown_of(typ: &Type) -> Self {
        Self::Unknown(typ.to_string())
    }

    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Checks if the value is a reference, including unknown values of a reference type.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        match self {
            Self::ArrayRef(_) | Self::ObjectRef(_) | Self::Null => true,
            Self::Unknown(t) => t.starts_with('L') || t.starts_with('['),
            _ => false,
        }
    }

    /// Returns the static type descriptor of the value.
    #[must_use]
    pub fn type_descriptor(&self) -> String {
        match self {
            Self::Int32(_) => "I".to_string(),
            Self::Int64(_) => "J".to_string(),
            Self::Bool(_) => "Z".to_string(),
            Self::Byte(_) => "B".to_string(),
            Self::Char(_) => "C".to_string(),
            Self::Short(_) => "S".to_string(),
            Self::ArrayRef(h) => h.descriptor(),
            Self::ObjectRef(h) => h.descriptor(),
            Self::Null => NULL_DESCRIPTOR.to_string(),
            Self::Unknown(t) => t.clone(),
        }
    }

    pub fn as_int32(&self) -> SymexResult<i32> {
        match self {
            Self::Int32(v) => Ok(*v),
            other => violation("int", other),
        }
    }

    pub fn as_int64(&self) -> SymexResult<i64> {
        match self {
            Self::Int64(v) => Ok(*v),
            other => violation("long", other),
        }
    }

    pub fn as_bool(&self) -> SymexResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => violation("boolean", other),
        }
    }

    pub fn as_byte(&self) -> SymexResult<i8> {
        match self {
            Self::Byte(v) => Ok(*v),
            other => violation("byte", other),
        }
    }

    pub fn as_char(&self) -> SymexResult<u16> {
        match self {
            Self::Char(v) => Ok(*v),
            other => violation("char", other),
        }
    }

    pub fn as_short(&self) -> SymexResult<i16> {
        match self {
            Self::Short(v) => Ok(*v),
            other => violation("short", other),
        }
    }

    pub fn as_array(&self) -> SymexResult<&ArrayHandle> {
        match self {
            Self::ArrayRef(h) => Ok(h),
            other => violation("array reference", other),
        }
    }
}

/// Returns the static type descriptor of any abstract value.
#[must_use]
pub fn type_descriptor_of(v: &AbstractValue) -> String {
    v.type_descriptor()
}
