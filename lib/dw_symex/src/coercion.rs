//! Primitive coercions applied by the `aput*` instruction variants.
//!
//! Storing a primitive first widens the source value to its canonical 32-bit
//! form, then narrows it to the width selected by the variant. Wide, boolean
//! and object stores have their own rules.

use crate::errors::{CoercionError, DecoderError};
use crate::value::AbstractValue;
use std::fmt;

/// The type suffix of an `aput*` mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Plain,
    Wide,
    Boolean,
    Byte,
    Char,
    Short,
    Object,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Wide => write!(f, "wide"),
            Self::Boolean => write!(f, "boolean"),
            Self::Byte => write!(f, "byte"),
            Self::Char => write!(f, "char"),
            Self::Short => write!(f, "short"),
            Self::Object => write!(f, "object"),
        }
    }
}

impl Variant {
    /// Parses the variant from an array store mnemonic, e.g. `aput-char`.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation for any mnemonic outside of the `aput` family.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, DecoderError> {
        const FAMILY: &str = "aput";

        let variant = match mnemonic.rsplit_once('-') {
            None if mnemonic == FAMILY => Some(Self::Plain),
            Some((FAMILY, suffix)) => match suffix {
                "wide" => Some(Self::Wide),
                "object" => Some(Self::Object),
                "boolean" => Some(Self::Boolean),
                "byte" => Some(Self::Byte),
                "char" => Some(Self::Char),
                "short" => Some(Self::Short),
                _ => None,
            },
            _ => None,
        };
        variant.ok_or_else(|| {
            DecoderError::PreconditionViolation(format!("{mnemonic} is not an array store opcode"))
        })
    }
}

/// Widens an integral primitive to its canonical 32-bit form.
pub(crate) fn widen(value: &AbstractValue) -> Option<i32> {
    match value {
        AbstractValue::Int32(v) => Some(*v),
        AbstractValue::Short(v) => Some(i32::from(*v)),
        AbstractValue::Byte(v) => Some(i32::from(*v)),
        AbstractValue::Char(v) => Some(i32::from(*v)),
        _ => None,
    }
}

/// Narrows a canonical 32-bit value to the width of a narrowing variant.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn narrow(variant: Variant, value: i32) -> AbstractValue {
    match variant {
        Variant::Byte => AbstractValue::Byte(value as i8),
        Variant::Char => AbstractValue::Char(value as u16),
        Variant::Short => AbstractValue::Short(value as i16),
        _ => AbstractValue::Int32(value),
    }
}

/// Returns the value an `aput*` of the given variant stores for `value`.
///
/// # Errors
///
/// Returns [`CoercionError::TypeMismatch`] when `value` is outside of the domain
/// accepted by the variant.
pub fn coerce(variant: Variant, value: &AbstractValue) -> Result<AbstractValue, CoercionError> {
    let coerced = match (variant, value) {
        (Variant::Wide, AbstractValue::Int64(v)) => Some(AbstractValue::Int64(*v)),
        (Variant::Wide, AbstractValue::Int32(v)) => Some(AbstractValue::Int64(i64::from(*v))),
        (Variant::Wide, _) => None,
        (Variant::Boolean, AbstractValue::Int32(0)) => Some(AbstractValue::Bool(false)),
        (Variant::Boolean, AbstractValue::Int32(1)) => Some(AbstractValue::Bool(true)),
        (Variant::Boolean, AbstractValue::Bool(b)) => Some(AbstractValue::Bool(*b)),
        (Variant::Boolean, _) => None,
        (Variant::Object, v) if v.is_reference() => Some(v.clone()),
        (Variant::Object, _) => None,
        (Variant::Plain | Variant::Byte | Variant::Char | Variant::Short, v) => {
            widen(v).map(|v| narrow(variant, v))
        }
    };
    coerced.ok_or_else(|| CoercionError::TypeMismatch {
        variant,
        value: value.to_string(),
    })
}
