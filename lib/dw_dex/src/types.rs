//! Dalvik typing informations data structures.

use crate::errors::{DexError, DexResult};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// Dalvik concrete type descriptor type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Type {
    /// `void` type, only valid for return types.
    Void,
    /// `boolean` type.
    Boolean,
    /// `byte` type.
    Byte,
    /// `short` type.
    Short,
    /// `char` type.
    Char,
    /// `int` type.
    Int,
    /// `long` type.
    Long,
    /// `float` type.
    Float,
    /// `double` type.
    Double,
    /// Array of the given type descriptor, usable recursively for arrays of arrays,
    /// though it is invalid to have more than 255 dimensions.
    Array(usize, Box<Self>),
    /// Type of a fully-qualified class
    Class(String),
}

impl Type {
    /// Returns the type of the elements of an array type, that is the
    /// same type with one dimension less.
    pub fn element_type(&self) -> DexResult<Self> {
        match self {
            Self::Array(1, inner) => Ok(inner.as_ref().clone()),
            Self::Array(n, inner) => Ok(Self::Array(n - 1, inner.clone())),
            _ => Err(DexError::InvalidType),
        }
    }

    /// Checks if values of this type are references (class instances or arrays).
    #[inline]
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Array(_, _) | Self::Class(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Void => write!(f, "V"),
            Self::Boolean => write!(f, "Z"),
            Self::Byte => write!(f, "B"),
            Self::Short => write!(f, "S"),
            Self::Char => write!(f, "C"),
            Self::Int => write!(f, "I"),
            Self::Long => write!(f, "J"),
            Self::Float => write!(f, "F"),
            Self::Double => write!(f, "D"),
            Self::Array(n, inner) => {
                for _ in 0..*n {
                    write!(f, "[")?;
                }
                write!(f, "{inner}")
            }
            Self::Class(classname) => write!(f, "L{classname};"),
        }
    }
}

impl TryFrom<&str> for Type {
    type Error = DexError;

    fn try_from(s: &str) -> DexResult<Self> {
        if s.is_empty() {
            return Err(DexError::Conversion {
                from: format!("&str ({s:?})"),
                to: "Type".to_string(),
            });
        }

        if s == "V" {
            return Ok(Self::Void);
        }

        let i = s.bytes().take_while(|b| *b == b'[').count();
        if i >= s.len() || i >= 255 {
            return Err(DexError::Conversion {
                from: format!("&str ({s:?})"),
                to: "Type".to_string(),
            });
        }

        let t = match &s[i..] {
            "Z" => Ok(Self::Boolean),
            "B" => Ok(Self::Byte),
            "S" => Ok(Self::Short),
            "C" => Ok(Self::Char),
            "I" => Ok(Self::Int),
            "J" => Ok(Self::Long),
            "F" => Ok(Self::Float),
            "D" => Ok(Self::Double),
            sub => match sub.strip_prefix('L').and_then(|c| c.strip_suffix(';')) {
                Some(name) if !name.is_empty() && !name.contains(';') => {
                    Ok(Self::Class(name.to_string()))
                }
                _ => Err(DexError::Conversion {
                    from: format!("&str: ({s:?})"),
                    to: "Type".to_string(),
                }),
            },
        }?;
        if i == 0 {
            Ok(t)
        } else {
            Ok(Self::Array(i, Box::new(t)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_conversion() {
        assert_eq!(Type::try_from("I").unwrap(), Type::Int);
        assert_eq!(
            Type::try_from("[[Ljava/lang/String;").unwrap(),
            Type::Array(2, Box::new(Type::Class("java/lang/String".to_string())))
        );
        assert!(Type::try_from("").is_err());
        assert!(Type::try_from("[").is_err());
        assert!(Type::try_from("L;").is_err());
        assert!(Type::try_from("Q").is_err());
        assert!(Type::try_from("[Ljava/lang;String;").is_err());
    }

    #[test]
    fn non_ascii_descriptors() {
        assert!(matches!(Type::try_from("é"), Err(DexError::Conversion { .. })));
        assert!(matches!(Type::try_from("[é"), Err(DexError::Conversion { .. })));
        assert!(matches!(Type::try_from("Lé"), Err(DexError::Conversion { .. })));
        assert_eq!(
            Type::try_from("[Lcom/exemple/Été;").unwrap(),
            Type::Array(1, Box::new(Type::Class("com/exemple/Été".to_string())))
        );
    }

    #[test]
    fn descriptor_display() {
        for s in ["Z", "[B", "[[J", "Ljava/lang/Object;", "[Landroid/os/Bundle;"] {
            assert_eq!(format!("{}", Type::try_from(s).unwrap()), s);
        }
    }

    #[test]
    fn element_types() {
        let t = Type::try_from("[[I").unwrap();
        assert_eq!(t.element_type().unwrap(), Type::Array(1, Box::new(Type::Int)));
        assert_eq!(t.element_type().unwrap().element_type().unwrap(), Type::Int);
        assert!(Type::Int.element_type().is_err());
    }

    #[test]
    fn type_kinds() {
        assert!(Type::Class("java/lang/Object".to_string()).is_reference());
        assert!(Type::try_from("[J").unwrap().is_reference());
        assert!(!Type::Char.is_reference());
        assert!(!Type::Void.is_reference());
    }
}
