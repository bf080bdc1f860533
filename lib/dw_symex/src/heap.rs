//! Heap objects referenced by abstract values.
//!
//! Handles are shared: cloning an [`ArrayHandle`] does not copy the array, so a
//! store through one register is observed by every register holding the same
//! handle. Handle equality is identity.

use crate::errors::{DecoderError, ExecutionError, SymexResult};
use crate::hierarchy::Hierarchy;
use crate::value::AbstractValue;
use dw_dex::types::Type;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Typed array slots, zero-initialized at allocation.
#[derive(Debug)]
enum Storage {
    Boolean(Vec<bool>),
    Byte(Vec<i8>),
    Char(Vec<u16>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    // float and double slots hold raw bits
    Float(Vec<u32>),
    Double(Vec<u64>),
    Reference(Vec<Option<AbstractValue>>),
}

impl Storage {
    fn zeroed(element: &Type, length: usize) -> SymexResult<Self> {
        Ok(match element {
            Type::Boolean => Self::Boolean(vec![false; length]),
            Type::Byte => Self::Byte(vec![0; length]),
            Type::Char => Self::Char(vec![0; length]),
            Type::Short => Self::Short(vec![0; length]),
            Type::Int => Self::Int(vec![0; length]),
            Type::Long => Self::Long(vec![0; length]),
            Type::Float => Self::Float(vec![0; length]),
            Type::Double => Self::Double(vec![0; length]),
            Type::Array(_, _) | Type::Class(_) => Self::Reference(vec![None; length]),
            Type::Void => {
                return Err(DecoderError::PreconditionViolation(
                    "array of void elements".to_string(),
                )
                .into())
            }
        })
    }

    fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Byte(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Reference(v) => v.len(),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn get(&self, i: usize) -> Option<AbstractValue> {
        Some(match self {
            Self::Boolean(v) => AbstractValue::Bool(*v.get(i)?),
            Self::Byte(v) => AbstractValue::Byte(*v.get(i)?),
            Self::Char(v) => AbstractValue::Char(*v.get(i)?),
            Self::Short(v) => AbstractValue::Short(*v.get(i)?),
            Self::Int(v) => AbstractValue::Int32(*v.get(i)?),
            Self::Long(v) => AbstractValue::Int64(*v.get(i)?),
            Self::Float(v) => AbstractValue::Int32(*v.get(i)? as i32),
            Self::Double(v) => AbstractValue::Int64(*v.get(i)? as i64),
            Self::Reference(v) => v.get(i)?.clone().unwrap_or(AbstractValue::Null),
        })
    }

    /// Writes a value into slot `i`, which must be in bounds. Gives the value
    /// back if it does not fit the element type.
    #[allow(clippy::cast_sign_loss)]
    fn put(&mut self, i: usize, value: AbstractValue) -> Result<(), AbstractValue> {
        match (self, value) {
            (Self::Boolean(v), AbstractValue::Bool(b)) => v[i] = b,
            (Self::Byte(v), AbstractValue::Byte(b)) => v[i] = b,
            (Self::Char(v), AbstractValue::Char(c)) => v[i] = c,
            (Self::Short(v), AbstractValue::Short(s)) => v[i] = s,
            (Self::Short(v), AbstractValue::Byte(b)) => v[i] = i16::from(b),
            (Self::Int(v), AbstractValue::Int32(n)) => v[i] = n,
            (Self::Int(v), AbstractValue::Short(s)) => v[i] = i32::from(s),
            (Self::Int(v), AbstractValue::Byte(b)) => v[i] = i32::from(b),
            (Self::Int(v), AbstractValue::Char(c)) => v[i] = i32::from(c),
            (Self::Long(v), AbstractValue::Int64(n)) => v[i] = n,
            (Self::Long(v), AbstractValue::Int32(n)) => v[i] = i64::from(n),
            (Self::Long(v), AbstractValue::Short(s)) => v[i] = i64::from(s),
            (Self::Long(v), AbstractValue::Byte(b)) => v[i] = i64::from(b),
            (Self::Long(v), AbstractValue::Char(c)) => v[i] = i64::from(c),
            (Self::Float(v), AbstractValue::Int32(bits)) => v[i] = bits as u32,
            (Self::Double(v), AbstractValue::Int64(bits)) => v[i] = bits as u64,
            (Self::Reference(v), AbstractValue::Null) => v[i] = None,
            (Self::Reference(v), value) if value.is_reference() => v[i] = Some(value),
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

#[derive(Debug)]
struct ArrayObject {
    typ: Type,
    element: Type,
    storage: RefCell<Storage>,
}

/// A shared reference to a simulated array.
#[derive(Clone)]
pub struct ArrayHandle(Rc<ArrayObject>);

// Shallow, arrays of references may contain themselves.
impl fmt::Debug for ArrayHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ArrayHandle({:p}, {self})", Rc::as_ptr(&self.0))
    }
}

impl PartialEq for ArrayHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ArrayHandle {}

impl fmt::Display for ArrayHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "array({}, length {})", self.0.typ, self.len())
    }
}

impl ArrayHandle {
    /// Allocates a zero-initialized array of the given array type.
    ///
    /// # Errors
    ///
    /// Fails if `typ` is not an array type, or if `length` does not fit a
    /// Dalvik array length (a non-negative `int`).
    pub fn allocate(typ: Type, length: usize) -> SymexResult<Self> {
        let element = typ.element_type().map_err(|_| {
            DecoderError::PreconditionViolation(format!("{typ} is not an array type"))
        })?;
        if i32::try_from(length).is_err() {
            return Err(DecoderError::PreconditionViolation(format!(
                "array length {length} exceeds {}",
                i32::MAX
            ))
            .into());
        }
        let storage = Storage::zeroed(&element, length)?;
        log::trace!("allocate {typ} of length {length}");
        Ok(Self(Rc::new(ArrayObject {
            typ,
            element,
            storage: RefCell::new(storage),
        })))
    }

    #[inline]
    #[must_use]
    pub fn array_type(&self) -> &Type {
        &self.0.typ
    }

    #[inline]
    #[must_use]
    pub fn element_type(&self) -> &Type {
        &self.0.element
    }

    /// Returns the declared type descriptor of the array, e.g. `[I`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.0.typ.to_string()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.storage.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value of the `index`th slot, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<AbstractValue> {
        self.0.storage.borrow().get(index)
    }

    /// Returns a snapshot of all the slots.
    #[must_use]
    pub fn contents(&self) -> Vec<AbstractValue> {
        let storage = self.0.storage.borrow();
        (0..storage.len()).filter_map(|i| storage.get(i)).collect()
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stores `value` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::IndexOutOfBounds`] if `index` is outside of the
    /// array, and [`ExecutionError::ArrayStoreMismatch`] if `value` does not fit
    /// the element type. The array is left untouched on error.
    pub fn store(
        &self,
        index: i32,
        value: AbstractValue,
        hierarchy: &Hierarchy,
    ) -> Result<(), ExecutionError> {
        let length = self.len();
        let slot = usize::try_from(index)
            .ok()
            .filter(|i| *i < length)
            .ok_or(ExecutionError::IndexOutOfBounds { index, length })?;

        if value.is_reference() && !self.accepts_reference(&value, hierarchy) {
            return Err(self.mismatch(&value));
        }

        let stored = self.0.storage.borrow_mut().put(slot, value);
        stored.map_err(|value| self.mismatch(&value))
    }

    fn accepts_reference(&self, value: &AbstractValue, hierarchy: &Hierarchy) -> bool {
        if !self.0.element.is_reference() {
            return false;
        }
        match value {
            AbstractValue::Null => true,
            AbstractValue::ArrayRef(h) => hierarchy.is_assignable(h.array_type(), &self.0.element),
            AbstractValue::ObjectRef(h) => hierarchy.is_assignable(h.class_type(), &self.0.element),
            AbstractValue::Unknown(t) => Type::try_from(t.as_str())
                .map_or(false, |t| hierarchy.is_assignable(&t, &self.0.element)),
            _ => false,
        }
    }

    fn mismatch(&self, value: &AbstractValue) -> ExecutionError {
        ExecutionError::ArrayStoreMismatch {
            value: value.to_string(),
            array: self.descriptor(),
        }
    }
}

#[derive(Debug)]
struct Instance {
    class: Type,
}

/// A shared reference to a simulated class instance.
#[derive(Debug, Clone)]
pub struct ObjectHandle(Rc<Instance>);

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectHandle {}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "object({})", self.0.class)
    }
}

impl ObjectHandle {
    /// Creates an instance of the given class type.
    pub fn new(class: Type) -> SymexResult<Self> {
        if let Type::Class(_) = class {
            Ok(Self(Rc::new(Instance { class })))
        } else {
            Err(DecoderError::PreconditionViolation(format!("{class} is not a class type")).into())
        }
    }

    #[inline]
    #[must_use]
    pub fn class_type(&self) -> &Type {
        &self.0.class
    }

    #[must_use]
    pub fn descriptor(&self) -> String {
        self.0.class.to_string()
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SymexError;
    use dw_dex::parse_type;

    fn array(descriptor: &str, length: usize) -> ArrayHandle {
        ArrayHandle::allocate(parse_type(descriptor).unwrap(), length).unwrap()
    }

    fn object(descriptor: &str) -> AbstractValue {
        AbstractValue::ObjectRef(ObjectHandle::new(parse_type(descriptor).unwrap()).unwrap())
    }

    #[test]
    fn zero_initialized() {
        assert_eq!(array("[Z", 2).contents(), vec![AbstractValue::Bool(false); 2]);
        assert_eq!(array("[C", 1).contents(), vec![AbstractValue::Char(0)]);
        assert_eq!(array("[J", 3).contents(), vec![AbstractValue::Int64(0); 3]);
        assert_eq!(
            array("[Ljava/lang/Object;", 2).contents(),
            vec![AbstractValue::Null; 2]
        );
        assert!(array("[I", 0).is_empty());
    }

    #[test]
    fn allocation_errors() {
        assert!(ArrayHandle::allocate(Type::Int, 4).is_err());
        assert!(ArrayHandle::allocate(Type::Array(1, Box::new(Type::Void)), 4).is_err());
        assert!(ObjectHandle::new(Type::Array(1, Box::new(Type::Int))).is_err());
    }

    #[test]
    fn oversized_allocation() {
        for length in [usize::MAX, i32::MAX as usize + 1] {
            assert!(matches!(
                ArrayHandle::allocate(parse_type("[J").unwrap(), length),
                Err(SymexError::Decoder(DecoderError::PreconditionViolation(_)))
            ));
        }
    }

    #[test]
    fn aliasing() {
        let a = array("[I", 4);
        let b = a.clone();
        a.store(1, AbstractValue::Int32(42), &Hierarchy::new()).unwrap();
        assert_eq!(b.get(1), Some(AbstractValue::Int32(42)));
        assert_eq!(a, b);
        assert_ne!(a, array("[I", 4));
    }

    #[test]
    fn bounds() {
        let a = array("[I", 4);
        let h = Hierarchy::new();
        assert_eq!(
            a.store(4, AbstractValue::Int32(0), &h),
            Err(ExecutionError::IndexOutOfBounds {
                index: 4,
                length: 4
            })
        );
        assert_eq!(
            a.store(-1, AbstractValue::Int32(0), &h),
            Err(ExecutionError::IndexOutOfBounds {
                index: -1,
                length: 4
            })
        );
        assert_eq!(a.get(4), None);
    }

    #[test]
    fn primitive_widening_stores() {
        let h = Hierarchy::new();
        let ints = array("[I", 2);
        ints.store(0, AbstractValue::Byte(-3), &h).unwrap();
        ints.store(1, AbstractValue::Char(0xffff), &h).unwrap();
        assert_eq!(
            ints.contents(),
            vec![AbstractValue::Int32(-3), AbstractValue::Int32(0xffff)]
        );

        let longs = array("[J", 1);
        longs.store(0, AbstractValue::Int32(-1), &h).unwrap();
        assert_eq!(longs.get(0), Some(AbstractValue::Int64(-1)));

        let bytes = array("[B", 1);
        assert!(matches!(
            bytes.store(0, AbstractValue::Int32(1), &h),
            Err(ExecutionError::ArrayStoreMismatch { .. })
        ));
        assert_eq!(bytes.get(0), Some(AbstractValue::Byte(0)));
    }

    #[test]
    fn float_slots_hold_bits() {
        let h = Hierarchy::new();
        let floats = array("[F", 1);
        let bits = 1.5f32.to_bits() as i32;
        floats.store(0, AbstractValue::Int32(bits), &h).unwrap();
        assert_eq!(floats.get(0), Some(AbstractValue::Int32(bits)));
        // signalling NaN payloads are kept as is
        floats.store(0, AbstractValue::Int32(0x7f80_0001), &h).unwrap();
        assert_eq!(floats.get(0), Some(AbstractValue::Int32(0x7f80_0001)));

        let doubles = array("[D", 1);
        let bits = (-2.25f64).to_bits() as i64;
        doubles.store(0, AbstractValue::Int64(bits), &h).unwrap();
        assert_eq!(doubles.get(0), Some(AbstractValue::Int64(bits)));
        doubles.store(0, AbstractValue::Int64(-1), &h).unwrap();
        assert_eq!(doubles.get(0), Some(AbstractValue::Int64(-1)));
    }

    #[test]
    fn reference_stores() {
        let h = Hierarchy::new();
        let objects = array("[Ljava/lang/Object;", 3);
        let s = object("Ljava/lang/String;");
        objects.store(0, s.clone(), &h).unwrap();
        objects.store(1, AbstractValue::ArrayRef(array("[I", 1)), &h).unwrap();
        objects.store(2, AbstractValue::Null, &h).unwrap();
        assert_eq!(objects.get(0), Some(s));
        assert_eq!(objects.get(2), Some(AbstractValue::Null));

        assert!(matches!(
            objects.store(0, AbstractValue::Int32(0), &h),
            Err(ExecutionError::ArrayStoreMismatch { .. })
        ));
        assert!(matches!(
            array("[I", 1).store(0, AbstractValue::Null, &h),
            Err(ExecutionError::ArrayStoreMismatch { .. })
        ));
    }

    #[test]
    fn reference_store_mismatch() {
        let mut h = Hierarchy::new();
        h.insert_extends("java/lang/String", "java/lang/Object");
        h.insert_extends("java/lang/Integer", "java/lang/Number");
        h.insert_extends("java/lang/Number", "java/lang/Object");

        let strings = array("[Ljava/lang/String;", 1);
        assert_eq!(
            strings.store(0, object("Ljava/lang/Integer;"), &h),
            Err(ExecutionError::ArrayStoreMismatch {
                value: "object(Ljava/lang/Integer;)".to_string(),
                array: "[Ljava/lang/String;".to_string(),
            })
        );
        assert_eq!(strings.get(0), Some(AbstractValue::Null));

        let numbers = array("[Ljava/lang/Number;", 1);
        numbers.store(0, object("Ljava/lang/Integer;"), &h).unwrap();
    }

    #[test]
    fn unknown_reference_stores() {
        let mut h = Hierarchy::new();
        h.insert_extends("java/lang/String", "java/lang/Object");

        let objects = array("[Ljava/lang/Object;", 2);
        let unknown = AbstractValue::unknown("Ljava/lang/String;");
        objects.store(0, unknown.clone(), &h).unwrap();
        objects.store(1, AbstractValue::unknown("[I"), &h).unwrap();
        assert_eq!(objects.get(0), Some(unknown.clone()));

        let numbers = array("[Ljava/lang/Number;", 1);
        assert_eq!(
            numbers.store(0, unknown, &h),
            Err(ExecutionError::ArrayStoreMismatch {
                value: "unknown(Ljava/lang/String;)".to_string(),
                array: "[Ljava/lang/Number;".to_string(),
            })
        );
        assert!(matches!(
            objects.store(0, AbstractValue::unknown("I"), &h),
            Err(ExecutionError::ArrayStoreMismatch { .. })
        ));
        assert!(matches!(
            array("[I", 1).store(0, AbstractValue::unknown("[I"), &h),
            Err(ExecutionError::ArrayStoreMismatch { .. })
        ));
        assert_eq!(numbers.get(0), Some(AbstractValue::Null));
    }
}
