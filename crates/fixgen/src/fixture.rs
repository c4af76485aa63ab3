//! The `Fixture` trait and its built-in implementations
//!
//! Built-ins cover the primitive-like types (raw and `Option`/`Box` wrapped),
//! arrays (`Box<[T]>`), lists (`Vec<T>`), maps, sets and the untyped
//! `Box<dyn Any>`.

use std::any::{type_name, Any};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use rust_decimal::Decimal;

use crate::descriptor::{PrimitiveKind, ShapeBuilder, TypeDescriptor};
use crate::errors::{FixgenError, Result};
use crate::value::Value;

/// A type the synthesizer can describe and fabricate
///
/// Implement by hand with [`ShapeBuilder`] or derive it with
/// `#[derive(Fixture)]`.
pub trait Fixture: Sized + 'static {
    /// Learn the shape of this type. Called once per type; see
    /// [`crate::registry::descriptor_of`].
    fn describe() -> TypeDescriptor;

    /// Turn a synthesized value back into this type
    fn from_value(value: Value) -> Result<Self> {
        value.downcast::<Self>()
    }
}

macro_rules! primitive_fixture {
    ($kind:ident => $variant:ident: $($ty:ty),+) => {
        $(
            impl Fixture for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::primitive::<$ty>(PrimitiveKind::$kind)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(raw) => <$ty>::try_from(raw).map_err(|_| {
                            FixgenError::conversion(
                                type_name::<$ty>(),
                                concat!(stringify!($variant), " default out of range"),
                            )
                        }),
                        other => Err(FixgenError::conversion(type_name::<$ty>(), other.describe())),
                    }
                }
            }
        )+
    };
}

primitive_fixture!(Boolean => Bool: bool);
primitive_fixture!(Int => Int: i32, i16, u16, u32);
primitive_fixture!(Long => Long: i64, u64, i128, u128, isize, usize);
primitive_fixture!(Float => Float: f32);
primitive_fixture!(Double => Double: f64);
primitive_fixture!(Decimal => Decimal: Decimal);
primitive_fixture!(Char => Char: char);
primitive_fixture!(Byte => Byte: i8, u8);
primitive_fixture!(String => Str: String);

impl<T: Fixture> Fixture for Option<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }

    fn from_value(value: Value) -> Result<Self> {
        if value.is_absent() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: Fixture> Fixture for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }

    fn from_value(value: Value) -> Result<Self> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: Fixture> Fixture for Box<[T]> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array::<Self, T>()
    }

    fn from_value(value: Value) -> Result<Self> {
        Vec::<T>::from_value(value).map(Vec::into_boxed_slice)
    }
}

impl<T: Fixture> Fixture for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::list::<Self, T>()
    }

    fn from_value(value: Value) -> Result<Self> {
        value.into_elements()?.into_iter().map(T::from_value).collect()
    }
}

impl<K, V> Fixture for HashMap<K, V>
where
    K: Eq + Hash + 'static,
    V: 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<Self>()
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map => Ok(HashMap::new()),
            other => Err(FixgenError::conversion(type_name::<Self>(), other.describe())),
        }
    }
}

impl<K, V> Fixture for BTreeMap<K, V>
where
    K: Ord + 'static,
    V: 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::map::<Self>()
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map => Ok(BTreeMap::new()),
            other => Err(FixgenError::conversion(type_name::<Self>(), other.describe())),
        }
    }
}

// Sets are neither list- nor map-like: they fall through to plain composites
// with no mutators, so they come out empty.
impl<T: Eq + Hash + 'static> Fixture for HashSet<T> {
    fn describe() -> TypeDescriptor {
        ShapeBuilder::<Self>::with_default().finish()
    }
}

impl<T: Ord + 'static> Fixture for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        ShapeBuilder::<Self>::with_default().finish()
    }
}

impl Fixture for Box<dyn Any> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::any_object::<Self>()
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(boxed) => Ok(boxed),
            other => Err(FixgenError::conversion(type_name::<Self>(), other.describe())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Shape;

    #[test]
    fn test_narrow_integers_convert_from_int_default() {
        assert_eq!(u16::from_value(Value::Int(7)).unwrap(), 7);
        assert!(u32::from_value(Value::Int(-1)).is_err());
        assert_eq!(u8::from_value(Value::Byte(5)).unwrap(), 5);
        assert!(u8::from_value(Value::Byte(-5)).is_err());
        assert_eq!(usize::from_value(Value::Long(9)).unwrap(), 9);
    }

    #[test]
    fn test_wrong_variant_is_conversion_error() {
        let err = i32::from_value(Value::Str("one".into())).unwrap_err();
        assert_eq!(err.to_string(), "Cannot convert string into i32");
    }

    #[test]
    fn test_wrappers_share_inner_shape() {
        assert!(matches!(
            Option::<i64>::describe().shape(),
            Shape::Primitive(PrimitiveKind::Long)
        ));
        assert!(matches!(
            Box::<char>::describe().shape(),
            Shape::Primitive(PrimitiveKind::Char)
        ));
        assert_eq!(Option::<i32>::from_value(Value::Absent).unwrap(), None);
        assert_eq!(Box::<i32>::from_value(Value::Int(3)).unwrap(), Box::new(3));
    }

    #[test]
    fn test_collections() {
        let list = Vec::<i32>::from_value(Value::List(vec![Value::Int(1), Value::Int(2)])).unwrap();
        assert_eq!(list, vec![1, 2]);

        let array = Box::<[bool]>::from_value(Value::Array(vec![Value::Bool(true)])).unwrap();
        assert_eq!(&*array, &[true]);

        let map = HashMap::<String, i32>::from_value(Value::Map).unwrap();
        assert!(map.is_empty());
        assert!(BTreeMap::<i32, i32>::from_value(Value::List(vec![])).is_err());

        assert!(matches!(Vec::<u8>::describe().shape(), Shape::List(Some(_))));
        assert!(matches!(Box::<[u8]>::describe().shape(), Shape::Array(_)));
        assert!(matches!(HashSet::<u8>::describe().shape(), Shape::Composite(_)));
    }

    #[test]
    fn test_any_object_passes_box_through() {
        let boxed = Box::<dyn Any>::from_value(Value::Object(Box::new(()))).unwrap();
        assert!(boxed.is::<()>());
        assert!(matches!(Box::<dyn Any>::describe().shape(), Shape::AnyObject(_)));
    }
}
