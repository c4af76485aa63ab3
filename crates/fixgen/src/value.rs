//! Dynamic values produced by synthesis
//!
//! The synthesizer works on descriptors, not on concrete Rust types, so every
//! value it fabricates travels as a [`Value`] until a [`crate::Fixture`]
//! implementation turns it back into the concrete type at a mutator boundary.

use std::any::Any;
use std::fmt;

use rust_decimal::Decimal;

use crate::errors::{FixgenError, Result};

/// A synthesized value of some described type
pub enum Value {
    /// Absence marker: suppressed, unconstructible or constant-less types
    Absent,
    /// Boolean default
    Bool(bool),
    /// 32-bit integer default
    Int(i32),
    /// 64-bit integer default
    Long(i64),
    /// 32-bit float default
    Float(f32),
    /// 64-bit float default
    Double(f64),
    /// High-precision decimal default
    Decimal(Decimal),
    /// Character default
    Char(char),
    /// Byte default
    Byte(i8),
    /// String default
    Str(String),
    /// Fixed-size array filled element-wise
    Array(Vec<Value>),
    /// List-like container, possibly empty
    List(Vec<Value>),
    /// Empty map-like container
    Map,
    /// Any other constructed value: composites, enum constants, proxies
    Object(Box<dyn Any>),
}

impl Value {
    /// True for [`Value::Absent`]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Short description used in conversion errors and logs
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Char(_) => "char",
            Value::Byte(_) => "byte",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Map => "map",
            Value::Object(_) => "object",
        }
    }

    /// Take the boxed object out as `T`
    pub fn downcast<T: Any>(self) -> Result<T> {
        match self {
            Value::Object(boxed) => boxed.downcast::<T>().map(|value| *value).map_err(|_| {
                FixgenError::conversion(std::any::type_name::<T>(), "object of another type")
            }),
            other => Err(FixgenError::conversion(
                std::any::type_name::<T>(),
                other.describe(),
            )),
        }
    }

    /// Collection payload of an array or list value
    pub fn into_elements(self) -> Result<Vec<Value>> {
        match self {
            Value::Array(items) | Value::List(items) => Ok(items),
            other => Err(FixgenError::conversion("collection", other.describe())),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("Absent"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Long(v) => f.debug_tuple("Long").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Value::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::Byte(v) => f.debug_tuple("Byte").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map => f.write_str("Map"),
            Value::Object(_) => f.write_str("Object(..)"),
        }
    }
}
