//! Dynamically typed values exchanged between generated code, the statement
//! builder, the validation engine and a [`Connection`](crate::Connection).

use std::fmt;

use strum::IntoStaticStr;

use crate::error::{RuntimeError, RuntimeResult};

/// A single column value or bind parameter.
#[derive(Debug, Clone, PartialEq, Default, IntoStaticStr)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether the value equals the zero representation of its type.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::UInt(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_into_value {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_into_value!(
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    isize => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    usize => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a column value back into a model field.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> RuntimeResult<Self>;
}

fn conversion<T>(expected: &'static str, value: &Value) -> RuntimeResult<T> {
    Err(RuntimeError::Conversion {
        expected,
        found: value.kind(),
    })
}

macro_rules! impl_from_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> RuntimeResult<Self> {
                    let converted = match value {
                        Value::Int(i) => <$ty>::try_from(*i).ok(),
                        Value::UInt(u) => <$ty>::try_from(*u).ok(),
                        Value::Bool(b) => Some(<$ty>::from(*b)),
                        _ => None,
                    };
                    match converted {
                        Some(v) => Ok(v),
                        None => conversion(stringify!($ty), value),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> RuntimeResult<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::UInt(u) => Ok(*u as f64),
            _ => conversion("f64", value),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> RuntimeResult<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> RuntimeResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::UInt(u) => Ok(*u != 0),
            _ => conversion("bool", value),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> RuntimeResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Null => conversion("String", value),
            other => Ok(other.to_string()),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> RuntimeResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// One result row, values in select-column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn get<T: FromValue>(&self, index: usize) -> RuntimeResult<T> {
        let value = self.0.get(index).ok_or(RuntimeError::ColumnIndex(index))?;
        T::from_value(value)
    }

    /// Like [`Row::get`], but a missing column yields the type's default.
    ///
    /// Generated scanners use this so a narrowed `select` leaves unselected
    /// fields at their zero value.
    pub fn get_or_default<T: FromValue + Default>(&self, index: usize) -> RuntimeResult<T> {
        match self.0.get(index) {
            Some(Value::Null) | None => Ok(T::default()),
            Some(value) => T::from_value(value),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}
