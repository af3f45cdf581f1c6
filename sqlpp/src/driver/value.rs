//! Values bound to query placeholders.

use serde::Serialize;

/// A single value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

value_from!(Int, i64, i8, i16, i32, i64, isize);
value_from!(UInt, u64, u8, u16, u32, u64, usize);
value_from!(Float, f64, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Query argument.
///
/// A list argument is expanded into as many placeholders as it has
/// elements, replacing the next `(?)` in the query.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Scalar(Value),
    List(Vec<Value>),
}

impl Arg {
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Scalar(value)
    }
}

macro_rules! scalar_arg_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Scalar(value.into())
                }
            }
        )+
    };
}

scalar_arg_from!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str, &String
);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        Arg::Scalar(value.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Arg {
    fn from(values: Vec<T>) -> Self {
        Arg::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Arg {
    fn from(values: &[T]) -> Self {
        Arg::List(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Arg {
    fn from(values: [T; N]) -> Self {
        Arg::List(values.into_iter().map(Into::into).collect())
    }
}

/// Build a list of query arguments.
///
/// ```
/// use sqlpp::{args, Arg, Value};
///
/// let args = args!["i", vec![1, 2], "k"];
/// assert_eq!(args[1], Arg::List(vec![Value::Int(1), Value::Int(2)]));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}
