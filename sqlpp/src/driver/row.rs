//! Row returned by a query.

use super::Value;
use crate::Error;

/// Convert a column value into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::UInt(u) => Some(*u != 0),
            _ => None,
        }
    }
}

macro_rules! from_value_int {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(*i).ok(),
                        Value::UInt(u) => <$ty>::try_from(*u).ok(),
                        Value::Text(s) => s.parse().ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            Value::Bytes(b) => String::from_utf8(b.clone()).ok(),
            Value::Int(i) => Some(i.to_string()),
            Value::UInt(u) => Some(u.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b.clone()),
            Value::Text(s) => Some(s.as_bytes().to_vec()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_value(value).map(Some),
        }
    }
}

/// Current row of a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Read a column, converting it to `T`.
    pub fn get<T: FromValue>(&self, column: usize) -> Result<T, Error> {
        let value = self.value(column).ok_or(Error::Column(column))?;
        T::from_value(value).ok_or(Error::Type {
            column,
            expected: std::any::type_name::<T>(),
        })
    }

    /// Raw column value.
    pub fn value(&self, column: usize) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_row_get() {
        let row = Row::new(vec![
            Value::Int(1),
            Value::Text("two".into()),
            Value::Null,
            Value::UInt(300),
        ]);

        assert_eq!(row.get::<i64>(0).unwrap(), 1);
        assert_eq!(row.get::<String>(1).unwrap(), "two");
        assert_eq!(row.get::<Option<i32>>(2).unwrap(), None);
        assert_eq!(row.get::<Option<i32>>(0).unwrap(), Some(1));
        assert_eq!(row.get::<i64>(4), Err(Error::Column(4)));
        assert!(matches!(
            row.get::<u8>(3),
            Err(Error::Type { column: 3, .. })
        ));
        assert!(matches!(row.get::<i64>(1), Err(Error::Type { column: 1, .. })));
    }
}
