use std::fmt;

use serde::{Serialize, Serializer};
use smcp_error::Result;

macro_rules! impl_to_value_base {
    ($ty:ty, $enum_field:ident) => {
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::$enum_field(self.clone())
            }
        }
    };
}

macro_rules! impl_to_value_integer {
    ($ty:ty) => {
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::I64(*self as i64)
            }
        }
    };
}

macro_rules! impl_from_value_integer {
    ($ty:ty) => {
        impl FromValue for $ty {
            type Output = $ty;

            fn from_value(v: &Value) -> Result<Self::Output> {
                match v {
                    Value::I64(v) => <$ty>::try_from(*v).map_err(|_| {
                        smcp_error::from_value!(
                            "Integer {} out of range for {}",
                            v,
                            stringify!($ty)
                        )
                    }),
                    Value::Bool(v) => Ok(*v as $ty),
                    _ => Err(smcp_error::from_value!(
                        "Invalid value: {:?}, output type: {}",
                        v,
                        stringify!($ty)
                    )),
                }
            }
        }
    };
}

macro_rules! impl_from_value_base {
    ($ty:ty, $enum_field:ident) => {
        impl FromValue for $ty {
            type Output = $ty;

            fn from_value(v: &Value) -> Result<Self::Output> {
                match v {
                    Value::$enum_field(v) => Ok(v.clone()),
                    _ => Err(smcp_error::from_value!(
                        "Invalid value: {:?}, output type: {}",
                        v,
                        stringify!($ty)
                    )),
                }
            }
        }
    };
}

/// A single dynamically typed cell, as returned by the storage engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Renders a cell for human-readable reports. Null becomes `<NULL>` and blobs
/// become a SQL hex literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("<NULL>"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Str(v) => f.write_str(v),
            Value::Bytes(v) => {
                f.write_str("X'")?;
                for b in v {
                    write!(f, "{:02X}", b)?;
                }
                f.write_str("'")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Bytes(v) => v.serialize(serializer),
        }
    }
}

pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl_to_value_base! {bool, Bool}
impl_to_value_base! {i64, I64}
impl_to_value_base! {f64, F64}
impl_to_value_base! {String, Str}
impl_to_value_base! {Vec<u8>, Bytes}

impl_to_value_integer! {i32}
impl_to_value_integer! {u32}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        if let Some(v) = self {
            T::to_value(v)
        } else {
            Value::Null
        }
    }
}

pub trait FromValue {
    type Output;

    fn from_value(v: &Value) -> Result<Self::Output>;
}

impl<T: FromValue> FromValue for Option<T> {
    type Output = Option<<T as FromValue>::Output>;

    fn from_value(v: &Value) -> Result<Self::Output> {
        match v {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(v)?)),
        }
    }
}

impl FromValue for bool {
    type Output = bool;

    fn from_value(v: &Value) -> Result<Self::Output> {
        match v {
            Value::Bool(v) => Ok(*v),
            Value::I64(v) => Ok(*v != 0),
            _ => Err(smcp_error::from_value!(
                "Invalid value: {:?}, output type: {}",
                v,
                stringify!(bool)
            )),
        }
    }
}

impl FromValue for f64 {
    type Output = f64;

    fn from_value(v: &Value) -> Result<Self::Output> {
        match v {
            Value::F64(v) => Ok(*v),
            Value::I64(v) => Ok(*v as f64),
            _ => Err(smcp_error::from_value!(
                "Invalid value: {:?}, output type: {}",
                v,
                stringify!(f64)
            )),
        }
    }
}

impl_from_value_integer! {i32}
impl_from_value_integer! {u32}
impl_from_value_integer! {i64}
impl_from_value_integer! {u64}

impl_from_value_base! {String, Str}
impl_from_value_base! {Vec<u8>, Bytes}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "<NULL>");
        assert_eq!(Value::I64(-7).to_string(), "-7");
        assert_eq!(Value::F64(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("".into()).to_string(), "");
        assert_eq!(Value::Bytes(vec![0x0a, 0xff]).to_string(), "X'0AFF'");
    }

    #[test]
    fn test_serialize_scalars() {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::I64(3),
            Value::F64(1.5),
            Value::Str("a".into()),
            Value::Bytes(vec![1, 2]),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,true,3,1.5,"a",[1,2]]"#
        );
    }

    #[test]
    fn test_from_value() {
        assert_eq!(bool::from_value(&Value::I64(1)).unwrap(), true);
        assert_eq!(bool::from_value(&Value::I64(0)).unwrap(), false);
        assert_eq!(u32::from_value(&Value::I64(42)).unwrap(), 42);
        assert!(u32::from_value(&Value::I64(-1)).is_err());
        assert!(String::from_value(&Value::I64(1)).is_err());
        assert_eq!(
            <Option<String>>::from_value(&Value::Null).unwrap(),
            None::<String>
        );
        assert_eq!(
            <Option<String>>::from_value(&Value::Str("x".into())).unwrap(),
            Some("x".to_string())
        );
    }
}
