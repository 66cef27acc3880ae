use crate::value::{Value, ValueTypeError};
use chrono::{DateTime, Utc};
use num_traits::NumCast;
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

///
/// FieldValue
///
/// Conversion boundary between a Rust field type and its `Value`
/// projection. `to_value(&T::default())` is always a zero value, and
/// `Null` converts back into `T::default()`.
///

pub trait FieldValue: Sized {
    /// Label used in conversion errors.
    const KIND: &'static str;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueTypeError>;
}

// numeric kinds accept any numeric variant that fits without loss of range
macro_rules! impl_field_value_numeric {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $ty {
                const KIND: &'static str = stringify!($ty);

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value) -> Result<Self, ValueTypeError> {
                    let cast = match value {
                        Value::Null => return Ok(Self::default()),
                        Value::Int8(v) => <Self as NumCast>::from(v),
                        Value::Int16(v) => <Self as NumCast>::from(v),
                        Value::Int32(v) => <Self as NumCast>::from(v),
                        Value::Int64(v) => <Self as NumCast>::from(v),
                        Value::Uint8(v) => <Self as NumCast>::from(v),
                        Value::Uint16(v) => <Self as NumCast>::from(v),
                        Value::Uint32(v) => <Self as NumCast>::from(v),
                        Value::Uint64(v) => <Self as NumCast>::from(v),
                        Value::Float32(v) => <Self as NumCast>::from(v),
                        Value::Float64(v) => <Self as NumCast>::from(v),
                        _ => None,
                    };

                    cast.ok_or_else(|| ValueTypeError::new(Self::KIND, &value))
                }
            }
        )*
    };
}

impl_field_value_numeric! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
}

impl FieldValue for bool {
    const KIND: &'static str = "bool";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(v) => Ok(v),
            other => Err(ValueTypeError::new(Self::KIND, &other)),
        }
    }
}

impl FieldValue for String {
    const KIND: &'static str = "text";

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Text(v) => Ok(v),
            other => Err(ValueTypeError::new(Self::KIND, &other)),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    const KIND: &'static str = "timestamp";

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    // RFC 3339 text is accepted so maps decoded from JSON still hydrate.
    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Timestamp(v) => Ok(v),
            Value::Text(ref text) => DateTime::parse_from_rfc3339(text)
                .map(|v| v.with_timezone(&Utc))
                .map_err(|_| ValueTypeError::new(Self::KIND, &value)),
            other => Err(ValueTypeError::new(Self::KIND, &other)),
        }
    }
}

impl FieldValue for Value {
    const KIND: &'static str = "value";

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        Ok(value)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const KIND: &'static str = T::KIND;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        if value.is_null() {
            return Ok(None);
        }

        T::from_value(value).map(Some)
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    const KIND: &'static str = T::KIND;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        T::from_value(value).map(Self::new)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    const KIND: &'static str = "list";

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueTypeError::new(Self::KIND, &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    const KIND: &'static str = "map";

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(ValueTypeError::new(Self::KIND, &other)),
        }
    }
}

impl<T, S> FieldValue for HashMap<String, T, S>
where
    T: FieldValue,
    S: BuildHasher + Default,
{
    const KIND: &'static str = "map";

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueTypeError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(ValueTypeError::new(Self::KIND, &other)),
        }
    }
}
