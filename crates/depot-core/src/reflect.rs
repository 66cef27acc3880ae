//! Runtime inspection surface the entity accessor works through.
//!
//! `#[derive(Entity)]` implements [`Reflect`] for named structs. Scalars
//! implement it too so that handing one to an accessor is an ordinary
//! `InvalidEntityType` error rather than a type error at the call site.

use crate::value::{FieldValue, Value, ValueTypeError};
use chrono::{DateTime, Utc};
use std::any::TypeId;

///
/// FieldTag
///
/// One declared struct field: its Rust identifier and the raw annotation
/// string carried by `#[depot("...")]` (empty when absent).
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldTag {
    pub ident: &'static str,
    pub tag: &'static str,
}

impl FieldTag {
    #[must_use]
    pub const fn new(ident: &'static str, tag: &'static str) -> Self {
        Self { ident, tag }
    }
}

///
/// Reflect
///
/// Object-safe view of a value as a record. Field indexes follow
/// declaration order and match the order of `field_tags`.
///

pub trait Reflect: 'static {
    /// Identity of the concrete record type, after unwrapping boxes.
    fn type_key(&self) -> TypeId;

    fn type_name(&self) -> &'static str;

    /// Declared fields, or `None` when the value is not a record.
    fn field_tags(&self) -> Option<&'static [FieldTag]>;

    fn field_value(&self, index: usize) -> Option<Value>;

    fn set_field_value(&mut self, index: usize, value: Value) -> Result<(), ValueTypeError>;
}

///
/// Entity
///
/// A record the table facade can hydrate from storage.
///

pub trait Entity: Reflect + Clone + Default {}

impl<T: Reflect + Clone + Default> Entity for T {}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn type_key(&self) -> TypeId {
        (**self).type_key()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn field_tags(&self) -> Option<&'static [FieldTag]> {
        (**self).field_tags()
    }

    fn field_value(&self, index: usize) -> Option<Value> {
        (**self).field_value(index)
    }

    fn set_field_value(&mut self, index: usize, value: Value) -> Result<(), ValueTypeError> {
        (**self).set_field_value(index, value)
    }
}

// Scalars are values, not records.
macro_rules! impl_reflect_scalar {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl Reflect for $ty {
                fn type_key(&self) -> TypeId {
                    TypeId::of::<Self>()
                }

                fn type_name(&self) -> &'static str {
                    std::any::type_name::<Self>()
                }

                fn field_tags(&self) -> Option<&'static [FieldTag]> {
                    None
                }

                fn field_value(&self, _index: usize) -> Option<Value> {
                    None
                }

                fn set_field_value(
                    &mut self,
                    _index: usize,
                    value: Value,
                ) -> Result<(), ValueTypeError> {
                    Err(ValueTypeError::new(<$ty as FieldValue>::KIND, &value))
                }
            }
        )*
    };
}

impl_reflect_scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    DateTime<Utc>,
    Value,
);

impl Reflect for &'static str {
    fn type_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn type_name(&self) -> &'static str {
        "&str"
    }

    fn field_tags(&self) -> Option<&'static [FieldTag]> {
        None
    }

    fn field_value(&self, _index: usize) -> Option<Value> {
        None
    }

    fn set_field_value(&mut self, _index: usize, value: Value) -> Result<(), ValueTypeError> {
        Err(ValueTypeError::new("text", &value))
    }
}
