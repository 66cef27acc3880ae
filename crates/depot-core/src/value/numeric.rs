//! Type-erased arithmetic and comparison over `Value`.
//!
//! Two rules drive everything here:
//! - the right-hand operand (the delta, or the query literal) fixes the
//!   numeric representation, and the left-hand operand is coerced into it;
//! - text compares textually against anything non-null.

use crate::value::Value;
use num_traits::{AsPrimitive, WrappingAdd, WrappingSub};
use std::cmp::Ordering;

///
/// Numeric
///
/// Primitive representation a numeric `Value` variant carries.
/// Integer arithmetic wraps; float arithmetic follows IEEE rules.
///

pub trait Numeric: Copy + Default + PartialOrd + 'static {
    /// Coerce any numeric value into this representation with primitive
    /// cast semantics. Non-numeric values yield `None`.
    fn coerce(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;

    #[must_use]
    fn plus(self, other: Self) -> Self;

    #[must_use]
    fn minus(self, other: Self) -> Self;
}

macro_rules! coerce_as {
    ($value:expr, $target:ty) => {
        match *$value {
            Value::Int8(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Int16(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Int32(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Int64(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Uint8(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Uint16(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Uint32(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Uint64(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Float32(v) => Some(AsPrimitive::<$target>::as_(v)),
            Value::Float64(v) => Some(AsPrimitive::<$target>::as_(v)),
            _ => None,
        }
    };
}

macro_rules! impl_numeric_int {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl Numeric for $ty {
                fn coerce(value: &Value) -> Option<Self> {
                    coerce_as!(value, $ty)
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn plus(self, other: Self) -> Self {
                    WrappingAdd::wrapping_add(&self, &other)
                }

                fn minus(self, other: Self) -> Self {
                    WrappingSub::wrapping_sub(&self, &other)
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl Numeric for $ty {
                fn coerce(value: &Value) -> Option<Self> {
                    coerce_as!(value, $ty)
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn plus(self, other: Self) -> Self {
                    self + other
                }

                fn minus(self, other: Self) -> Self {
                    self - other
                }
            }
        )*
    };
}

impl_numeric_int! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
}

impl_numeric_float! {
    f32 => Float32,
    f64 => Float64,
}

// Expand `$body` once per numeric variant of `$value`, binding the payload
// to `$n`; anything else evaluates `$fallback`.
macro_rules! match_numeric {
    ($value:expr, |$n:ident| $body:expr, _ => $fallback:expr) => {
        match *$value {
            Value::Int8($n) => $body,
            Value::Int16($n) => $body,
            Value::Int32($n) => $body,
            Value::Int64($n) => $body,
            Value::Uint8($n) => $body,
            Value::Uint16($n) => $body,
            Value::Uint32($n) => $body,
            Value::Uint64($n) => $body,
            Value::Float32($n) => $body,
            Value::Float64($n) => $body,
            _ => $fallback,
        }
    };
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Add `delta` to `existing`, returning a value of `delta`'s type.
///
/// A missing or non-numeric `existing` counts as zero. A non-numeric
/// `delta` is returned unchanged.
#[must_use]
pub fn add_values(existing: &Value, delta: &Value) -> Value {
    match_numeric!(delta, |d| coerce_or_zero(existing, d).plus(d).into_value(), _ => delta.clone())
}

/// Subtract `delta` from `existing`, returning a value of `delta`'s type.
///
/// A missing or non-numeric `existing` counts as zero, so the result is
/// `0 - delta` (wrapping for unsigned kinds).
#[must_use]
pub fn subtract_values(existing: &Value, delta: &Value) -> Value {
    match_numeric!(delta, |d| coerce_or_zero(existing, d).minus(d).into_value(), _ => delta.clone())
}

/// Negate signed integer and float values.
///
/// Unsigned and non-numeric values come back unchanged.
#[must_use]
pub fn negate_value(value: &Value) -> Value {
    checked_negate_value(value).unwrap_or_else(|| value.clone())
}

/// Negate signed integer and float values; `None` for anything that has
/// no negation in its own representation.
#[must_use]
pub fn checked_negate_value(value: &Value) -> Option<Value> {
    let negated = match *value {
        Value::Int8(v) => Value::Int8(v.wrapping_neg()),
        Value::Int16(v) => Value::Int16(v.wrapping_neg()),
        Value::Int32(v) => Value::Int32(v.wrapping_neg()),
        Value::Int64(v) => Value::Int64(v.wrapping_neg()),
        Value::Float32(v) => Value::Float32(-v),
        Value::Float64(v) => Value::Float64(-v),
        _ => return None,
    };

    Some(negated)
}

fn coerce_or_zero<T: Numeric>(existing: &Value, _like: T) -> T {
    T::coerce(existing).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Order `left` against `right`, or `None` when the pair is not ordered.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Text(l), Value::Text(r)) => Some(l.cmp(r)),
        (Value::Text(l), r) => Some(l.as_str().cmp(r.to_string().as_str())),
        (l, Value::Text(r)) => Some(l.to_string().as_str().cmp(r.as_str())),
        (Value::Timestamp(l), Value::Timestamp(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => match_numeric!(right, |r| compare_numeric(left, r), _ => None),
    }
}

fn compare_numeric<T: Numeric>(left: &Value, right: T) -> Option<Ordering> {
    T::coerce(left)?.partial_cmp(&right)
}

/// Equality with `left` coerced into `right`'s representation.
///
/// Numbers and text compare through `compare_values`; every other pair falls back
/// to structural equality, so `Null` only ever equals `Null`.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    let textual = matches!(left, Value::Text(_)) || matches!(right, Value::Text(_));

    if right.is_numeric() || textual {
        compare_values(left, right).is_some_and(Ordering::is_eq)
    } else {
        left == right
    }
}

#[must_use]
pub fn values_not_equal(left: &Value, right: &Value) -> bool {
    !values_equal(left, right)
}

#[must_use]
pub fn values_less_than(left: &Value, right: &Value) -> bool {
    compare_values(left, right).is_some_and(Ordering::is_lt)
}

#[must_use]
pub fn values_less_than_or_equal(left: &Value, right: &Value) -> bool {
    compare_values(left, right).is_some_and(Ordering::is_le)
}

#[must_use]
pub fn values_greater_than(left: &Value, right: &Value) -> bool {
    compare_values(left, right).is_some_and(Ordering::is_gt)
}

#[must_use]
pub fn values_greater_than_or_equal(left: &Value, right: &Value) -> bool {
    compare_values(left, right).is_some_and(Ordering::is_ge)
}
