//! Backend-independent update and query operations.
//!
//! Every operation names the field it addresses (directives address none),
//! so accessors and backends can look operations up by storage name.

mod directive;


use crate::value::{
    Value, values_equal, values_greater_than, values_greater_than_or_equal, values_less_than,
    values_less_than_or_equal, values_not_equal,
};

// re-exports
pub use directive::{Direction, Directive, QueryDirectives};

///
/// UpdateKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UpdateKind {
    /// Combine the delta with the stored value.
    Add,
    Subtract,
    /// Write the field even when its value is zero.
    Force,
}

///
/// UpdateOp
///
/// Modifier attached to one field of an update. Fields without an op are
/// plain assignments.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateOp {
    pub field: String,
    pub kind: UpdateKind,
}

impl UpdateOp {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: UpdateKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    #[must_use]
    pub const fn is_transform(&self) -> bool {
        matches!(self.kind, UpdateKind::Add | UpdateKind::Subtract)
    }
}

///
/// CompareOp
///

#[derive(Clone, Debug, PartialEq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Exists,
    NotExists,
    /// Stored text starts with the entity's text.
    Prefix,
    /// Stored text contains the entity's text, or a stored list holds an
    /// element equal to the entity's value.
    Contains,
    In(Vec<Value>),
    NotIn(Vec<Value>),
}

impl CompareOp {
    /// Whether the operator carries its operands itself, so the entity's
    /// field value is not needed.
    #[must_use]
    pub const fn is_valueless(&self) -> bool {
        matches!(
            self,
            Self::Exists | Self::NotExists | Self::In(_) | Self::NotIn(_)
        )
    }

    /// Evaluate against a stored value (`None` when the field is absent)
    /// and the entity's field value.
    #[must_use]
    pub fn matches(&self, stored: Option<&Value>, expected: &Value) -> bool {
        let stored = stored.unwrap_or(&Value::Null);

        match self {
            Self::Equal => values_equal(stored, expected),
            Self::NotEqual => values_not_equal(stored, expected),
            Self::LessThan => values_less_than(stored, expected),
            Self::LessThanOrEqual => values_less_than_or_equal(stored, expected),
            Self::GreaterThan => values_greater_than(stored, expected),
            Self::GreaterThanOrEqual => values_greater_than_or_equal(stored, expected),
            Self::Exists => !stored.is_null(),
            Self::NotExists => stored.is_null(),
            Self::Prefix => stored
                .as_text()
                .zip(expected.as_text())
                .is_some_and(|(stored, prefix)| stored.starts_with(prefix)),
            Self::Contains => match stored {
                Value::Text(text) => expected.as_text().is_some_and(|part| text.contains(part)),
                Value::List(items) => items.iter().any(|item| values_equal(item, expected)),
                _ => false,
            },
            Self::In(values) => values.iter().any(|v| values_equal(stored, v)),
            Self::NotIn(values) => !values.iter().any(|v| values_equal(stored, v)),
        }
    }
}

///
/// Condition
///

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
}

impl Condition {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    #[must_use]
    pub const fn is_valueless(&self) -> bool {
        self.op.is_valueless()
    }
}

///
/// QueryOp
///

#[derive(Clone, Debug, PartialEq)]
pub enum QueryOp {
    Condition(Condition),
    Directive(Directive),
}

impl QueryOp {
    /// Target field; directives have none.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Condition(condition) => Some(&condition.field),
            Self::Directive(_) => None,
        }
    }

    #[must_use]
    pub const fn as_condition(&self) -> Option<&Condition> {
        match self {
            Self::Condition(condition) => Some(condition),
            Self::Directive(_) => None,
        }
    }

    #[must_use]
    pub const fn as_directive(&self) -> Option<&Directive> {
        match self {
            Self::Condition(_) => None,
            Self::Directive(directive) => Some(directive),
        }
    }
}

impl From<Condition> for QueryOp {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl From<Directive> for QueryOp {
    fn from(directive: Directive) -> Self {
        Self::Directive(directive)
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// First update op addressing `field`.
#[must_use]
pub fn find_update_op<'a>(ops: &'a [UpdateOp], field: &str) -> Option<&'a UpdateOp> {
    ops.iter().find(|op| op.field == field)
}

/// First condition addressing `field`.
#[must_use]
pub fn find_condition<'a>(ops: &'a [QueryOp], field: &str) -> Option<&'a Condition> {
    ops.iter()
        .filter_map(QueryOp::as_condition)
        .find(|condition| condition.field == field)
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

#[must_use]
pub fn add(field: impl Into<String>) -> UpdateOp {
    UpdateOp::new(field, UpdateKind::Add)
}

#[must_use]
pub fn subtract(field: impl Into<String>) -> UpdateOp {
    UpdateOp::new(field, UpdateKind::Subtract)
}

#[must_use]
pub fn force(field: impl Into<String>) -> UpdateOp {
    UpdateOp::new(field, UpdateKind::Force)
}

#[must_use]
pub fn equal(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::Equal).into()
}

#[must_use]
pub fn not_equal(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::NotEqual).into()
}

#[must_use]
pub fn less_than(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::LessThan).into()
}

#[must_use]
pub fn less_than_or_equal(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::LessThanOrEqual).into()
}

#[must_use]
pub fn greater_than(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::GreaterThan).into()
}

#[must_use]
pub fn greater_than_or_equal(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::GreaterThanOrEqual).into()
}

#[must_use]
pub fn exists(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::Exists).into()
}

#[must_use]
pub fn not_exists(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::NotExists).into()
}

#[must_use]
pub fn prefix(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::Prefix).into()
}

#[must_use]
pub fn contains(field: impl Into<String>) -> QueryOp {
    Condition::new(field, CompareOp::Contains).into()
}

#[must_use]
pub fn in_<V: Into<Value>>(
    field: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> QueryOp {
    let values = values.into_iter().map(Into::into).collect();

    Condition::new(field, CompareOp::In(values)).into()
}

#[must_use]
pub fn not_in<V: Into<Value>>(
    field: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> QueryOp {
    let values = values.into_iter().map(Into::into).collect();

    Condition::new(field, CompareOp::NotIn(values)).into()
}

#[must_use]
pub const fn asc() -> QueryOp {
    QueryOp::Directive(Directive::Asc)
}

#[must_use]
pub const fn desc() -> QueryOp {
    QueryOp::Directive(Directive::Desc)
}

#[must_use]
pub const fn limit(n: usize) -> QueryOp {
    QueryOp::Directive(Directive::Limit(n))
}

#[must_use]
pub fn page(token: impl Into<String>) -> QueryOp {
    QueryOp::Directive(Directive::Page(token.into()))
}
