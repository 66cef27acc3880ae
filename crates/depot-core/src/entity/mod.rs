//! Storage-neutral projections of an entity.
//!
//! Extraction turns a reflected record into a key, properties, updates or
//! query conditions; hydration writes stored values back into a record.
//! Both are driven by the record's cached descriptor.

mod extract;
mod hydrate;


use crate::{
    op::{Condition, UpdateOp},
    value::Value,
};
use std::fmt;

// re-exports
pub use extract::{
    entity_conditions, entity_key, entity_map, entity_properties, entity_updates,
};
pub use hydrate::{entity_from_map, entity_from_properties, entity_from_property_map};

pub(crate) use extract::{conditions_with, properties_with, updates_with};
pub(crate) use hydrate::properties_into;

///
/// KeyPart
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyPart {
    pub name: String,
    pub value: Value,
}

impl KeyPart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.value.is_null()
    }
}

///
/// Key
///
/// Primary key of an entity. Records without a sort field have an empty
/// sort part.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key {
    pub partition: KeyPart,
    pub sort: KeyPart,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sort.value.is_null() {
            write!(f, "{}", self.partition.value)
        } else {
            write!(f, "{}:{}", self.partition.value, self.sort.value)
        }
    }
}

///
/// Property
///

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
    /// The backend must index this field.
    pub index: bool,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            index: false,
        }
    }
}

///
/// Update
///
/// One field of a conditional update. `value` is always the entity's raw
/// field value; a transform op is applied by the backend against the
/// stored value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub name: String,
    pub value: Value,
    pub op: Option<UpdateOp>,
    /// The backend must index this field.
    pub index: bool,
}

///
/// KeyType
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum KeyType {
    #[default]
    None,
    Partition,
    Sort,
}

///
/// EntityCondition
///

#[derive(Clone, Debug, PartialEq)]
pub struct EntityCondition {
    pub name: String,
    /// `Null` when a valueless op targets a zero field.
    pub value: Value,
    pub key_type: KeyType,
    pub op: Option<Condition>,
}

///
/// ConditionSet
///
/// Conditions of one query together with the field that sorts results
/// under the selected index.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionSet {
    pub sort_field: Option<String>,
    pub conditions: Vec<EntityCondition>,
}
