use crate::{
    Error,
    entity::{ConditionSet, EntityCondition, Key, KeyPart, KeyType, Property, Update},
    model::{Field, FieldMode, StructDescriptor, describe},
    op::{QueryOp, UpdateKind, UpdateOp, find_condition, find_update_op},
    reflect::Reflect,
    value::{Numeric, Value},
};
use chrono::DateTime;
use std::collections::BTreeMap;

// Walk descriptor fields alongside their current values.
fn fields<'a>(
    descriptor: &'a StructDescriptor,
    entity: &'a dyn Reflect,
) -> impl Iterator<Item = (&'a Field, Value)> + 'a {
    descriptor
        .iter()
        .enumerate()
        .map(move |(i, field)| (field, entity.field_value(i).unwrap_or_default()))
}

// Epoch seconds become a timestamp; anything else passes through.
fn ttl_to_storage(field: &Field, value: Value, convert_ttl: bool) -> Value {
    if !(convert_ttl && field.ttl) {
        return value;
    }

    i64::coerce(&value)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or(value, Value::Timestamp)
}

fn included(field: &Field, value: &Value) -> bool {
    match field.mode {
        FieldMode::Exclude => false,
        FieldMode::OmitEmpty => !value.is_zero(),
        _ => true,
    }
}

/// Primary key of `entity`.
pub fn entity_key(entity: &dyn Reflect) -> Result<Key, Error> {
    let descriptor = describe(entity)?;
    let mut key = Key::default();

    for (field, value) in fields(&descriptor, entity) {
        let part = KeyPart {
            name: field.name.clone(),
            value,
        };

        match field.mode {
            FieldMode::Partition => key.partition = part,
            FieldMode::Sort => key.sort = part,
            _ => {}
        }
    }

    Ok(key)
}

/// Properties to store for `entity`: every field except excluded ones and
/// empty `omitempty` ones.
pub fn entity_properties(entity: &dyn Reflect) -> Result<Vec<Property>, Error> {
    properties_with(entity, false)
}

pub(crate) fn properties_with(
    entity: &dyn Reflect,
    convert_ttl: bool,
) -> Result<Vec<Property>, Error> {
    let descriptor = describe(entity)?;

    let properties = fields(&descriptor, entity)
        .filter(|(field, value)| included(field, value))
        .map(|(field, value)| Property {
            name: field.name.clone(),
            value: ttl_to_storage(field, value, convert_ttl),
            index: field.needs_index(),
        })
        .collect();

    Ok(properties)
}

/// Property map of `entity`, keyed by storage name.
pub fn entity_map(
    entity: &dyn Reflect,
    convert_ttl: bool,
) -> Result<BTreeMap<String, Value>, Error> {
    let map = properties_with(entity, convert_ttl)?
        .into_iter()
        .map(|property| (property.name, property.value))
        .collect();

    Ok(map)
}

/// Updates to apply for `entity`.
///
/// Key and excluded fields never update. Zero fields are skipped unless a
/// `force` op names them.
pub fn entity_updates(entity: &dyn Reflect, ops: &[UpdateOp]) -> Result<Vec<Update>, Error> {
    updates_with(entity, ops, false)
}

pub(crate) fn updates_with(
    entity: &dyn Reflect,
    ops: &[UpdateOp],
    convert_ttl: bool,
) -> Result<Vec<Update>, Error> {
    let descriptor = describe(entity)?;
    let mut updates = Vec::new();

    for (field, value) in fields(&descriptor, entity) {
        if matches!(
            field.mode,
            FieldMode::Exclude | FieldMode::Partition | FieldMode::Sort
        ) {
            continue;
        }

        let forced = ops
            .iter()
            .any(|op| op.field == field.name && op.kind == UpdateKind::Force);
        if value.is_zero() && !forced {
            continue;
        }

        updates.push(Update {
            name: field.name.clone(),
            value: ttl_to_storage(field, value, convert_ttl),
            op: find_update_op(ops, &field.name).cloned(),
            index: field.needs_index(),
        });
    }

    Ok(updates)
}

/// Conditions of a query on index `kind` (empty for the primary key).
///
/// Each field takes the role its `kind` override gives it, or its default
/// mode. Zero fields are skipped unless a valueless op names them.
pub fn entity_conditions(
    kind: &str,
    entity: &dyn Reflect,
    ops: &[QueryOp],
) -> Result<ConditionSet, Error> {
    conditions_with(kind, entity, ops, false)
}

pub(crate) fn conditions_with(
    kind: &str,
    entity: &dyn Reflect,
    ops: &[QueryOp],
    convert_ttl: bool,
) -> Result<ConditionSet, Error> {
    let descriptor = describe(entity)?;
    let mut set = ConditionSet::default();

    for (field, value) in fields(&descriptor, entity) {
        let key_type = match field.mode_for(kind) {
            FieldMode::Exclude => continue,
            FieldMode::Partition => KeyType::Partition,
            FieldMode::Sort => {
                set.sort_field = Some(field.name.clone());
                KeyType::Sort
            }
            FieldMode::OmitEmpty | FieldMode::Include => KeyType::None,
        };

        let op = find_condition(ops, &field.name);
        let value = if !value.is_zero() {
            ttl_to_storage(field, value, convert_ttl)
        } else if op.is_some_and(|op| op.is_valueless()) {
            Value::Null
        } else {
            continue;
        };

        set.conditions.push(EntityCondition {
            name: field.name.clone(),
            value,
            key_type,
            op: op.cloned(),
        });
    }

    Ok(set)
}
