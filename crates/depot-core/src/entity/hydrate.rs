use crate::{
    Error,
    entity::Property,
    model::{Field, FieldMode, describe},
    reflect::Reflect,
    value::Value,
};
use std::collections::BTreeMap;

// Timestamps on TTL fields go back to epoch seconds.
fn ttl_from_storage(field: &Field, value: Value, convert_ttl: bool) -> Value {
    match value {
        Value::Timestamp(at) if convert_ttl && field.ttl => Value::Int64(at.timestamp()),
        other => other,
    }
}

/// Write the values of `map` into `entity`, matching by storage name.
///
/// Fields whose name is absent from the map keep their current value.
/// Excluded fields are never written.
pub fn entity_from_map(
    mut map: BTreeMap<String, Value>,
    entity: &mut dyn Reflect,
    convert_ttl: bool,
) -> Result<(), Error> {
    let descriptor = describe(entity)?;

    for (i, field) in descriptor.iter().enumerate() {
        if field.mode == FieldMode::Exclude {
            continue;
        }
        let Some(value) = map.remove(&field.name) else {
            continue;
        };

        let value = ttl_from_storage(field, value, convert_ttl);
        entity
            .set_field_value(i, value)
            .map_err(|err| Error::InvalidFieldValue {
                field: field.name.clone(),
                expected: err.expected,
                found: err.found,
            })?;
    }

    Ok(())
}

/// Write a property list back into `entity`. A later property with the
/// same name replaces an earlier one.
pub fn entity_from_properties(
    props: Vec<Property>,
    entity: &mut dyn Reflect,
) -> Result<(), Error> {
    properties_into(props, entity, false)
}

/// Write a name-keyed property map back into `entity`.
pub fn entity_from_property_map(
    props: BTreeMap<String, Property>,
    entity: &mut dyn Reflect,
) -> Result<(), Error> {
    let map = props
        .into_iter()
        .map(|(name, property)| (name, property.value))
        .collect();

    entity_from_map(map, entity, false)
}

pub(crate) fn properties_into(
    props: Vec<Property>,
    entity: &mut dyn Reflect,
    convert_ttl: bool,
) -> Result<(), Error> {
    let map = props
        .into_iter()
        .map(|property| (property.name, property.value))
        .collect();

    entity_from_map(map, entity, convert_ttl)
}
