use crate::{
    reflect::{FieldTag, Reflect},
    value::{Value, ValueTypeError},
};
use chrono::{DateTime, Utc};
use depot_derive::Entity;
use std::{any::TypeId, collections::BTreeMap};

///
/// Widget
///
/// Record exercising every annotation form: a composite primary key,
/// three secondary indexes, omitempty fields, a TTL and an excluded field.
///

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct Widget {
    #[depot("tenantId,pk,index:created:pk,index:named:pk,index:category:pk")]
    pub tenant_id: String,
    #[depot("id,sk")]
    pub id: String,
    #[depot("name,index:named:sk")]
    pub name: String,
    #[depot("category,omitempty,index:category:sk")]
    pub category: String,
    #[depot("desc,omitempty")]
    pub description: String,
    #[depot("count,omitempty")]
    pub count: i64,
    #[depot("total,omitempty")]
    pub total: i64,
    #[depot("refs,omitempty")]
    pub refs: Vec<String>,
    #[depot("preferences,omitempty")]
    pub preferences: BTreeMap<String, BTreeMap<String, bool>>,
    #[depot("ttl,ttl")]
    pub ttl: i64,
    #[depot("-")]
    pub exclude: String,
    #[depot("version")]
    pub version: i64,
    #[depot("status")]
    pub status: String,
    #[depot("expirationPartition,omitempty,index:expired:pk")]
    pub expiration_partition: String,
    #[depot("expiration,omitempty,index:expired:sk")]
    pub expiration: Option<DateTime<Utc>>,
    #[depot("createdAt,index:created:sk")]
    pub created_at: DateTime<Utc>,
    #[depot("updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Widget {
    pub fn keyed(tenant_id: &str, id: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            id: id.to_string(),
            ..Self::default()
        }
    }
}

///
/// Record
///
/// Record with no annotations at all.
///

#[derive(Clone, Debug, Default, Entity, PartialEq)]
pub struct Record {
    pub name: String,
}

///
/// Malformed
///
/// Hand-written `Reflect` carrying an index role with no mode.
///

#[derive(Clone, Debug, Default)]
pub struct Malformed {
    pub broken: String,
}

impl Reflect for Malformed {
    fn type_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn type_name(&self) -> &'static str {
        "Malformed"
    }

    fn field_tags(&self) -> Option<&'static [FieldTag]> {
        const TAGS: &[FieldTag] = &[FieldTag::new("broken", "broken,index:orphan")];

        Some(TAGS)
    }

    fn field_value(&self, index: usize) -> Option<Value> {
        (index == 0).then(|| Value::Text(self.broken.clone()))
    }

    fn set_field_value(&mut self, _index: usize, value: Value) -> Result<(), ValueTypeError> {
        Err(ValueTypeError::new("text", &value))
    }
}
