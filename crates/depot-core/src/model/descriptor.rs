use crate::{
    Error,
    model::field::{Field, parse_tag},
    reflect::Reflect,
};
use derive_more::Deref;
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};
use tracing::{debug, warn};

///
/// StructDescriptor
///
/// Parsed storage metadata of one record type, one `Field` per declared
/// struct field in declaration order. Shared and immutable once published.
///

#[derive(Debug, Deref)]
pub struct StructDescriptor {
    pub type_name: &'static str,
    #[deref]
    pub fields: Vec<Field>,
}

impl StructDescriptor {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }
}

type DescriptorMap = HashMap<TypeId, Arc<StructDescriptor>>;

fn cache() -> &'static RwLock<DescriptorMap> {
    static CACHE: OnceLock<RwLock<DescriptorMap>> = OnceLock::new();

    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Return the descriptor of `entity`'s record type, parsing it on first use.
///
/// Every caller receives the same shared allocation for a given type.
///
/// # Panics
///
/// Panics when a field annotation is malformed. The derive rejects such
/// annotations at compile time, so only hand-written `Reflect` impls can
/// reach this.
pub fn describe(entity: &dyn Reflect) -> Result<Arc<StructDescriptor>, Error> {
    let type_name = entity.type_name();
    let Some(tags) = entity.field_tags() else {
        return Err(Error::InvalidEntityType { type_name });
    };

    let key = entity.type_key();
    if let Some(found) = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(found));
    }

    // parse outside the lock; a racing thread may publish first
    let fields = tags
        .iter()
        .map(|tag| parse_tag(tag.ident, tag.tag))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|err| {
            warn!(type_name, error = %err, "malformed field annotation");
            panic!("depot: {type_name}: {err}");
        });

    debug!(type_name, fields = fields.len(), "descriptor cache miss");

    let descriptor = Arc::new(StructDescriptor { type_name, fields });
    let mut map = cache().write().unwrap_or_else(PoisonError::into_inner);

    Ok(Arc::clone(map.entry(key).or_insert(descriptor)))
}
