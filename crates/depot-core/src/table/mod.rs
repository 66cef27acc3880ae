#[cfg(test)]
mod tests;

use crate::{
    Error,
    backend::{Backend, QueryRequest},
    entity::{
        Property, conditions_with, entity_key, properties_into, properties_with, updates_with,
    },
    op::{QueryDirectives, QueryOp, UpdateOp},
    reflect::Entity,
};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::trace;

///
/// TableConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TableConfig {
    /// Store TTL fields as timestamps instead of epoch seconds.
    pub convert_ttl: bool,
    /// Limit applied to queries that supply none.
    pub default_limit: Option<usize>,
}

impl TableConfig {
    #[must_use]
    pub const fn with_convert_ttl(mut self, convert_ttl: bool) -> Self {
        self.convert_ttl = convert_ttl;
        self
    }

    #[must_use]
    pub const fn with_default_limit(mut self, limit: Option<usize>) -> Self {
        self.default_limit = limit;
        self
    }
}

///
/// Table
///
/// Typed CRUD and query over one backend table. Each call projects the
/// entity, forwards the request, and hydrates the result back into `E`.
///

pub struct Table<E, B> {
    backend: B,
    name: String,
    config: TableConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, B: Backend> Table<E, B> {
    #[must_use]
    pub fn new(backend: B, name: impl Into<String>) -> Self {
        Self {
            backend,
            name: name.into(),
            config: TableConfig::default(),
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Store `entity`, replacing any record under its key.
    pub fn put(&self, entity: &E) -> Result<E, Error> {
        trace!(table = %self.name, "put");

        let key = entity_key(entity)?;
        let properties = properties_with(entity, self.config.convert_ttl)?;
        self.backend.put(&self.name, &key, properties)?;

        Ok(entity.clone())
    }

    /// Load the record keyed by `entity`; stored values overwrite its fields.
    pub fn get(&self, entity: &E) -> Result<E, Error> {
        trace!(table = %self.name, "get");

        let key = entity_key(entity)?;
        let properties = self.backend.get(&self.name, &key)?;

        self.hydrate(entity.clone(), properties)
    }

    /// Remove the record keyed by `entity`, merging in the removed values
    /// when the backend returns them.
    pub fn delete(&self, entity: &E) -> Result<E, Error> {
        trace!(table = %self.name, "delete");

        let key = entity_key(entity)?;
        match self.backend.delete(&self.name, &key)? {
            Some(properties) => self.hydrate(entity.clone(), properties),
            None => Ok(entity.clone()),
        }
    }

    /// Store `entity` only if nothing exists under its key.
    pub fn create(&self, entity: &E) -> Result<E, Error> {
        trace!(table = %self.name, "create");

        let key = entity_key(entity)?;
        let properties = properties_with(entity, self.config.convert_ttl)?;
        self.backend.create(&self.name, &key, properties)?;

        Ok(entity.clone())
    }

    /// Update the existing record keyed by `entity` and return what was
    /// stored.
    pub fn update(&self, entity: &E, ops: &[UpdateOp]) -> Result<E, Error> {
        trace!(table = %self.name, ops = ops.len(), "update");

        let key = entity_key(entity)?;
        let updates = updates_with(entity, ops, self.config.convert_ttl)?;
        let properties = self.backend.update(&self.name, &key, updates)?;

        self.hydrate(entity.clone(), properties)
    }

    /// Query index `kind` (empty for the primary key) with the conditions
    /// `entity` and `ops` describe. Returns one page of results and the
    /// token of the next page.
    pub fn query(
        &self,
        kind: &str,
        entity: &E,
        ops: &[QueryOp],
    ) -> Result<(Vec<E>, Option<String>), Error> {
        trace!(table = %self.name, kind, ops = ops.len(), "query");

        let set = conditions_with(kind, entity, ops, self.config.convert_ttl)?;
        let mut directives = QueryDirectives::resolve(kind, ops, set.sort_field.as_deref())?;
        if directives.limit.is_none() {
            directives.limit = self.config.default_limit;
        }

        let request = QueryRequest {
            kind: kind.to_string(),
            sort_field: set.sort_field,
            conditions: set.conditions,
            directives,
        };
        let page = self.backend.query(&self.name, request)?;

        let items = page
            .items
            .into_iter()
            .map(|properties| self.hydrate(E::default(), properties))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, page.next))
    }

    fn hydrate(&self, mut entity: E, properties: Vec<Property>) -> Result<E, Error> {
        properties_into(properties, &mut entity, self.config.convert_ttl)?;

        Ok(entity)
    }
}
