//! Storage backend contract.
//!
//! A backend receives fully projected requests (keys, properties, updates
//! and conditions) and never sees typed entities. Native failures are
//! translated into [`Error`] before they leave the backend.

mod memory;


use crate::{
    Error,
    entity::{EntityCondition, Key, Property, Update},
    op::QueryDirectives,
};
use std::sync::Arc;

// re-exports
pub use memory::MemoryBackend;

///
/// QueryRequest
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryRequest {
    /// Secondary index name; empty for the primary key.
    pub kind: String,
    pub sort_field: Option<String>,
    pub conditions: Vec<EntityCondition>,
    pub directives: QueryDirectives,
}

///
/// QueryPage
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPage {
    pub items: Vec<Vec<Property>>,
    /// Continuation token; `None` on the last page.
    pub next: Option<String>,
}

///
/// Backend
///

pub trait Backend {
    fn get(&self, table: &str, key: &Key) -> Result<Vec<Property>, Error>;

    fn put(&self, table: &str, key: &Key, properties: Vec<Property>) -> Result<(), Error>;

    /// Insert only when no record exists under `key`.
    fn create(&self, table: &str, key: &Key, properties: Vec<Property>) -> Result<(), Error>;

    /// Remove the record, returning it when the backend can.
    fn delete(&self, table: &str, key: &Key) -> Result<Option<Vec<Property>>, Error>;

    /// Apply `updates` to an existing record and return the stored result.
    fn update(&self, table: &str, key: &Key, updates: Vec<Update>) -> Result<Vec<Property>, Error>;

    fn query(&self, table: &str, request: QueryRequest) -> Result<QueryPage, Error>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn get(&self, table: &str, key: &Key) -> Result<Vec<Property>, Error> {
        (**self).get(table, key)
    }

    fn put(&self, table: &str, key: &Key, properties: Vec<Property>) -> Result<(), Error> {
        (**self).put(table, key, properties)
    }

    fn create(&self, table: &str, key: &Key, properties: Vec<Property>) -> Result<(), Error> {
        (**self).create(table, key, properties)
    }

    fn delete(&self, table: &str, key: &Key) -> Result<Option<Vec<Property>>, Error> {
        (**self).delete(table, key)
    }

    fn update(&self, table: &str, key: &Key, updates: Vec<Update>) -> Result<Vec<Property>, Error> {
        (**self).update(table, key, updates)
    }

    fn query(&self, table: &str, request: QueryRequest) -> Result<QueryPage, Error> {
        (**self).query(table, request)
    }
}
