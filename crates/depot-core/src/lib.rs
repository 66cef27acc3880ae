//! Core runtime for Depot: value model, struct descriptors, the operation
//! algebra, entity projection, the backend contract and the typed table
//! facade, with the ergonomics exported via the `prelude`.

extern crate self as depot;

// public exports are one module level down
pub mod backend;
pub mod entity;
pub mod error;
pub mod model;
pub mod op;
pub mod reflect;
pub mod table;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

// re-exports
pub use error::Error;

///
/// Prelude
///
/// Vocabulary needed to declare entities and call a table.
///

pub mod prelude {
    pub use crate::{
        Error,
        backend::{Backend, MemoryBackend},
        op::{
            add, asc, contains, desc, equal, exists, force, greater_than, greater_than_or_equal,
            in_, less_than, less_than_or_equal, limit, not_equal, not_exists, not_in, page,
            prefix, subtract,
        },
        reflect::{Entity, Reflect},
        table::{Table, TableConfig},
        value::Value,
    };
}
