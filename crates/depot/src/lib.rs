//! ## Crate layout
//! - `value`: the storage-neutral `Value` model and its numeric algebra.
//! - `model`: field annotations and the cached struct descriptors.
//! - `op`: update and query operations.
//! - `entity`: key, property, update and condition projections.
//! - `backend`: the storage backend contract and the in-memory backend.
//! - `table`: the typed table facade.
//!
//! `#[derive(Entity)]` implements `reflect::Reflect` for named structs; the
//! `prelude` brings in everything needed to declare one and query it.

pub use depot_core::*;
pub use depot_derive::Entity;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use depot_core::prelude::*;
    pub use depot_derive::Entity;
}
