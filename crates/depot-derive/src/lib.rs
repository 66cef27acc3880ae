use proc_macro::TokenStream;

mod entity;
mod tag;

/// Implement `depot::reflect::Reflect` for a struct with named fields.
///
/// Fields are annotated with `#[depot("name,pk|sk|omitempty|ttl|index:<kind>:pk|sk")]`
/// or `#[depot("-")]`; unannotated fields are stored under their own name.
#[proc_macro_derive(Entity, attributes(depot))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}
