//! Service layer for the booking backend.
//! - Boundaries to the document store, object store and identity verifier.
//! - Generic `Repository<T>` over the document store, bound per record type.
//! - `ImageManager` for image uploads kept in the object store.

pub mod errors;
pub mod identity;
pub mod images;
pub mod objects;
pub mod repository;
pub mod resources;
pub mod storage;
pub mod store;
