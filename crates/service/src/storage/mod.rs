//! Storage helpers shared by the file-backed adapters.

pub mod json_map_store;
