//! Infrastructure layer - Concrete store, cache and logging implementations

pub mod logging;
pub mod semantic_cache;
pub mod vector_store;
