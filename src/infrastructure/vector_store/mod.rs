//! Vector store implementations

mod in_memory;

pub use in_memory::{InMemoryVectorStore, InMemoryVectorStoreFactory};
