//! Vector store domain models and traits
//!
//! Records are (content, embedding, metadata) triples kept in insertion
//! order. Searches are exhaustive scans; there is no index.

mod record;
mod search;
mod store;

pub use record::{Document, DocumentFilter, Metadata, ScoredDocument, VectorRecord};
pub use search::{maximal_marginal_relevance, rank_by_similarity};
pub use store::{MetadataFn, VectorStore, VectorStoreFactory};
