// Document store abstraction for the social text pipeline.
//
// The pipeline treats persistence as an opaque document store with
// upsert/insert/find/count operations over JSON documents. A real
// deployment would implement `DocumentStore` against MongoDB or a
// comparable backend; `MemoryStore` is the in-tree implementation used
// by the orchestrator and the test suites.

pub mod config;
pub mod error;
pub mod memory;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::DocumentStore;
