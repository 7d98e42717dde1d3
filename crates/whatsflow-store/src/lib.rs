//! Playground state persistence.
//!
//! Two pieces: a SQLite-backed key/value store for editor state that
//! outlives the process, and an in-memory LRU/TTL cache the server uses for
//! per-thread drafting state.

pub mod cache;
pub mod error;
pub mod store;
pub mod ttl;

pub use cache::{CacheConfig, SessionCache, ThreadState};
pub use error::{Result, StoreError};
pub use store::{KEY_FLOW_DATA, KEY_FLOW_ID, KEY_THREAD_ID, PlaygroundStore};
