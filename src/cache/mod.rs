//! Content-addressed review cache
//!
//! Reviews are stored in a shared key-value store under keys derived from
//! content fingerprints. Entries are write-once: changed content yields a
//! new fingerprint and therefore a new key, so nothing is ever invalidated.
//!
//! # Key Layout
//!
//! | Namespace | Key | Value |
//! |-----------|-----|-------|
//! | File | `file_<name>:<fingerprint>` | Raw assessment text |
//! | Repository | `repo_<identity>` | Serialized review JSON |
//!
//! # Concurrency
//!
//! No locks are taken. Two requests racing on the same missing key may both
//! compute and both write; the last write wins and the values are equivalent.

pub mod key;
pub mod memory;
pub mod redis;
pub mod store;

pub use key::CacheKey;
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use store::{connect, persist, CacheStore};
