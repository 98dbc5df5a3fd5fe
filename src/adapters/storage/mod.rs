//! Storage Adapters
//!
//! Implementations of the SessionStorage port.
//!
//! ## Available Adapters
//!
//! - **FileSessionStorage** - One JSON document on disk, replaced atomically
//! - **InMemorySessionStorage** - Keeps the record in memory (testing/ephemeral runs)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionStorage, InMemorySessionStorage};
//!
//! // CLI: survives between invocations
//! let storage = FileSessionStorage::new("~/.medbook");
//!
//! // Testing: in-memory storage
//! let storage = InMemorySessionStorage::new();
//! ```

mod file_session_storage;
mod in_memory_session_storage;
mod record;

pub use file_session_storage::FileSessionStorage;
pub use in_memory_session_storage::InMemorySessionStorage;
