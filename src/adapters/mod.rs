//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the client to external systems:
//! - `storage` - Persisted session record (file, in-memory)
//! - `http` - Backend transport (reqwest, mock)

pub mod http;
pub mod storage;

pub use http::{MockReply, MockTransport, ReqwestTransport};
pub use storage::{FileSessionStorage, InMemorySessionStorage};
