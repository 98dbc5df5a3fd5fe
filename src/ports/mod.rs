//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStorage` - Persisted session record (token + user)
//! - `HttpTransport` - Raw request/response exchange with the backend

mod http_transport;
mod session_storage;

pub use http_transport::{ApiRequest, ApiResponse, HttpTransport, TransportError};
pub use session_storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};
