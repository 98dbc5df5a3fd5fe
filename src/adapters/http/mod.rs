//! HTTP adapters - Implementations of the HttpTransport port.
//!
//! - **ReqwestTransport** - Talks to the real backend
//! - **MockTransport** - Scripted replies for tests

mod mock_transport;
mod reqwest_transport;

pub use mock_transport::{MockReply, MockTransport};
pub use reqwest_transport::ReqwestTransport;
