// GitHub API module.
// Records, codec, graph query, transport and endpoint definitions.

pub mod client;
pub mod codec;
pub mod endpoints;
pub mod graph;
pub mod requests;
pub mod transport;
pub mod types;

pub use client::HttpTransport;
pub use requests::*;
pub use transport::{ApiRequest, Endpoint, Method, Transport};
pub use types::*;
