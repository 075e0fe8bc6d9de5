//! spawngrid Server
//!
//! HTTP front end for the spawngrid bucket cache.
//!
//! # Example
//!
//! ```ignore
//! use spawngrid_server::{Handler, StatusPolicy, run_server};
//!
//! let handler = Handler::new(Arc::new(cache), StatusPolicy::Strict);
//! run_server(listener, handler, shutdown).await?;
//! ```

pub mod handler;
pub mod protocol;
pub mod transport;

pub use handler::Handler;
pub use protocol::{ErrorBody, Health, StatusPolicy};

// Re-export default transport for convenience
pub use transport::http::{router, run_server};
