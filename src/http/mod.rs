//! HTTP server module.
//!
//! Binds the configured address, serves the router over plain HTTP/1.1 and
//! drains in-flight requests on SIGTERM/SIGINT before returning.

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
pub use shutdown::shutdown_signal;
