//! HTTP binding subsystem.
//!
//! # Data Flow
//! ```text
//! RouteNode (method + path + endpoint)
//!     → server.rs (AxumLoader: validate path, bind handler)
//!     → response.rs (endpoint document → fixed response)
//!     → AxumServer::into_router → axum::serve
//! ```

pub mod response;
pub mod server;

pub use response::EndpointResponse;
pub use server::{http_path, serve, AxumLoader, AxumServer};
