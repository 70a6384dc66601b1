//! HTTP API layer for chirp.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: tweets, likes, bookmarks, follows and comments
//! - **Extractors**: authentication, and JSON/query/path parsing that fails in the error envelope
//! - **Middleware**: access token resolution
//!
//! Built on Axum 0.8. The server nests [`router`] under `/api/v1`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
