//! Core business logic for chirp.

pub mod pagination;
pub mod services;

pub use pagination::{Page, PageRequest, Paged};
pub use services::*;
