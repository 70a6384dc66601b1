//! Common utilities and shared types for chirp.
//!
//! This crate provides foundational components used across all chirp crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Tokens**: HS256 access tokens via [`JwtCodec`]
//! - **Storage**: File storage backends for tweet images
//!
//! # Example
//!
//! ```no_run
//! use chirp_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     assert!(IdGenerator::is_valid(&id));
//!     println!("{} listening on {}", id, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod jwt;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use jwt::{Claims, JwtCodec};
pub use storage::{
    LocalStorage, StorageBackend, UploadedFile, generate_storage_key, is_image_content_type,
};
