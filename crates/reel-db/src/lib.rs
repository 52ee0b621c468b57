//! Sqlite-backed metadata store.
//!
//! The ingestion pipeline treats this as an external collaborator: it
//! fetches a record, checks ownership, and writes the locator back.

pub mod error;
pub mod repo;

pub use error::{DbError, DbResult};
pub use repo::VideoRepository;
