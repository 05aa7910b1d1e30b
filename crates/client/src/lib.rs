//! File operations over the filedock event channel.
//!
//! A [`Session`] is obtained by authenticating a connected channel and
//! exposes the five file operations: upload, download, list, view, delete.
//! Each operation binds its response listeners before sending its request
//! and interprets the peer's status vocabulary into typed results.

mod download;
mod error;
mod ops;
mod session;
mod upload;

pub use error::ClientError;
pub use session::Session;
pub use upload::UploadOutcome;
