//! anyfile: one file type for every place bytes come from.
//!
//! # Overview
//!
//! This crate provides the [`File`] struct, a single type that can represent
//! files from multiple sources:
//!
//! - **URLs**: HTTP/HTTPS resources
//! - **Local filesystem**: Paths on disk
//! - **Bytes**: In-memory byte buffers
//! - **Streams**: Async byte streams
//! - **Amazon S3**: Objects in S3 buckets (or any [`ObjectStorage`])
//!
//! Whatever the source, the file's [`Metadata`] is derived the same way by
//! [`resolver::resolve`]: caller hints, transport headers, filesystem stat
//! and magic-byte sniffing are merged under one fixed precedence order.
//!
//! # Examples
//!
//! ```no_run
//! # use anyfile::File;
//! # use bytes::Bytes;
//! # async fn example() -> anyfile::error::Result<()> {
//! let file = File::from_bytes(Bytes::from("hello world"), None).await?;
//! let text = file.read_text().await?;
//! assert_eq!(text, "hello world");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content_disposition;
pub mod detection;
pub mod error;
pub mod file;
pub mod metadata;
pub mod resolver;
pub mod source;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use crate::config::ClientConfig;
pub use crate::error::{ErrorKind, FileError};
pub use crate::file::File;
pub use crate::metadata::{Metadata, MetadataHint};
pub use crate::source::{FileSource, S3Location};
pub use crate::storage::{ObjectResponse, ObjectStorage, PutOptions, S3Storage};

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
