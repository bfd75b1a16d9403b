//! Error types and result definitions shared by every csvjoin crate.
//!
//! All fallible operations return [`Result<T>`], whose error variant is the
//! unified [`Error`] enum. Errors propagate with `?` up to the binary, which
//! decides whether to print usage instructions alongside the message.
//!
//! # Error Categories
//!
//! - **Argument errors** ([`Error::InvalidArgumentError`]): unknown join type,
//!   unknown algorithm, malformed options
//! - **Path errors** ([`Error::FileNotFound`]): an input path that is not a regular file
//! - **Schema errors** ([`Error::ColumnNotFound`]): the join column is missing from a header
//! - **I/O errors** ([`Error::Io`]): failures while opening, reading or writing

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
