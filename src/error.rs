//! # Error Handling
//!
//! This module defines the centralized error type for `junit-merge`. It uses
//! the `thiserror` library to describe every failure the merge can run into,
//! with messages short enough to be printed on a single line.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes: missing paths, malformed
//!   reports, tree manipulation failures, and wrapped I/O and directory-walk
//!   errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library.
//!
//! All of these errors are fatal to a run. Invalid byte sequences in report
//! files are never reported here; they are repaired before parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for junit-merge operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more named source or target paths do not exist.
    #[error("no such file: {}", display_paths(paths))]
    NotFound { paths: Vec<PathBuf> },

    /// A non-empty report could not be parsed as XML.
    #[error("XML parsing error in {}: {message}", path.display())]
    XmlParse { path: PathBuf, message: String },

    /// The XML tree could not be manipulated or serialized.
    #[error("XML tree error: {message}")]
    Xml { message: String },

    /// A structural query could not be parsed.
    #[error("Invalid query `{query}`: {message}")]
    Query { query: String, message: String },

    /// A new test case had to be appended but the target has no suite.
    #[error("No testsuite element to append to in {}", path.display())]
    NoSuite { path: PathBuf },

    /// A source path could not be mapped onto the target tree.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<xot::Error> for Error {
    fn from(error: xot::Error) -> Self {
        Error::Xml {
            message: error.to_string(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
