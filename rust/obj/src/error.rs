// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for OBJ parsing and conversion
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing OBJ data
#[derive(Error, Debug)]
pub enum Error {
    /// A line starting with a known keyword does not match its grammar.
    #[error("Malformed OBJ data on line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("OBJ data is missing {0} data.")]
    MissingColumn(String),

    #[error("Face {face} references undefined vertex {vertex}.")]
    UnknownVertex { face: usize, vertex: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Table(#[from] polyframe_core::Error),
}
