// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for file operators
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by file operators and their validators
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter or input file failed validation.
    #[error("{0}")]
    Validation(String),

    #[error("Table error: {0}")]
    Table(#[from] polyframe_core::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] polyframe_obj::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
