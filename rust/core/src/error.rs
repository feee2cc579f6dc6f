// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry table operations.

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by naming, typing and structural checks on a table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A column name does not decompose into `<ctype>_<dtype>_<descriptor>`,
    /// or an indicator is not a member of its registry.
    #[error("{0}")]
    Naming(String),

    /// A value violates its column's dtype, cannot be coerced to it, or a
    /// grouping id column contains missing values.
    #[error("{0}")]
    Type(String),

    /// The named column is not present in the table.
    #[error("{0} not found in columns.")]
    ColumnNotFound(String),

    /// A column's length does not match the table's row count.
    #[error("column {column} has {found} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A column name appears more than once.
    #[error("column {0} already exists")]
    DuplicateColumn(String),
}
