// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File operators with configurable validation.
//!
//! Every operator runs its parameter checks and then validates the table it
//! reads or writes, as far as [`Config::validate`] asks.

use polyframe_core::GeometryTable;
use std::path::Path;

use crate::columnar;
use crate::config::Config;
use crate::error::Result;
use crate::json;
use crate::sequence;
use crate::validators::{
    dispatch, file_exists, has_extension, is_file_sequence_directory, is_records_json,
    is_valid_column_infix, ParameterCheck,
};

/// Reads and writes tables in the supported file formats.
#[derive(Debug, Clone, Default)]
pub struct Operators {
    config: Config,
}

impl Operators {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn check(
        &self,
        operator: &str,
        path: &Path,
        parameters: &[ParameterCheck<'_>],
        data: Option<&GeometryTable>,
    ) -> Result<()> {
        tracing::debug!(
            operator,
            path = %path.display(),
            validate = %self.config.validate,
            "Operator called"
        );
        dispatch(self.config.validate, parameters, data)
    }

    /// Validates a table that was just read, if data validation is on.
    fn checked(&self, table: GeometryTable) -> Result<GeometryTable> {
        dispatch(self.config.validate, &[], Some(&table))?;
        Ok(table)
    }

    /// Reads an OBJ file. Adds `v_i_draw_order`, which keeps the vertex order
    /// of every face.
    pub fn read_obj(&self, path: impl AsRef<Path>) -> Result<GeometryTable> {
        let path = path.as_ref();
        self.check(
            "read_obj",
            path,
            &[
                Box::new(|| has_extension(path, "obj")),
                Box::new(|| file_exists(path)),
            ],
            None,
        )?;
        self.checked(polyframe_obj::read_file(path)?)
    }

    /// Writes vertices and faces to an OBJ file.
    pub fn write_obj(&self, table: &GeometryTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.check(
            "write_obj",
            path,
            &[Box::new(|| has_extension(path, "obj"))],
            Some(table),
        )?;
        polyframe_obj::write_file(table, path, &self.config.export_options())?;
        Ok(())
    }

    /// Reads a JSON file in records format.
    pub fn read_json(&self, path: impl AsRef<Path>) -> Result<GeometryTable> {
        let path = path.as_ref();
        self.check(
            "read_json",
            path,
            &[
                Box::new(|| has_extension(path, "json")),
                Box::new(|| file_exists(path)),
                Box::new(|| is_records_json(path)),
            ],
            None,
        )?;
        self.checked(json::read_json(path)?)
    }

    /// Writes a table as JSON records.
    pub fn write_json(&self, table: &GeometryTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.check(
            "write_json",
            path,
            &[Box::new(|| has_extension(path, "json"))],
            Some(table),
        )?;
        json::write_json(table, path)?;
        tracing::info!(path = %path.display(), "JSON data written");
        Ok(())
    }

    /// Reads a table persisted with [`Operators::write_table`].
    pub fn read_table(&self, path: impl AsRef<Path>) -> Result<GeometryTable> {
        let path = path.as_ref();
        self.check(
            "read_table",
            path,
            &[
                Box::new(|| has_extension(path, columnar::EXTENSION)),
                Box::new(|| file_exists(path)),
            ],
            None,
        )?;
        self.checked(columnar::read_table(path)?)
    }

    /// Persists the whole table in the columnar binary format.
    pub fn write_table(&self, table: &GeometryTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.check(
            "write_table",
            path,
            &[Box::new(|| has_extension(path, columnar::EXTENSION))],
            Some(table),
        )?;
        columnar::write_table(table, path)?;
        tracing::info!(path = %path.display(), "Table written");
        Ok(())
    }

    /// One row per file of a numbered file sequence. See
    /// [`sequence::from_file_sequence`].
    pub fn from_file_sequence(
        &self,
        directory: impl AsRef<Path>,
        infix: &str,
    ) -> Result<GeometryTable> {
        let directory = directory.as_ref();
        self.check(
            "from_file_sequence",
            directory,
            &[
                Box::new(|| is_file_sequence_directory(directory)),
                Box::new(|| is_valid_column_infix(infix)),
            ],
            None,
        )?;
        self.checked(sequence::from_file_sequence(directory, infix)?)
    }
}
