// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The geometry table: one ordered, column-oriented relation holding items,
//! faces, edges and vertices.
//!
//! Rows are granular to a single association, so a vertex appears once per
//! edge (and face) it participates in. Derived columns follow the naming
//! convention in [`crate::naming`]; for a derived column of level `C`, every
//! row sharing a `<C>_id` is expected to carry the same value. That
//! invariant is established by [`GeometryTable::map`] rather than checked
//! continuously.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::naming::{validate_column_name, ColumnAttributes, DEFAULT_COLUMNS};
use crate::types::DataType;
use crate::value::{Value, ValueKey};

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[inline]
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_null)
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Ordered, column-oriented geometry relation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryTable {
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: usize,
}

impl Default for GeometryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryTable {
    /// Creates an empty table holding only the default columns.
    pub fn new() -> Self {
        Self {
            columns: DEFAULT_COLUMNS
                .iter()
                .map(|name| Column::new(*name, Vec::new()))
                .collect(),
            rows: 0,
        }
    }

    /// Builds a table from named columns of equal length. Names are not
    /// validated here; call [`GeometryTable::validate`] for that.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut table = Self {
            columns: Vec::new(),
            rows: 0,
        };
        let mut seen = FxHashSet::default();

        for (index, (name, values)) in columns.into_iter().enumerate() {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateColumn(name));
            }
            if index == 0 {
                table.rows = values.len();
            } else if values.len() != table.rows {
                return Err(Error::LengthMismatch {
                    column: name,
                    expected: table.rows,
                    found: values.len(),
                });
            }
            table.columns.push(Column::new(name, values));
        }

        Ok(table)
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(Column::values)
    }

    /// Like [`GeometryTable::column`], failing when the column is absent.
    pub fn require_column(&self, name: &str) -> Result<&[Value]> {
        self.column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|values| values.get(row))
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Replaces the named column, or appends it when absent.
    ///
    /// Setting a column on a table with no rows sizes the table to the new
    /// column; the other columns are filled with missing values.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();

        if self.rows == 0 && !values.is_empty() {
            self.rows = values.len();
            for column in &mut self.columns {
                column.values = vec![Value::Null; self.rows];
            }
        } else if values.len() != self.rows {
            return Err(Error::LengthMismatch {
                column: name,
                expected: self.rows,
                found: values.len(),
            });
        }

        match self.position(&name) {
            Some(index) => self.columns[index].values = values,
            None => self.columns.push(Column::new(name, values)),
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<Value>> {
        let index = self.position(name)?;
        Some(self.columns.remove(index).into_values())
    }

    /// Appends a row given in column order.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::LengthMismatch {
                column: "<row>".to_string(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.values.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    /// New table with the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), indices.iter().map(|&i| c.values[i].clone()).collect()))
                .collect(),
            rows: indices.len(),
        }
    }

    /// Row order that sorts the table by the named columns, stable for ties.
    pub fn sorted_row_order(&self, by: &[&str]) -> Result<Vec<usize>> {
        let keys = by
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..self.rows).collect();
        order.sort_by(|&a, &b| {
            keys.iter()
                .map(|column| column[a].total_cmp(&column[b]))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(order)
    }

    /// Drops rows identical to an earlier row, keeping first occurrences.
    pub fn drop_duplicate_rows(self) -> Self {
        let mut seen = FxHashSet::default();
        let keep: Vec<usize> = (0..self.rows)
            .filter(|&row| {
                let key: Vec<Option<ValueKey>> =
                    self.columns.iter().map(|c| c.values[row].key()).collect();
                seen.insert(key)
            })
            .collect();

        if keep.len() == self.rows {
            return self;
        }
        self.take_rows(&keep)
    }

    // ------------------------------------------------------------------
    // Naming and validation
    // ------------------------------------------------------------------

    /// Decomposes a column name and reports whether the column (if present)
    /// holds missing values.
    pub fn column_attributes(&self, name: &str) -> Result<ColumnAttributes> {
        let mut attrs = ColumnAttributes::parse(name)?;
        attrs.has_missing = self
            .columns
            .iter()
            .find(|c| c.name == name)
            .map(Column::has_missing);
        Ok(attrs)
    }

    /// Checks every non-missing value of a column against the dtype its name
    /// declares. Does nothing on a table without rows.
    pub fn validate_column_values(&self, name: &str) -> Result<()> {
        if self.rows == 0 {
            return Ok(());
        }
        let dtype = validate_column_name(name)?.dtype;
        check_values(name, dtype, self.require_column(name)?)
    }

    /// Validates one column's name and values.
    pub fn validate_column(&self, name: &str) -> Result<()> {
        if !self.has_column(name) {
            return Err(Error::ColumnNotFound(name.to_string()));
        }
        validate_column_name(name)?;
        self.validate_column_values(name)
    }

    /// Validates every column in column order, stopping at the first
    /// invalid one.
    pub fn validate(&self) -> Result<()> {
        for column in &self.columns {
            self.validate_column(&column.name)?;
        }
        Ok(())
    }
}

/// Fails on the first value (in row order) that `dtype` rejects.
pub(crate) fn check_values(name: &str, dtype: DataType, values: &[Value]) -> Result<()> {
    match values.par_iter().find_first(|v| !dtype.is_valid_value(v)) {
        Some(bad) => Err(Error::Type(format!(
            "Non-{} value found in column {}: {}",
            dtype.fullname(),
            name,
            bad
        ))),
        None => Ok(()),
    }
}
