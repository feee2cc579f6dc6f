// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column naming convention: `<ctype>_<dtype>_<descriptor>`.
//!
//! The seven default columns are exempt; their dtype is implied (`*_id` are
//! integers, `v_x`/`v_y`/`v_z` are floats).

use crate::error::{Error, Result};
use crate::types::{ComponentType, DataType};

/// Columns every table starts with, in order.
pub const DEFAULT_COLUMNS: [&str; 7] = ["i_id", "f_id", "e_id", "v_id", "v_x", "v_y", "v_z"];

#[inline]
pub fn is_default_column(name: &str) -> bool {
    DEFAULT_COLUMNS.contains(&name)
}

/// Raw decomposition of a column name, before registry lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttributes {
    pub name: String,
    pub descriptor: String,
    pub ctype_indicator: String,
    pub dtype_indicator: String,
    /// Whether the column holds any missing value; `None` when the column is
    /// not present in the table queried.
    pub has_missing: Option<bool>,
}

impl ColumnAttributes {
    /// Splits a column name on its first two underscores. Descriptors may
    /// themselves contain underscores (`v_i_draw_order`).
    pub fn parse(name: &str) -> Result<Self> {
        let (ctype, dtype, descriptor) = if is_default_column(name) {
            let (ctype, descriptor) = name.split_once('_').unwrap_or((name, ""));
            let dtype = if descriptor == "id" { "i" } else { "f" };
            (ctype, dtype, descriptor)
        } else {
            let parts: Vec<&str> = name.splitn(3, '_').collect();
            match parts.as_slice() {
                [ctype, dtype, descriptor] => (*ctype, *dtype, *descriptor),
                _ => return Err(Error::Naming(format!("{} is not a valid column name.", name))),
            }
        };

        Ok(Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            ctype_indicator: ctype.to_string(),
            dtype_indicator: dtype.to_string(),
            has_missing: None,
        })
    }
}

/// A column name resolved against both registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub component: ComponentType,
    pub dtype: DataType,
    pub descriptor: String,
}

/// Validates a column name and resolves its component and data types.
pub fn validate_column_name(name: &str) -> Result<ColumnSchema> {
    let attrs = ColumnAttributes::parse(name)?;

    let component = ComponentType::from_indicator(&attrs.ctype_indicator).ok_or_else(|| {
        Error::Naming(format!(
            "{} is not a valid ctype indicator.",
            attrs.ctype_indicator
        ))
    })?;

    let dtype = DataType::from_indicator(&attrs.dtype_indicator).ok_or_else(|| {
        Error::Naming(format!(
            "{} is not a valid dtype indicator.",
            attrs.dtype_indicator
        ))
    })?;

    Ok(ColumnSchema {
        name: attrs.name,
        component,
        dtype,
        descriptor: attrs.descriptor,
    })
}
