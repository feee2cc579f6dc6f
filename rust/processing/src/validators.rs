// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter validators for file operators. Every validator fails with
//! [`Error::Validation`].

use polyframe_core::GeometryTable;
use std::path::Path;

use crate::config::ValidationMode;
use crate::error::{Error, Result};

/// Characters allowed in a column infix.
pub const LEGAL_COLUMN_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyz0123456789_";

/// A deferred parameter check.
pub type ParameterCheck<'a> = Box<dyn Fn() -> Result<()> + 'a>;

pub fn file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::Validation(format!("{} does not exist.", path.display())));
    }
    Ok(())
}

/// Checks the path's extension, without the leading dot.
pub fn has_extension(path: &Path, extension: &str) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(found) if found == extension => Ok(()),
        _ => Err(Error::Validation(format!(
            "{} does not have a .{} extension.",
            path.display(),
            extension
        ))),
    }
}

/// Checks that the file holds a JSON array whose first element, if any, is
/// an object.
pub fn is_records_json(path: &Path) -> Result<()> {
    let invalid = || Error::Validation(format!("{} is not in valid json records format.", path.display()));
    let content = std::fs::read_to_string(path)?;
    let data: serde_json::Value = serde_json::from_str(&content).map_err(|_| invalid())?;
    match data.as_array() {
        Some(rows) if rows.first().map_or(true, serde_json::Value::is_object) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Checks that `path` is a directory containing only files whose stems end
/// in an integer, such as `frame_0001.png`.
pub fn is_file_sequence_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::Validation(format!("{} does not exist.", path.display())));
    }
    if !path.is_dir() {
        return Err(Error::Validation(format!("{} is not a directory.", path.display())));
    }

    let mut entries = std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let not_files: Vec<String> = entries
        .iter()
        .filter(|p| !p.is_file())
        .map(|p| p.display().to_string())
        .collect();
    if !not_files.is_empty() {
        return Err(Error::Validation(format!("{:?} are not files.", not_files)));
    }

    let mut bad_coords = Vec::new();
    let mut bad_files = Vec::new();
    for entry in &entries {
        let coordinate = sequence_suffix(entry);
        if coordinate.parse::<i64>().is_err() {
            bad_coords.push(coordinate.to_string());
            bad_files.push(entry.display().to_string());
        }
    }
    if !bad_coords.is_empty() {
        bad_coords.sort();
        return Err(Error::Validation(format!(
            "Directory {} has files with bad z coordinates. Bad z coordinates: {:?}. Bad files: {:?}",
            path.display(),
            bad_coords,
            bad_files
        )));
    }
    Ok(())
}

/// Text after the last `_` of a file stem, or the whole stem.
pub(crate) fn sequence_suffix(path: &Path) -> &str {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    stem.rsplit('_').next().unwrap_or(stem)
}

pub fn is_valid_column_infix(infix: &str) -> Result<()> {
    if infix.starts_with('_') {
        return Err(Error::Validation(format!(
            "Infixes may not start with an \"_\". Infix given: {}",
            infix
        )));
    }
    if infix.ends_with('_') {
        return Err(Error::Validation(format!(
            "Infixes may not end with an \"_\". Infix given: {}",
            infix
        )));
    }

    let mut illegal: Vec<char> = infix
        .chars()
        .filter(|c| !LEGAL_COLUMN_CHARACTERS.contains(*c))
        .collect();
    if !illegal.is_empty() {
        illegal.sort_unstable();
        illegal.dedup();
        return Err(Error::Validation(format!(
            "Infix contains the illegal characters: {:?}. Infix given: {}",
            illegal, infix
        )));
    }
    Ok(())
}

/// Runs parameter checks and then table validation, as far as `mode` asks.
pub fn dispatch(
    mode: ValidationMode,
    parameters: &[ParameterCheck<'_>],
    data: Option<&GeometryTable>,
) -> Result<()> {
    if mode.validates_parameters() {
        for check in parameters {
            check()?;
        }
    }
    if mode.validates_data() {
        if let Some(table) = data {
            table.validate()?;
        }
    }
    Ok(())
}
