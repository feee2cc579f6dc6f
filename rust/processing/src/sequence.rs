// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tables built from numbered file sequences, such as image slices.

use polyframe_core::{GeometryTable, Value};
use std::path::Path;

use crate::error::{Error, Result};
use crate::validators::sequence_suffix;

/// Name of the path column for an optional infix.
pub fn fullpath_column(infix: &str) -> String {
    if infix.is_empty() {
        "v_s_fullpath".to_string()
    } else {
        format!("v_s_{}_fullpath", infix)
    }
}

/// One row per file of `directory` in sorted order, holding the file's
/// absolute path and, in `v_z`, the number that ends its stem
/// (`slice_0004.png` has `v_z = 4.0`).
pub fn from_file_sequence(directory: &Path, infix: &str) -> Result<GeometryTable> {
    let directory = directory.canonicalize()?;
    let mut paths = std::fs::read_dir(&directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let z = paths
        .iter()
        .map(|path| {
            let suffix = sequence_suffix(path);
            suffix
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| {
                    Error::Validation(format!(
                        "{} does not end in a z coordinate. Found: {}",
                        path.display(),
                        suffix
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    let fullpaths = paths
        .iter()
        .map(|path| Value::from(path.to_string_lossy().into_owned()))
        .collect();

    let mut table = GeometryTable::new();
    table.set_column(fullpath_column(infix), fullpaths)?;
    table.set_column("v_z", z)?;

    tracing::debug!(directory = %directory.display(), files = table.len(), "Read file sequence");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullpath_column() {
        assert_eq!(fullpath_column(""), "v_s_fullpath");
        assert_eq!(fullpath_column("left"), "v_s_left_fullpath");
    }

    #[test]
    fn test_empty_directory_gives_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = from_file_sequence(dir.path(), "").unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("v_s_fullpath"));
    }
}
