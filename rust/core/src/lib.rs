// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Polyframe Core
//!
//! A tabular representation of polygonal geometry. Items, faces, edges and
//! vertices live as rows of a single [`GeometryTable`]; every row is one
//! vertex of one edge of one face of one item.
//!
//! ## Overview
//!
//! - **Registries**: the [`ComponentType`] hierarchy and the [`DataType`]s a
//!   column may hold
//! - **Naming**: column names encode their component and data type
//!   (`v_f_weight`, `f_s_label`) and are checked by [`validate_column_name`]
//! - **Operators**: [`GeometryTable::map`] aggregates a column onto another
//!   component level, [`GeometryTable::expand`] explodes list-like cells
//!   into rows
//! - **Introspection**: column summaries, per-component views and topology
//!   reports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polyframe_core::{GeometryTable, Value};
//!
//! let table: GeometryTable = load();
//! let table = table.map("v_x", "f_f_mean_x", |xs| {
//!     let sum: f64 = xs.iter().filter_map(Value::as_f64).sum();
//!     Value::Float(sum / xs.len() as f64)
//! })?;
//! println!("{:?}", table.geometry_info()?);
//! ```

pub mod error;
pub mod info;
pub mod mapping;
pub mod naming;
pub mod table;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use info::{ColumnInfo, ComponentCounts, CountBucket, FaceTopology, GeometryInfo};
pub use mapping::grouping_component;
pub use naming::{
    is_default_column, validate_column_name, ColumnAttributes, ColumnSchema, DEFAULT_COLUMNS,
};
pub use table::{Column, GeometryTable};
pub use types::{ComponentType, DataType, Validator};
pub use value::{Value, ValueKey};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{GeometryTable, Value};

    /// Rows of one closed polygon: one row per (edge, endpoint), with edge
    /// ids starting at `first_edge` and coordinates equal to the vertex id.
    fn polygon(
        columns: &mut [Vec<Value>; 7],
        item: i64,
        face: i64,
        first_edge: i64,
        vertices: &[i64],
    ) {
        for (k, &start) in vertices.iter().enumerate() {
            let end = vertices[(k + 1) % vertices.len()];
            for vertex in [start, end] {
                let row = [
                    Value::Integer(item),
                    Value::Integer(face),
                    Value::Integer(first_edge + k as i64),
                    Value::Integer(vertex),
                    Value::Float(vertex as f64),
                    Value::Float(vertex as f64),
                    Value::Float(vertex as f64),
                ];
                for (column, value) in columns.iter_mut().zip(row) {
                    column.push(value);
                }
            }
        }
    }

    fn build(faces: &[&[i64]]) -> GeometryTable {
        let mut columns: [Vec<Value>; 7] = Default::default();
        let mut first_edge = 0;
        for (face, vertices) in faces.iter().enumerate() {
            polygon(&mut columns, 0, face as i64, first_edge, vertices);
            first_edge += vertices.len() as i64;
        }
        GeometryTable::from_columns(crate::DEFAULT_COLUMNS.iter().copied().zip(columns))
            .expect("fixture columns are consistent")
    }

    pub fn quadrilateral() -> GeometryTable {
        build(&[&[0, 1, 2, 3]])
    }

    pub fn triangle() -> GeometryTable {
        build(&[&[0, 1, 2]])
    }

    pub fn ngon() -> GeometryTable {
        build(&[&[0, 1, 2, 3, 4, 5]])
    }

    pub fn invalid_face() -> GeometryTable {
        build(&[&[0, 1]])
    }

    pub fn two_faces() -> GeometryTable {
        build(&[&[0, 1, 2], &[3, 4, 5]])
    }

    /// A triangle, a pentagon and a degenerate two-vertex face.
    pub fn multi() -> GeometryTable {
        build(&[&[0, 1, 2], &[3, 4, 5, 6, 7], &[8, 9]])
    }
}
