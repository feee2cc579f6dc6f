// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Polyframe OBJ
//!
//! Reads and writes the vertex and face subset of the OBJ format as
//! polyframe geometry tables.
//!
//! ```rust,ignore
//! use polyframe_obj::{read_file, to_obj_string, ExportOptions};
//!
//! let table = read_file("cube.obj")?;
//! let text = to_obj_string(&table, &ExportOptions::default())?;
//! ```
//!
//! Parsing yields [`Record`]s with ids that are 1-based and dense per
//! component kind. Import keeps vertices and faces only; normals, texture
//! coordinates and parameter-space points are parsed but not interpreted.

pub mod codec;
pub mod error;
pub mod parser;
pub mod record;

pub use codec::{
    export_table, face_to_edges, import_table, read_file, rows_to_face, to_obj_string,
    write_file, EdgeRow, ExportOptions, FaceCorner, IdGenerator, DEFAULT_HEADER,
    DRAW_ORDER_COLUMN,
};
pub use error::{Error, Result};
pub use parser::{parse_file, parse_line, parse_str, Line};
pub use record::{render, Component, ComponentKind, FaceItem, Record};
