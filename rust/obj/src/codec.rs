// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between OBJ records and geometry tables.
//!
//! Import decomposes every face into its cyclic edges and emits one row per
//! (edge, endpoint). Export reverses this: vertex lines sorted by `v_id`,
//! then one face line per `f_id` with vertices in draw order.

use polyframe_core::{GeometryTable, Value, ValueKey};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::parser::parse_file;
use crate::record::{render, Component, FaceItem, Record};

/// Column preserving the position of each vertex within its face.
pub const DRAW_ORDER_COLUMN: &str = "v_i_draw_order";

/// Header comment written when none is configured.
pub const DEFAULT_HEADER: &str = "Generated from polyframe data";

const EXPORT_COLUMNS: [&str; 6] = ["v_id", "v_x", "v_y", "v_z", "f_id", "e_id"];

/// Hands out face and edge ids for one import, starting at 0.
#[derive(Debug, Default)]
pub struct IdGenerator {
    faces: i64,
    edges: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_face(&mut self) -> i64 {
        let id = self.faces;
        self.faces += 1;
        id
    }

    pub fn next_edge(&mut self) -> i64 {
        let id = self.edges;
        self.edges += 1;
        id
    }
}

/// One (edge, endpoint) row of a decomposed face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRow {
    pub face_id: i64,
    pub edge_id: i64,
    pub vertex_id: i64,
    /// Position of the vertex's first occurrence in the face.
    pub draw_order: i64,
}

/// Splits a face into consecutive vertex pairs, closing the loop from the
/// last vertex back to the first, with two rows per edge.
pub fn face_to_edges(vertex_ids: &[i64], ids: &mut IdGenerator) -> Vec<EdgeRow> {
    if vertex_ids.is_empty() {
        return Vec::new();
    }

    let mut draw_order: FxHashMap<i64, i64> = FxHashMap::default();
    for (position, &vertex_id) in vertex_ids.iter().enumerate() {
        draw_order.entry(vertex_id).or_insert(position as i64);
    }

    let face_id = ids.next_face();
    let ends = vertex_ids.iter().cycle().skip(1);
    let mut rows = Vec::with_capacity(vertex_ids.len() * 2);
    for (&start, &end) in vertex_ids.iter().zip(ends) {
        let edge_id = ids.next_edge();
        for vertex_id in [start, end] {
            rows.push(EdgeRow {
                face_id,
                edge_id,
                vertex_id,
                draw_order: draw_order.get(&vertex_id).copied().unwrap_or_default(),
            });
        }
    }
    rows
}

/// Builds a table from parsed records.
///
/// Only vertices and faces are used. Rows are grouped by vertex in order of
/// first use, duplicate rows are dropped, every row belongs to item 0 and
/// vertex ids are shifted to start at 0.
pub fn import_table(records: &[Record]) -> Result<GeometryTable> {
    let mut vertices: FxHashMap<i64, [f64; 3]> = FxHashMap::default();
    let mut ids = IdGenerator::new();
    let mut edges: Vec<EdgeRow> = Vec::new();

    let mut faces = 0usize;

    for record in records {
        let Record::Component { id, component } = record else {
            continue;
        };
        match component {
            Component::Vertex { x, y, z, .. } => {
                vertices.insert(*id as i64, [*x, *y, *z]);
            }
            Component::Face { parts } => {
                let vertex_ids: SmallVec<[i64; 4]> = parts.iter().map(|p| p.vertex_id).collect();
                edges.extend(face_to_edges(&vertex_ids, &mut ids));
                faces += 1;
            }
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(Error::MissingColumn("v_id".to_string()));
    }
    if edges.is_empty() {
        return Err(Error::MissingColumn("f_id".to_string()));
    }

    let mut first_seen: Vec<i64> = Vec::new();
    let mut by_vertex: FxHashMap<i64, Vec<&EdgeRow>> = FxHashMap::default();
    for edge in &edges {
        if !vertices.contains_key(&edge.vertex_id) {
            return Err(Error::UnknownVertex {
                face: edge.face_id as usize + 1,
                vertex: edge.vertex_id,
            });
        }
        by_vertex
            .entry(edge.vertex_id)
            .or_insert_with(|| {
                first_seen.push(edge.vertex_id);
                Vec::new()
            })
            .push(edge);
    }

    let mut columns: [Vec<Value>; 8] = Default::default();
    for vertex_id in &first_seen {
        let [x, y, z] = vertices[vertex_id];
        for edge in &by_vertex[vertex_id] {
            let row = [
                Value::Integer(0),
                Value::Integer(edge.face_id),
                Value::Integer(edge.edge_id),
                Value::Integer(vertex_id - 1),
                Value::Float(x),
                Value::Float(y),
                Value::Float(z),
                Value::Integer(edge.draw_order),
            ];
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
    }

    let names = polyframe_core::DEFAULT_COLUMNS
        .into_iter()
        .chain([DRAW_ORDER_COLUMN]);
    let table = GeometryTable::from_columns(names.zip(columns))?.drop_duplicate_rows();

    tracing::debug!(
        vertices = vertices.len(),
        faces,
        rows = table.len(),
        "Imported OBJ records"
    );
    Ok(table)
}

/// One row of a face during export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    /// 0-based vertex id.
    pub vertex_id: i64,
    pub draw_order: Option<i64>,
}

/// Recovers a face from its rows: corners are ordered by draw order, and
/// rows without one follow in the order given. Repeated vertices are
/// dropped and ids become 1-based.
///
/// [`export_table`] passes corners in `v_id` order, so faces of a table
/// without `v_i_draw_order` list their vertices by ascending id.
pub fn rows_to_face(corners: &[FaceCorner]) -> Component {
    let mut corners = corners.to_vec();
    corners.sort_by_key(|c| (c.draw_order.is_none(), c.draw_order));

    let mut seen = FxHashSet::default();
    let parts = corners
        .iter()
        .filter(|c| seen.insert(c.vertex_id))
        .map(|c| FaceItem::vertex(c.vertex_id + 1))
        .collect();
    Component::Face { parts }
}

/// Options for writing OBJ data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Text of the leading comment line.
    pub header: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

/// Converts a table into OBJ records: header, vertices, faces.
///
/// Only the columns written to the file are checked; other derived columns
/// are left alone. Rows missing a vertex id or coordinate are skipped. Vertex lines follow
/// `v_id` order and repeat neither id nor position; faces follow `f_id`
/// order and skip rows without a face or edge id.
pub fn export_table(table: &GeometryTable, options: &ExportOptions) -> Result<Vec<Record>> {
    for name in EXPORT_COLUMNS {
        if !table.has_column(name) {
            return Err(Error::MissingColumn(name.to_string()));
        }
        table.validate_column(name)?;
    }
    if table.has_column(DRAW_ORDER_COLUMN) {
        table.validate_column(DRAW_ORDER_COLUMN)?;
    }

    let v_id = table.require_column("v_id")?;
    let coords = [
        table.require_column("v_x")?,
        table.require_column("v_y")?,
        table.require_column("v_z")?,
    ];
    let f_id = table.require_column("f_id")?;
    let e_id = table.require_column("e_id")?;
    let draw_order = table.column(DRAW_ORDER_COLUMN);

    let mut rows: Vec<usize> = (0..table.len())
        .filter(|&row| !v_id[row].is_null() && coords.iter().all(|c| !c[row].is_null()))
        .collect();
    rows.sort_by(|&a, &b| v_id[a].total_cmp(&v_id[b]));

    let mut records = vec![
        Record::Comment(options.header.clone()),
        Record::Blank,
        Record::Comment("Vertices".to_string()),
    ];

    let mut seen: FxHashSet<[Option<ValueKey>; 4]> = FxHashSet::default();
    for &row in &rows {
        let key = [
            v_id[row].key(),
            coords[0][row].key(),
            coords[1][row].key(),
            coords[2][row].key(),
        ];
        if !seen.insert(key) {
            continue;
        }
        let [x, y, z] = coords.map(|c| c[row].as_f64().unwrap_or_default());
        records.push(Record::Component {
            id: seen.len(),
            component: Component::Vertex { x, y, z, w: None },
        });
    }

    let mut faces: BTreeMap<i64, Vec<FaceCorner>> = BTreeMap::new();
    for &row in &rows {
        let (Some(face_id), Some(vertex_id)) = (f_id[row].as_i64(), v_id[row].as_i64()) else {
            continue;
        };
        if e_id[row].is_null() {
            continue;
        }
        faces.entry(face_id).or_default().push(FaceCorner {
            vertex_id,
            draw_order: draw_order.and_then(|column| column[row].as_i64()),
        });
    }

    records.push(Record::Blank);
    records.push(Record::Comment("Faces".to_string()));
    for (n, corners) in faces.values().enumerate() {
        records.push(Record::Component {
            id: n + 1,
            component: rows_to_face(corners),
        });
    }

    Ok(records)
}

/// Renders a table as OBJ text.
pub fn to_obj_string(table: &GeometryTable, options: &ExportOptions) -> Result<String> {
    Ok(render(&export_table(table, options)?))
}

/// Reads an OBJ file into a table.
pub fn read_file(path: impl AsRef<Path>) -> Result<GeometryTable> {
    import_table(&parse_file(path)?)
}

/// Writes a table to an OBJ file.
pub fn write_file(
    table: &GeometryTable,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_obj_string(table, options)?)?;
    tracing::info!(path = %path.display(), "OBJ data written");
    Ok(())
}
