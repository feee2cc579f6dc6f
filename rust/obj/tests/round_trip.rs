// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-level import/export tests against the fixtures.

use approx::assert_relative_eq;
use polyframe_core::{FaceTopology, GeometryTable, Value};
use polyframe_obj::{
    import_table, parse_file, parse_str, read_file, to_obj_string, write_file, ComponentKind,
    ExportOptions, Record,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn reimport(table: &GeometryTable) -> GeometryTable {
    let text = to_obj_string(table, &ExportOptions::default()).unwrap();
    import_table(&parse_str(&text).unwrap()).unwrap()
}

#[test]
fn single_face_file_round_trips_byte_for_byte() {
    let path = fixture("face.obj");
    let expected = std::fs::read_to_string(&path).unwrap();
    let table = read_file(&path).unwrap();
    assert_eq!(to_obj_string(&table, &ExportOptions::default()).unwrap(), expected);
}

#[test]
fn cube_parses_every_record_kind() {
    let records = parse_file(fixture("cube.obj")).unwrap();
    let count = |kind: ComponentKind| {
        records
            .iter()
            .filter_map(Record::component)
            .filter(|c| c.kind() == kind)
            .count()
    };
    assert_eq!(count(ComponentKind::Vertex), 8);
    assert_eq!(count(ComponentKind::VertexTexture), 4);
    assert_eq!(count(ComponentKind::VertexNormal), 6);
    assert_eq!(count(ComponentKind::Face), 6);
    assert_eq!(records[0], Record::Comment("Unit cube".to_string()));
}

#[test]
fn cube_import_has_expected_topology() {
    let table = read_file(fixture("cube.obj")).unwrap();
    let info = table.geometry_info().unwrap();
    assert_eq!(info.counts.items, 1);
    assert_eq!(info.counts.faces, 6);
    assert_eq!(info.counts.edges, 24);
    assert_eq!(info.counts.vertices, 8);
    assert_eq!(info.face_topology, Some(vec![FaceTopology::Quadrilateral]));
    assert_eq!(table.len(), 48);

    let vertices = table.vertex_info().unwrap();
    assert_relative_eq!(vertices.get(7, "v_x").unwrap().as_f64().unwrap(), 0.5);
    assert_relative_eq!(vertices.get(7, "v_z").unwrap().as_f64().unwrap(), -0.5);
}

#[test]
fn cube_survives_export_and_import() {
    let table = read_file(fixture("cube.obj")).unwrap();
    let again = reimport(&table);
    assert!(table.is_equivalent(&again, &[]));

    let first = to_obj_string(&table, &ExportOptions::default()).unwrap();
    let second = to_obj_string(&again, &ExportOptions::default()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("\nf 1 2 4 3\n"));
}

#[test]
fn shared_edges_keep_separate_edge_ids() {
    let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
    let table = import_table(&parse_str(text).unwrap()).unwrap();
    assert_eq!(table.count_unique("f_id").unwrap(), 2);
    assert_eq!(table.count_unique("e_id").unwrap(), 6);
    assert_eq!(table.count_unique("v_id").unwrap(), 4);
    assert!(table.is_equivalent(&reimport(&table), &[]));
}

#[test]
fn imported_table_supports_mapping() {
    let table = read_file(fixture("face.obj")).unwrap();
    let table = table
        .map("v_id", "v_i_foo", |_| Value::Integer(27))
        .unwrap()
        .map("f_id", "f_i_mean", |ids| {
            let sum: f64 = ids.iter().filter_map(Value::as_f64).sum();
            Value::Float(sum / ids.len() as f64)
        })
        .unwrap();

    assert!(table
        .column("v_i_foo")
        .unwrap()
        .iter()
        .all(|v| *v == Value::Integer(27)));
    assert_eq!(table.column("f_i_mean").unwrap(), table.column("f_id").unwrap());

    // derived columns do not disturb the written file
    let expected = std::fs::read_to_string(fixture("face.obj")).unwrap();
    assert_eq!(to_obj_string(&table, &ExportOptions::default()).unwrap(), expected);
}

#[test]
fn write_file_creates_readable_obj() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.obj");
    let table = read_file(fixture("cube.obj")).unwrap();

    let options = ExportOptions {
        header: "cube export".to_string(),
    };
    write_file(&table, &path, &options).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# cube export\n\n# Vertices\n"));
    assert!(table.is_equivalent(&read_file(&path).unwrap(), &[]));
}
