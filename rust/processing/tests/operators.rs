// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the file operators.

use approx::assert_relative_eq;
use polyframe_core::{GeometryTable, Value};
use polyframe_processing::{Config, Error, Operators, ValidationMode};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_quad_obj(dir: &Path) -> PathBuf {
    let path = dir.join("quad.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
    path
}

fn none() -> Operators {
    Operators::new(Config::default().with_validation(ValidationMode::None))
}

#[test]
fn obj_round_trip() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let ops = Operators::default();

    let table = ops.read_obj(write_quad_obj(dir.path())).unwrap();
    assert_eq!(table.len(), 8);
    assert!(table.has_column("v_i_draw_order"));

    let out = dir.path().join("out.obj");
    ops.write_obj(&table, &out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# Generated from polyframe data\n"));
    assert!(text.ends_with("# Faces\nf 1 2 3 4\n"));
    assert!(table.is_equivalent(&ops.read_obj(&out).unwrap(), &[]));
}

#[test]
fn obj_header_comes_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        obj_header: "exported".to_string(),
        ..Config::default()
    };
    let ops = Operators::new(config);
    let table = ops.read_obj(write_quad_obj(dir.path())).unwrap();

    let out = dir.path().join("out.obj");
    ops.write_obj(&table, &out).unwrap();
    assert!(fs::read_to_string(&out).unwrap().starts_with("# exported\n"));
}

#[test]
fn parameters_are_checked_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let ops = Operators::default();

    let err = ops.read_obj(dir.path().join("missing.obj")).unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.ends_with("missing.obj does not exist.")));

    let err = ops.read_obj(dir.path().join("model.txt")).unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.ends_with("does not have a .obj extension.")));

    let table = ops.read_obj(write_quad_obj(dir.path())).unwrap();
    let err = ops.write_json(&table, dir.path().join("out.txt")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn validation_mode_none_skips_checks() {
    let dir = tempfile::tempdir().unwrap();
    let ops = none();

    let table = ops.read_obj(write_quad_obj(dir.path())).unwrap();
    let out = dir.path().join("out.txt");
    ops.write_obj(&table, &out).unwrap();
    assert!(out.exists());

    let err = ops.read_obj(dir.path().join("missing.obj")).unwrap_err();
    assert!(matches!(err, Error::Obj(polyframe_obj::Error::Io(_))));
}

#[test]
fn write_obj_validates_data_only_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = none().read_obj(write_quad_obj(dir.path())).unwrap();
    let len = table.len();
    table.set_column("v_i_bad", vec![Value::from("x"); len]).unwrap();

    let path = dir.path().join("bad.obj");
    none().write_obj(&table, &path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().ends_with("f 1 2 3 4\n"));

    let params_only = Operators::new(Config::default().with_validation(ValidationMode::Parameters));
    params_only.write_obj(&table, &path).unwrap();

    let err = Operators::default().write_obj(&table, &path).unwrap_err();
    assert!(matches!(err, Error::Table(_)));
}

#[test]
fn data_validation_rejects_invalid_tables() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = Operators::default()
        .read_obj(write_quad_obj(dir.path()))
        .unwrap();
    let len = table.len();
    table.set_column("v_i_bad", vec![Value::from("x"); len]).unwrap();

    let path = dir.path().join("bad.json");
    let params_only = Operators::new(Config::default().with_validation(ValidationMode::Parameters));
    params_only.write_json(&table, &path).unwrap();

    let err = Operators::default().write_json(&table, &path).unwrap_err();
    assert!(matches!(err, Error::Table(_)));
    let err = Operators::default().read_json(&path).unwrap_err();
    assert!(matches!(err, Error::Table(_)));
    assert!(params_only.read_json(&path).is_ok());
}

#[test]
fn json_fixture_is_read_in_records_format() {
    let table = Operators::default().read_json(fixture("quad.json")).unwrap();
    assert_eq!(
        table.column_names(),
        vec!["i_id", "f_id", "e_id", "v_id", "v_x", "v_y", "v_z", "f_i_weight", "v_s_label"]
    );
    assert_eq!(table.len(), 8);
    assert_eq!(table.get(1, "v_x"), Some(&Value::Float(1.0)));
    assert_eq!(table.get(0, "f_i_weight"), Some(&Value::Null));
    assert_eq!(table.get(7, "f_i_weight"), Some(&Value::Integer(2)));

    let info = table.geometry_info().unwrap();
    assert_eq!(info.counts.edges, 4);
    assert_eq!(info.counts.vertices, 4);
}

#[test]
fn json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let ops = Operators::default();
    let table = ops
        .read_json(fixture("quad.json"))
        .unwrap()
        .map("v_x", "f_f_mean_x", |xs| {
            let sum: f64 = xs.iter().filter_map(Value::as_f64).sum();
            Value::Float(sum / xs.len() as f64)
        })
        .unwrap();
    assert_relative_eq!(table.get(0, "f_f_mean_x").unwrap().as_f64().unwrap(), 0.5);

    let path = dir.path().join("quad.json");
    ops.write_json(&table, &path).unwrap();
    let again = ops.read_json(&path).unwrap();
    assert!(table.is_equivalent(&again, &[]));
}

#[test]
fn json_rejects_non_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("columns.json");
    fs::write(&path, r#"{"v_id": [0, 1]}"#).unwrap();

    let err = Operators::default().read_json(&path).unwrap_err();
    assert!(err.to_string().ends_with("is not in valid json records format."));
    let err = none().read_json(&path).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn columnar_round_trip_keeps_every_dtype() {
    let dir = tempfile::tempdir().unwrap();
    let ops = Operators::default();

    let mut table = ops.read_json(fixture("quad.json")).unwrap();
    let len = table.len();
    let mut meta = vec![Value::Null; len];
    meta[3] = Value::from(r#"{"source": "scan"}"#);
    table.set_column("f_j_meta", meta).unwrap();
    let mut extra: Vec<Value> = (0..len).map(|i| Value::List(vec![Value::from(i), Value::Float(0.5)])).collect();
    extra[5] = Value::Null;
    extra[6] = Value::from("text");
    table.set_column("v_x_extra", extra).unwrap();

    let path = dir.path().join("quad.pft");
    ops.write_table(&table, &path).unwrap();
    let again = ops.read_table(&path).unwrap();

    assert_eq!(again.column_names(), table.column_names());
    for name in table.column_names() {
        assert_eq!(again.column(name), table.column(name), "{}", name);
    }
}

#[test]
fn columnar_round_trip_keeps_non_finite_untyped_values() {
    let dir = tempfile::tempdir().unwrap();
    let ops = Operators::default();

    let mut table = GeometryTable::new();
    table
        .set_column(
            "v_x_state",
            vec![
                Value::Float(f64::NAN),
                Value::List(vec![Value::Float(f64::INFINITY)]),
            ],
        )
        .unwrap();

    let path = dir.path().join("state.pft");
    ops.write_table(&table, &path).unwrap();
    let again = ops.read_table(&path).unwrap();

    let state = again.column("v_x_state").unwrap();
    assert!(matches!(state[0], Value::Float(f) if f.is_nan()));
    assert_eq!(state[1], Value::List(vec![Value::Float(f64::INFINITY)]));
}

#[test]
fn columnar_round_trip_of_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pft");
    let ops = Operators::default();

    ops.write_table(&GeometryTable::new(), &path).unwrap();
    let again = ops.read_table(&path).unwrap();
    assert!(again.is_empty());
    assert_eq!(again.column_names(), GeometryTable::new().column_names());
}

#[test]
fn columnar_requires_pft_extension() {
    let dir = tempfile::tempdir().unwrap();
    let err = Operators::default()
        .write_table(&GeometryTable::new(), dir.path().join("table.arrow"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("{} does not have a .pft extension.", dir.path().join("table.arrow").display())
    );
}

#[test]
fn file_sequence_rows_follow_file_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["slice_0010.png", "slice_0002.png", "slice_0001.png"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    let ops = Operators::default();

    let table = ops.from_file_sequence(dir.path(), "").unwrap();
    assert_eq!(table.len(), 3);
    let paths: Vec<&str> = table
        .column("v_s_fullpath")
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(paths[0].ends_with("slice_0001.png"));
    assert!(paths[2].ends_with("slice_0010.png"));
    assert!(Path::new(paths[1]).is_absolute());
    assert_eq!(
        table.column("v_z").unwrap(),
        &[Value::Float(1.0), Value::Float(2.0), Value::Float(10.0)]
    );
    assert_eq!(table.get(0, "v_id"), Some(&Value::Null));

    let table = ops.from_file_sequence(dir.path(), "mask").unwrap();
    assert!(table.has_column("v_s_mask_fullpath"));

    assert!(ops.from_file_sequence(dir.path(), "mask_").is_err());
    fs::write(dir.path().join("notes.txt"), b"").unwrap();
    let err = ops.from_file_sequence(dir.path(), "").unwrap_err();
    assert!(err.to_string().contains("bad z coordinates"));
}
