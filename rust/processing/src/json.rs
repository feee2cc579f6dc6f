// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tables as JSON records: an array with one object per row.

use polyframe_core::{validate_column_name, DataType, GeometryTable, Value, DEFAULT_COLUMNS};
use serde_json::{Map, Number};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Converts one JSON value into a table value. Booleans become integers and
/// objects are kept as their JSON text.
pub fn from_json_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Integer(b as i64),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or_default(),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(from_json_value).collect())
        }
        object @ serde_json::Value::Object(_) => Value::String(object.to_string()),
    }
}

/// Converts a table value into JSON. Non-finite floats become `null`.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json_value).collect()),
    }
}

/// Builds a table from records.
///
/// Columns are the default columns followed by every other key in sorted
/// order; keys absent from a record become missing values. Values of
/// float-typed columns are coerced to floats where possible.
pub fn records_to_table(records: Vec<Map<String, serde_json::Value>>) -> Result<GeometryTable> {
    let extras: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys())
        .map(String::as_str)
        .filter(|key| !DEFAULT_COLUMNS.contains(key))
        .collect();
    let names: Vec<String> = DEFAULT_COLUMNS
        .iter()
        .copied()
        .chain(extras)
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(records.len()); names.len()];
    for mut record in records {
        for (name, column) in names.iter().zip(columns.iter_mut()) {
            column.push(record.remove(name).map(from_json_value).unwrap_or_default());
        }
    }

    for (name, column) in names.iter().zip(columns.iter_mut()) {
        let is_float = validate_column_name(name).map_or(false, |s| s.dtype == DataType::Float);
        if is_float {
            for value in column.iter_mut() {
                if let Some(coerced) = DataType::Float.coerce(value.clone()) {
                    *value = coerced;
                }
            }
        }
    }

    Ok(GeometryTable::from_columns(names.into_iter().zip(columns))?)
}

/// Converts a table to records, keys in column order.
pub fn table_to_records(table: &GeometryTable) -> Vec<Map<String, serde_json::Value>> {
    (0..table.len())
        .map(|row| {
            table
                .columns()
                .map(|column| (column.name().to_string(), to_json_value(&column.values()[row])))
                .collect()
        })
        .collect()
}

pub fn read_json(path: &Path) -> Result<GeometryTable> {
    let reader = BufReader::new(File::open(path)?);
    let data: serde_json::Value = serde_json::from_reader(reader)?;
    let serde_json::Value::Array(rows) = data else {
        return Err(Error::Validation(format!(
            "{} is not in valid json records format.",
            path.display()
        )));
    };

    let records = rows
        .into_iter()
        .map(|row| match row {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(Error::Validation(format!(
                "{} is not in valid json records format.",
                path.display()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    records_to_table(records)
}

pub fn write_json(table: &GeometryTable, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &table_to_records(table))?;
    writer.flush()?;
    Ok(())
}
