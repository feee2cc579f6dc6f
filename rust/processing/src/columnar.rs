// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-table persistence as Arrow IPC files.
//!
//! Column types follow the dtype in each column name:
//! - float: `Float64`
//! - integer: `Int64`
//! - string and json: `Utf8`
//! - untyped: `Utf8` holding the serialized [`Value`]
//!
//! Missing values are Arrow nulls, so every dtype round-trips exactly. JSON
//! has no representation for non-finite numbers, so untyped cells store
//! them as text (`{"Float":"NaN"}`, `"inf"`, `"-inf"`).

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType as ArrowType, Field, Schema};
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use polyframe_core::{validate_column_name, DataType, GeometryTable, Value};
use serde_json::json;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// File extension of persisted tables.
pub const EXTENSION: &str = "pft";

fn untyped_to_json(value: &Value) -> serde_json::Result<serde_json::Value> {
    match value {
        Value::Float(f) if !f.is_finite() => Ok(json!({ "Float": f.to_string() })),
        Value::List(items) => {
            let items = items
                .iter()
                .map(untyped_to_json)
                .collect::<serde_json::Result<Vec<_>>>()?;
            Ok(json!({ "List": items }))
        }
        value => serde_json::to_value(value),
    }
}

fn untyped_from_json(name: &str, json: serde_json::Value) -> Result<Value> {
    let serde_json::Value::Object(mut fields) = json else {
        return Ok(serde_json::from_value(json)?);
    };
    match (fields.len(), fields.remove("Float"), fields.remove("List")) {
        (1, Some(serde_json::Value::String(text)), _) => {
            text.parse().map(Value::Float).map_err(|_| {
                Error::Validation(format!("Column {} has invalid float {}.", name, text))
            })
        }
        (1, _, Some(serde_json::Value::Array(items))) => items
            .into_iter()
            .map(|item| untyped_from_json(name, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        (_, float, list) => {
            fields.extend(float.map(|v| ("Float".to_string(), v)));
            fields.extend(list.map(|v| ("List".to_string(), v)));
            Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
        }
    }
}

fn encode_column(name: &str, dtype: DataType, values: &[Value]) -> Result<(Field, ArrayRef)> {
    let array: ArrayRef = match dtype {
        DataType::Float => Arc::new(values.iter().map(Value::as_f64).collect::<Float64Array>()),
        DataType::Integer => Arc::new(values.iter().map(Value::as_i64).collect::<Int64Array>()),
        DataType::String | DataType::Json => {
            Arc::new(values.iter().map(Value::as_str).collect::<StringArray>())
        }
        DataType::Untyped => {
            let encoded = values
                .iter()
                .map(|value| match value {
                    Value::Null => Ok(None),
                    value => untyped_to_json(value).map(|json| Some(json.to_string())),
                })
                .collect::<std::result::Result<Vec<Option<String>>, _>>()?;
            Arc::new(StringArray::from(encoded))
        }
    };
    let field = Field::new(name, array.data_type().clone(), true);
    Ok((field, array))
}

fn decode_column(name: &str, array: &dyn Array, output: &mut Vec<Value>) -> Result<()> {
    let unsupported = || {
        Error::Validation(format!(
            "Column {} has unsupported type {}.",
            name,
            array.data_type()
        ))
    };

    match array.data_type() {
        ArrowType::Float64 => {
            let array = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(unsupported)?;
            output.extend(array.iter().map(|v| v.map(Value::Float).unwrap_or_default()));
        }
        ArrowType::Int64 => {
            let array = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(unsupported)?;
            output.extend(array.iter().map(|v| v.map(Value::Integer).unwrap_or_default()));
        }
        ArrowType::Utf8 => {
            let array = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(unsupported)?;
            let untyped = validate_column_name(name).map_or(false, |s| s.dtype == DataType::Untyped);
            for value in array.iter() {
                output.push(match value {
                    None => Value::Null,
                    Some(text) if untyped => untyped_from_json(name, serde_json::from_str(text)?)?,
                    Some(text) => Value::String(text.to_string()),
                });
            }
        }
        _ => return Err(unsupported()),
    }
    Ok(())
}

/// Writes the whole table to an Arrow IPC file.
///
/// Every column is checked against its dtype first, so no value is lost in
/// the conversion.
pub fn write_table(table: &GeometryTable, path: &Path) -> Result<()> {
    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays = Vec::with_capacity(table.num_columns());
    for column in table.columns() {
        let dtype = validate_column_name(column.name())?.dtype;
        table.validate_column_values(column.name())?;
        let (field, array) = encode_column(column.name(), dtype, column.values())?;
        fields.push(field);
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(table.len()));
    let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)?;

    let mut writer = FileWriter::try_new(BufWriter::new(File::create(path)?), &schema)?;
    writer.write(&batch)?;
    writer.finish()?;
    Ok(())
}

/// Reads a table written by [`write_table`].
pub fn read_table(path: &Path) -> Result<GeometryTable> {
    let reader = FileReader::try_new(BufReader::new(File::open(path)?), None)?;
    let schema = reader.schema();
    let mut columns: Vec<(String, Vec<Value>)> = schema
        .fields()
        .iter()
        .map(|field| (field.name().clone(), Vec::new()))
        .collect();

    for batch in reader {
        let batch = batch?;
        for ((name, values), array) in columns.iter_mut().zip(batch.columns()) {
            decode_column(name, array.as_ref(), values)?;
        }
    }

    Ok(GeometryTable::from_columns(columns)?)
}
