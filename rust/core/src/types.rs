// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed registries for the structural level and value kind of a column.
//!
//! Every column name carries a single-character indicator for each registry,
//! e.g. `f_i_edge_count` is a face-level (`f`) integer (`i`) column.

use std::fmt;

use crate::value::Value;

/// Structural level a column belongs to.
///
/// Levels are totally ordered: items contain faces, faces contain edges and
/// edges contain vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    Item,
    Face,
    Edge,
    Vertex,
}

impl ComponentType {
    /// All component types, outermost first.
    pub const ALL: [ComponentType; 4] = [
        ComponentType::Item,
        ComponentType::Face,
        ComponentType::Edge,
        ComponentType::Vertex,
    ];

    #[inline]
    pub fn indicator(self) -> char {
        match self {
            ComponentType::Item => 'i',
            ComponentType::Face => 'f',
            ComponentType::Edge => 'e',
            ComponentType::Vertex => 'v',
        }
    }

    #[inline]
    pub fn fullname(self) -> &'static str {
        match self {
            ComponentType::Item => "item",
            ComponentType::Face => "face",
            ComponentType::Edge => "edge",
            ComponentType::Vertex => "vertex",
        }
    }

    /// Rank in the containment hierarchy (item = 0 … vertex = 3).
    #[inline]
    pub fn order(self) -> u8 {
        match self {
            ComponentType::Item => 0,
            ComponentType::Face => 1,
            ComponentType::Edge => 2,
            ComponentType::Vertex => 3,
        }
    }

    /// Name of the default id column for this level.
    #[inline]
    pub fn id_column(self) -> &'static str {
        match self {
            ComponentType::Item => "i_id",
            ComponentType::Face => "f_id",
            ComponentType::Edge => "e_id",
            ComponentType::Vertex => "v_id",
        }
    }

    /// Whether `self` is at the same level as `other` or encloses it.
    #[inline]
    pub fn contains(self, other: ComponentType) -> bool {
        self.order() <= other.order()
    }

    pub fn from_indicator(indicator: &str) -> Option<Self> {
        match indicator {
            "i" => Some(ComponentType::Item),
            "f" => Some(ComponentType::Face),
            "e" => Some(ComponentType::Edge),
            "v" => Some(ComponentType::Vertex),
            _ => None,
        }
    }

    pub fn from_fullname(fullname: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.fullname() == fullname)
    }

    pub fn is_valid_indicator(indicator: &str) -> bool {
        Self::from_indicator(indicator).is_some()
    }

    pub fn is_valid_fullname(fullname: &str) -> bool {
        Self::from_fullname(fullname).is_some()
    }

    pub fn indicators() -> Vec<char> {
        Self::ALL.iter().map(|c| c.indicator()).collect()
    }

    pub fn fullnames() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.fullname()).collect()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fullname())
    }
}

/// Value kind a column's cells must conform to. Missing values are accepted
/// by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float,
    Integer,
    String,
    /// A string holding a JSON document.
    Json,
    /// Anything, including lists. Meant for intermediate algorithm state.
    Untyped,
}

/// Predicate applied to every non-missing cell of a column.
pub type Validator = fn(&Value) -> bool;

fn is_float(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Float(_))
}

fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Integer(_))
}

fn is_string(value: &Value) -> bool {
    matches!(value, Value::Null | Value::String(_))
}

fn is_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => serde_json::from_str::<serde_json::Value>(text).is_ok(),
        _ => false,
    }
}

fn is_anything(_: &Value) -> bool {
    true
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::Float,
        DataType::Integer,
        DataType::String,
        DataType::Json,
        DataType::Untyped,
    ];

    #[inline]
    pub fn indicator(self) -> char {
        match self {
            DataType::Float => 'f',
            DataType::Integer => 'i',
            DataType::String => 's',
            DataType::Json => 'j',
            DataType::Untyped => 'x',
        }
    }

    #[inline]
    pub fn fullname(self) -> &'static str {
        match self {
            DataType::Float => "float",
            DataType::Integer => "integer",
            DataType::String => "string",
            DataType::Json => "json",
            DataType::Untyped => "optional",
        }
    }

    #[inline]
    pub fn validator(self) -> Validator {
        match self {
            DataType::Float => is_float,
            DataType::Integer => is_integer,
            DataType::String => is_string,
            DataType::Json => is_json,
            DataType::Untyped => is_anything,
        }
    }

    #[inline]
    pub fn is_valid_value(self, value: &Value) -> bool {
        (self.validator())(value)
    }

    /// Converts a value into this kind's native representation.
    ///
    /// Floats truncate toward zero when coerced to integers, numbers and
    /// strings convert into each other where the text parses, and a missing
    /// value stays missing except for integers, which have no missing
    /// representation to coerce into. Returns `None` when no conversion
    /// exists.
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (DataType::Untyped, value) => Some(value),
            (_, Value::List(_)) => None,

            (DataType::Float, Value::Null) => Some(Value::Null),
            (DataType::Float, Value::Float(f)) => Some(Value::Float(f)),
            (DataType::Float, Value::Integer(i)) => Some(Value::Float(i as f64)),
            (DataType::Float, Value::String(s)) => s.trim().parse().ok().map(Value::Float),

            (DataType::Integer, Value::Null) => None,
            (DataType::Integer, Value::Integer(i)) => Some(Value::Integer(i)),
            (DataType::Integer, Value::Float(f)) if f.is_finite() => {
                Some(Value::Integer(f.trunc() as i64))
            }
            (DataType::Integer, Value::Float(_)) => None,
            (DataType::Integer, Value::String(s)) => s.trim().parse().ok().map(Value::Integer),

            (DataType::String | DataType::Json, Value::Null) => Some(Value::Null),
            (DataType::String | DataType::Json, Value::String(s)) => Some(Value::String(s)),
            (DataType::String | DataType::Json, number) => Some(Value::String(number.to_string())),
        }
    }

    pub fn from_indicator(indicator: &str) -> Option<Self> {
        match indicator {
            "f" => Some(DataType::Float),
            "i" => Some(DataType::Integer),
            "s" => Some(DataType::String),
            "j" => Some(DataType::Json),
            "x" => Some(DataType::Untyped),
            _ => None,
        }
    }

    pub fn from_fullname(fullname: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.fullname() == fullname)
    }

    pub fn is_valid_indicator(indicator: &str) -> bool {
        Self::from_indicator(indicator).is_some()
    }

    pub fn is_valid_fullname(fullname: &str) -> bool {
        Self::from_fullname(fullname).is_some()
    }

    pub fn indicators() -> Vec<char> {
        Self::ALL.iter().map(|d| d.indicator()).collect()
    }

    pub fn fullnames() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.fullname()).collect()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fullname())
    }
}
