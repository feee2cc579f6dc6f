// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Introspection and reporting: column summaries, per-component views,
//! counts, topology classification and table equivalence.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::naming::validate_column_name;
use crate::table::GeometryTable;
use crate::types::{ComponentType, DataType};
use crate::value::{Value, ValueKey};

/// Summary of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub descriptor: String,
    pub ctype: ComponentType,
    pub dtype: DataType,
    pub has_missing: bool,
}

/// Bucket of a distinct-count summary. Counts of five or more collapse into
/// [`CountBucket::Many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountBucket {
    Exactly(usize),
    Many,
}

impl fmt::Display for CountBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountBucket::Exactly(n) => write!(f, "{}", n),
            CountBucket::Many => f.write_str("n"),
        }
    }
}

/// Polygon class of a face, derived from its number of distinct edges.
/// Variants are declared in name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FaceTopology {
    /// Fewer than three edges.
    Invalid,
    /// Five or more edges.
    Ngon,
    Quadrilateral,
    Triangle,
}

impl FaceTopology {
    pub fn name(self) -> &'static str {
        match self {
            FaceTopology::Invalid => "invalid",
            FaceTopology::Ngon => "ngon",
            FaceTopology::Quadrilateral => "quadrilateral",
            FaceTopology::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComponentCounts {
    pub items: usize,
    pub faces: usize,
    pub edges: usize,
    pub vertices: usize,
}

/// Geometric and topological overview of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInfo {
    pub counts: ComponentCounts,
    pub faces_per_item: Vec<CountBucket>,
    pub edges_per_item: Vec<CountBucket>,
    pub vertices_per_item: Vec<CountBucket>,
    pub edges_per_face: Vec<CountBucket>,
    pub vertices_per_face: Vec<CountBucket>,
    pub vertices_per_edge: Vec<CountBucket>,
    /// Polygon classes present, sorted by name. `None` when no face has an
    /// edge.
    pub face_topology: Option<Vec<FaceTopology>>,
}

impl GeometryTable {
    /// One [`ColumnInfo`] per column, in column order.
    pub fn info(&self) -> Result<Vec<ColumnInfo>> {
        self.columns()
            .map(|column| {
                let schema = validate_column_name(column.name())?;
                Ok(ColumnInfo {
                    name: schema.name,
                    descriptor: schema.descriptor,
                    ctype: schema.component,
                    dtype: schema.dtype,
                    has_missing: column.has_missing(),
                })
            })
            .collect()
    }

    /// All columns of one component type, with one row per distinct
    /// non-missing id in ascending order. Each cell is the first non-missing
    /// value found for that id.
    pub fn component_info(&self, ctype: ComponentType) -> Result<GeometryTable> {
        let id_column = ctype.id_column();
        let ids = self.require_column(id_column)?;
        let prefix = format!("{}_", ctype.indicator());

        let mut names: Vec<&str> = vec![id_column];
        names.extend(
            self.column_names()
                .into_iter()
                .filter(|name| name.starts_with(&prefix) && *name != id_column),
        );

        let groups = group_rows(ids);
        let mut order: Vec<usize> = (0..groups.len()).collect();
        order.sort_by(|&a, &b| ids[groups[a][0]].total_cmp(&ids[groups[b][0]]));

        let columns = names
            .iter()
            .map(|name| {
                let values = self.require_column(name)?;
                let firsts = order
                    .iter()
                    .map(|&g| {
                        groups[g]
                            .iter()
                            .map(|&row| &values[row])
                            .find(|v| !v.is_null())
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect();
                Ok((name.to_string(), firsts))
            })
            .collect::<Result<Vec<(String, Vec<Value>)>>>()?;

        GeometryTable::from_columns(columns)
    }

    pub fn item_info(&self) -> Result<GeometryTable> {
        self.component_info(ComponentType::Item)
    }

    pub fn face_info(&self) -> Result<GeometryTable> {
        self.component_info(ComponentType::Face)
    }

    pub fn edge_info(&self) -> Result<GeometryTable> {
        self.component_info(ComponentType::Edge)
    }

    pub fn vertex_info(&self) -> Result<GeometryTable> {
        self.component_info(ComponentType::Vertex)
    }

    /// Number of distinct non-missing values in a column.
    pub fn count_unique(&self, name: &str) -> Result<usize> {
        let values = self.require_column(name)?;
        Ok(values
            .iter()
            .filter_map(Value::key)
            .collect::<FxHashSet<_>>()
            .len())
    }

    /// Sorted distinct values of "number of distinct `count` values per
    /// `group` value", over rows where both are present.
    pub fn unique_counts_per(&self, count: &str, group: &str) -> Result<Vec<usize>> {
        let counted = self.require_column(count)?;
        let grouped = self.require_column(group)?;

        let mut per_group: FxHashMap<ValueKey, FxHashSet<ValueKey>> = FxHashMap::default();
        for (c, g) in counted.iter().zip(grouped) {
            if let (Some(c), Some(g)) = (c.key(), g.key()) {
                per_group.entry(g).or_default().insert(c);
            }
        }

        let mut counts: Vec<usize> = per_group.values().map(|set| set.len()).collect();
        counts.sort_unstable();
        counts.dedup();
        Ok(counts)
    }

    pub fn geometry_info(&self) -> Result<GeometryInfo> {
        let counts = ComponentCounts {
            items: self.count_unique("i_id")?,
            faces: self.count_unique("f_id")?,
            edges: self.count_unique("e_id")?,
            vertices: self.count_unique("v_id")?,
        };

        let summary = |count: &str, group: &str| -> Result<Vec<CountBucket>> {
            Ok(summarize(&self.unique_counts_per(count, group)?))
        };

        let edges_per_face = self.unique_counts_per("e_id", "f_id")?;

        Ok(GeometryInfo {
            counts,
            faces_per_item: summary("f_id", "i_id")?,
            edges_per_item: summary("e_id", "i_id")?,
            vertices_per_item: summary("v_id", "i_id")?,
            edges_per_face: summarize(&edges_per_face),
            vertices_per_face: summary("v_id", "f_id")?,
            vertices_per_edge: summary("v_id", "e_id")?,
            face_topology: classify_faces(&edges_per_face),
        })
    }

    /// Whether both tables hold the same multiset of rows over the same
    /// columns, ignoring row and column order and the named columns.
    pub fn is_equivalent(&self, other: &GeometryTable, ignore_columns: &[&str]) -> bool {
        let kept = |table: &GeometryTable| -> Vec<String> {
            let mut names: Vec<String> = table
                .column_names()
                .into_iter()
                .filter(|name| !ignore_columns.contains(name))
                .map(str::to_string)
                .collect();
            names.sort();
            names
        };

        let names = kept(self);
        if names != kept(other) || self.len() != other.len() {
            return false;
        }

        let by: Vec<&str> = names.iter().map(String::as_str).collect();
        let (Ok(a_order), Ok(b_order)) = (self.sorted_row_order(&by), other.sorted_row_order(&by))
        else {
            return false;
        };

        by.iter().all(|name| {
            let (Some(a), Some(b)) = (self.column(name), other.column(name)) else {
                return false;
            };
            a_order
                .iter()
                .zip(&b_order)
                .all(|(&i, &j)| a[i].total_cmp(&b[j]) == Ordering::Equal && a[i] == b[j])
        })
    }
}

/// Row indices grouped by id, in first-seen order; missing ids are skipped.
fn group_rows(ids: &[Value]) -> Vec<Vec<usize>> {
    let mut index: FxHashMap<ValueKey, usize> = FxHashMap::default();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (row, id) in ids.iter().enumerate() {
        if let Some(key) = id.key() {
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(row);
        }
    }
    groups
}

fn summarize(counts: &[usize]) -> Vec<CountBucket> {
    let mut output = Vec::with_capacity(counts.len());
    for &count in counts {
        if count >= 5 {
            output.push(CountBucket::Many);
            break;
        }
        output.push(CountBucket::Exactly(count));
    }
    output
}

fn classify_faces(edges_per_face: &[usize]) -> Option<Vec<FaceTopology>> {
    let max = *edges_per_face.iter().max()?;

    let mut topology = Vec::new();
    if edges_per_face.iter().any(|&n| n == 1 || n == 2) {
        topology.push(FaceTopology::Invalid);
    }
    if edges_per_face.contains(&3) {
        topology.push(FaceTopology::Triangle);
    }
    if edges_per_face.contains(&4) {
        topology.push(FaceTopology::Quadrilateral);
    }
    if max >= 5 {
        topology.push(FaceTopology::Ngon);
    }
    topology.sort();
    Some(topology)
}
