// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structure-preserving operators: `map` (aggregate and broadcast) and
//! `expand` (row explosion).
//!
//! Both take the table by value and hand back the next version of it. On
//! error the input is consumed without a partially written column.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::naming::validate_column_name;
use crate::table::{check_values, Column, GeometryTable};
use crate::types::{ComponentType, DataType};
use crate::value::{Value, ValueKey};

/// Level whose id column partitions rows when mapping `source` data onto a
/// `target` column.
///
/// A containing target aggregates the many contained source values, so rows
/// group by the target's id. A contained target receives one broadcast value
/// from its container, so rows group by the source's id.
pub fn grouping_component(source: ComponentType, target: ComponentType) -> ComponentType {
    if source.order() < target.order() {
        source
    } else {
        target
    }
}

impl GeometryTable {
    /// Derives `target` from `source` through `aggregator`.
    ///
    /// Rows are grouped by the id column chosen by [`grouping_component`];
    /// `aggregator` receives each group's source values in row order and its
    /// result is coerced to the target's dtype (unless untyped) and written
    /// to every row of the group.
    ///
    /// ```rust,ignore
    /// // number of distinct vertices per face, broadcast to each face row
    /// let table = table.map("v_id", "f_i_vertex_count", |ids| {
    ///     let mut ids = ids.to_vec();
    ///     ids.sort_by(Value::total_cmp);
    ///     ids.dedup();
    ///     Value::from(ids.len())
    /// })?;
    /// ```
    pub fn map<F>(mut self, source: &str, target: &str, aggregator: F) -> Result<Self>
    where
        F: Fn(&[Value]) -> Value,
    {
        let source_schema = validate_column_name(source)?;
        let target_schema = validate_column_name(target)?;

        let grouping = grouping_component(source_schema.component, target_schema.component);
        let id_column = grouping.id_column();

        let ids = self.require_column(id_column)?;
        let values = self.require_column(source)?;

        // Source and id column may be the same column; values are copied
        // into the groups, so the key survives aggregation.
        let mut index: FxHashMap<ValueKey, usize> = FxHashMap::default();
        let mut groups: Vec<Vec<Value>> = Vec::new();
        let mut group_of_row = Vec::with_capacity(ids.len());

        for (id, value) in ids.iter().zip(values) {
            let key = id.key().ok_or_else(|| {
                Error::Type(format!(
                    "Cannot map to column of {} component type because {} column contains null values.",
                    grouping.fullname(),
                    id_column
                ))
            })?;
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(value.clone());
            group_of_row.push(slot);
        }

        let dtype = target_schema.dtype;
        let lookup = groups
            .iter()
            .map(|group| {
                let aggregated = aggregator(group);
                if dtype == DataType::Untyped {
                    return Ok(aggregated);
                }
                let shown = aggregated.to_string();
                dtype.coerce(aggregated).ok_or_else(|| {
                    Error::Type(format!(
                        "Aggregated value {} cannot be coerced to {} for column {}",
                        shown,
                        dtype.fullname(),
                        target
                    ))
                })
            })
            .collect::<Result<Vec<Value>>>()?;

        let column: Vec<Value> = group_of_row.iter().map(|&g| lookup[g].clone()).collect();
        check_values(target, dtype, &column)?;

        tracing::debug!(
            source,
            target,
            id_column,
            groups = groups.len(),
            "mapped column"
        );

        self.set_column(target, column)?;
        Ok(self)
    }

    /// Explodes each `source` cell into one row per element returned by
    /// `expander`, renaming `source` to `target`.
    ///
    /// Before expansion `id_column` (which must be integer typed) is set to
    /// each row's original index, so every output row records the row it
    /// came from, so it must not name `source`. All other cells are copied
    /// from the parent row. The whole table is validated afterwards.
    pub fn expand<F>(
        mut self,
        source: &str,
        target: &str,
        id_column: &str,
        expander: F,
    ) -> Result<Self>
    where
        F: Fn(&Value) -> Vec<Value>,
    {
        validate_column_name(source)?;
        validate_column_name(target)?;
        let id_schema = validate_column_name(id_column)?;

        if id_schema.dtype != DataType::Integer {
            return Err(Error::Type(format!(
                "Id column must be of dtype integer. Provided dtype: {}.",
                id_schema.dtype.fullname()
            )));
        }

        if id_column == source {
            return Err(Error::DuplicateColumn(id_column.to_string()));
        }

        let row_ids = (0..self.rows).map(Value::from).collect();
        self.set_column(id_column, row_ids)?;

        let source_index = self
            .position(source)
            .ok_or_else(|| Error::ColumnNotFound(source.to_string()))?;
        if target != source && self.has_column(target) {
            return Err(Error::DuplicateColumn(target.to_string()));
        }

        let expansions: Vec<Vec<Value>> = self.columns[source_index]
            .values()
            .iter()
            .map(&expander)
            .collect();
        let rows = expansions.iter().map(Vec::len).sum();

        let columns = std::mem::take(&mut self.columns)
            .into_iter()
            .enumerate()
            .map(|(index, column)| {
                if index == source_index {
                    return Column::new(target, expansions.iter().flatten().cloned().collect());
                }
                let name = column.name().to_string();
                let values = column
                    .values()
                    .iter()
                    .zip(&expansions)
                    .flat_map(|(value, elements)| std::iter::repeat(value).take(elements.len()))
                    .cloned()
                    .collect();
                Column::new(name, values)
            })
            .collect();

        tracing::debug!(source, target, id_column, from = self.rows, to = rows, "expanded rows");

        self.columns = columns;
        self.rows = rows;
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{quadrilateral, two_faces};

    fn mean(values: &[Value]) -> Value {
        let nums: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
        Value::Float(nums.iter().sum::<f64>() / nums.len() as f64)
    }

    #[test]
    fn grouping_prefers_the_containing_level() {
        use ComponentType::*;
        assert_eq!(grouping_component(Vertex, Face), Face);
        assert_eq!(grouping_component(Face, Vertex), Face);
        assert_eq!(grouping_component(Edge, Edge), Edge);
        assert_eq!(grouping_component(Item, Edge), Item);
    }

    #[test]
    fn map_constant_onto_vertices() {
        let table = quadrilateral()
            .map("v_id", "v_i_foo", |_| Value::Integer(27))
            .unwrap();
        assert_eq!(table.column("v_i_foo").unwrap(), vec![Value::Integer(27); 8].as_slice());
    }

    #[test]
    fn map_id_onto_itself_keeps_the_key() {
        let table = quadrilateral()
            .map("v_id", "v_i_bar", |ids| ids[0].clone())
            .unwrap();
        assert_eq!(table.column("v_i_bar").unwrap(), table.column("v_id").unwrap());
        assert!(table.has_column("v_id"));
        assert_eq!(table.num_columns(), 8);
    }

    #[test]
    fn map_mean_is_coerced_to_integer() {
        let table = quadrilateral().map("f_id", "f_i_mean", mean).unwrap();
        assert_eq!(table.column("f_i_mean").unwrap(), table.column("f_id").unwrap());
    }

    #[test]
    fn map_vertices_to_faces_aggregates_per_face() {
        let table = two_faces()
            .map("v_x", "f_f_mean_x", mean)
            .unwrap();
        let column = table.column("f_f_mean_x").unwrap();
        // face 0 spans x in {0, 1, 2}, face 1 spans x in {3, 4, 5}
        assert_eq!(column[0], Value::Float(1.0));
        assert_eq!(column[5], Value::Float(1.0));
        assert_eq!(column[6], Value::Float(4.0));
        assert_eq!(column[11], Value::Float(4.0));
    }

    #[test]
    fn map_faces_to_vertices_broadcasts() {
        let table = two_faces()
            .map("f_id", "f_s_label", |ids| Value::from(format!("face-{}", ids[0])))
            .unwrap()
            .map("f_s_label", "v_s_label", |labels| labels[0].clone())
            .unwrap();
        let labels = table.column("v_s_label").unwrap();
        assert_eq!(labels[0], Value::from("face-0"));
        assert_eq!(labels[11], Value::from("face-1"));
    }

    #[test]
    fn map_rejects_missing_grouping_ids() {
        let mut table = quadrilateral();
        let mut ids = table.column("v_id").unwrap().to_vec();
        ids[2] = Value::Null;
        table.set_column("v_id", ids).unwrap();

        let err = table.clone().map("v_id", "v_i_foo", |_| Value::Integer(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot map to column of vertex component type because v_id column contains null values."
        );

        let mut ids = table.column("f_id").unwrap().to_vec();
        ids[0] = Value::Null;
        table.set_column("f_id", ids).unwrap();
        let err = table.map("f_id", "f_i_foo", |_| Value::Integer(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot map to column of face component type because f_id column contains null values."
        );
    }

    #[test]
    fn map_rejects_uncoercible_aggregate() {
        let err = quadrilateral()
            .map("v_id", "v_i_foo", |ids| Value::List(ids.to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::Type(_)));

        let table = quadrilateral()
            .map("v_id", "v_x_foo", |ids| Value::List(ids.to_vec()))
            .unwrap();
        assert_eq!(
            table.get(0, "v_x_foo"),
            Some(&Value::List(vec![Value::Integer(0), Value::Integer(0)]))
        );
    }

    #[test]
    fn map_rejects_bad_names() {
        assert!(matches!(
            quadrilateral().map("bad_source", "v_i_foo", |_| Value::Null),
            Err(Error::Naming(_))
        ));
        assert!(matches!(
            quadrilateral().map("v_id", "q_i_foo", |_| Value::Null),
            Err(Error::Naming(_))
        ));
    }

    #[test]
    fn map_aggregates_in_first_seen_order() {
        let table = quadrilateral()
            .map("v_id", "f_x_order", |ids| Value::List(ids.to_vec()))
            .unwrap();
        let expected: Vec<Value> = [0, 1, 1, 2, 2, 3, 3, 0].into_iter().map(Value::from).collect();
        assert_eq!(table.get(4, "f_x_order"), Some(&Value::List(expected)));
    }

    #[test]
    fn expand_characters_into_rows() {
        let mut table = quadrilateral();
        let mut words = vec![Value::from("abc"); table.len()];
        words[0] = Value::from("qwerty");
        table.set_column("v_x_foo", words).unwrap();
        let input_rows = table.len();

        let table = table
            .expand("v_x_foo", "v_s_foo", "v_i_foo_id", |word| {
                word.as_str()
                    .unwrap_or_default()
                    .chars()
                    .map(|c| Value::from(c.to_string()))
                    .collect()
            })
            .unwrap();

        assert_eq!(table.len(), input_rows * 3 + 3);
        for (i, c) in "qwerty".chars().enumerate() {
            assert_eq!(table.get(i, "v_s_foo"), Some(&Value::from(c.to_string())));
            assert_eq!(table.get(i, "v_i_foo_id"), Some(&Value::Integer(0)));
        }
        let last = table.len() - 1;
        assert_eq!(table.get(last, "v_s_foo"), Some(&Value::from("c")));
        assert_eq!(
            table.get(last, "v_i_foo_id"),
            Some(&Value::Integer(input_rows as i64 - 1))
        );
        assert!(!table.has_column("v_x_foo"));
        assert_eq!(table.column_names()[7], "v_s_foo");
        assert_eq!(table.column_names()[8], "v_i_foo_id");
    }

    #[test]
    fn expand_validates_arguments() {
        let table = quadrilateral();
        assert!(matches!(
            table.clone().expand("bad_source", "v_x_foo", "v_i_foo", |v| vec![v.clone()]),
            Err(Error::Naming(_))
        ));
        assert!(matches!(
            table.clone().expand("v_id", "bad_target", "v_i_foo", |v| vec![v.clone()]),
            Err(Error::Naming(_))
        ));
        let err = table
            .expand("v_id", "v_i_foo", "v_j_foo", |v| vec![v.clone()])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Id column must be of dtype integer. Provided dtype: json."
        );
    }

    #[test]
    fn expand_keeps_source_apart_from_row_ids() {
        let mut table = quadrilateral();
        let values: Vec<Value> = (0..table.len()).map(|i| Value::from(i as i64 * 10)).collect();
        table.set_column("v_i_foo", values).unwrap();

        let err = table
            .expand("v_i_foo", "v_i_bar", "v_i_foo", |v| vec![v.clone(), v.clone()])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(ref c) if c == "v_i_foo"));
    }

    #[test]
    fn expand_revalidates_target_dtype() {
        let err = quadrilateral()
            .expand("v_x", "v_i_x", "v_i_row", |x| vec![x.clone()])
            .unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn expand_can_drop_rows() {
        let table = quadrilateral()
            .expand("v_id", "v_i_kept", "v_i_row", |id| {
                if id.as_i64() == Some(0) {
                    Vec::new()
                } else {
                    vec![id.clone()]
                }
            })
            .unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(0, "v_i_row"), Some(&Value::Integer(1)));
    }
}
