use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::ast::{ComparisonOp, Condition};
use crate::column::{Column, ColumnDef};
use crate::error::{Error, Result, internal};
use crate::index::Index;
use crate::row::Row;
use crate::value::Value;

/// Ordered column definitions of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Validates the definitions: at least one column, unique names, at most
    /// one primary key, and every primary key also unique.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Schema("a table needs at least one column".into()));
        }

        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(Error::Schema(format!(
                    "duplicate column name {:?}",
                    column.name
                )));
            }
            if column.primary_key && !column.unique {
                return Err(Error::Schema(format!(
                    "primary key column {:?} must be unique",
                    column.name
                )));
            }
        }

        let primary_keys = columns.iter().filter(|c| c.primary_key).count();
        if primary_keys > 1 {
            return Err(Error::Schema(format!(
                "a table can have at most one primary key, found {primary_keys}"
            )));
        }

        Ok(Self { columns })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A [Condition] checked against a table: column position and a literal
/// already coerced to the column type.
struct Predicate {
    column: usize,
    op: ComparisonOp,
    value: Value,
}

/// Rows are stored column by column; a row's identity is its position.
///
/// Every primary key and unique column carries an [Index], kept exactly in
/// sync with the rows after each public operation.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    column_names: Arc<[String]>,
    columns: Vec<Column>,
    row_count: usize,
    indexes: BTreeMap<String, Index>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Self> {
        let schema = Schema::new(columns)?;
        let storage = schema
            .columns
            .iter()
            .map(|def| Column::new(def.data_type))
            .collect();
        let indexes = schema
            .columns
            .iter()
            .filter(|def| def.is_constrained())
            .map(|def| (def.name.clone(), Index::for_column(def)))
            .collect();

        Ok(Self {
            name: name.into(),
            column_names: schema.names().into(),
            schema,
            columns: storage,
            row_count: 0,
            indexes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn index(&self, column: &str) -> Option<&Index> {
        self.indexes.get(column)
    }

    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.values()
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Row> {
        if self.row_count <= row_idx {
            return None;
        }
        let values = self
            .columns
            .iter()
            .map(|col| col.get(row_idx)) // -> Option<Value>
            .collect::<Option<Vec<_>>>()?;
        Some(Row::new(self.column_names.clone(), values))
    }

    /// Copies of every row, in position order.
    pub fn rows(&self) -> Vec<Row> {
        (0..self.row_count)
            .filter_map(|pos| self.get_row(pos))
            .collect()
    }

    fn value_at(&self, column: usize, row_idx: usize) -> Value {
        self.columns[column].get(row_idx).unwrap_or(Value::Null)
    }

    /// Inserts a row given as `(column, value)` pairs; missing columns are `NULL`.
    ///
    /// Every check runs before the table is touched, so a failed insert
    /// leaves rows and indexes unchanged.
    ///
    /// # Errors
    /// - [Error::ConstraintViolation] if the primary key is missing, or a
    ///   primary key/unique value is already taken.
    /// - [Error::Type] if a value cannot be coerced to its column type.
    /// - [Error::Column] for a column not in the schema.
    pub fn insert(&mut self, values: Vec<(String, Value)>) -> Result<Row> {
        let row = Row::from_pairs(self.column_names.clone(), values)?;

        if let Some(pk) = self.schema.primary_key() {
            if row.get(&pk.name).is_none_or(Value::is_null) {
                return Err(Error::ConstraintViolation {
                    column: pk.name.clone(),
                    reason: "primary key requires a value".into(),
                });
            }
        }

        let mut values = row.into_values();
        for (def, value) in self.schema.columns.iter().zip(values.iter_mut()) {
            *value = def.prepare(std::mem::replace(value, Value::Null))?;
        }

        for (def, value) in self.schema.columns.iter().zip(values.iter()) {
            if value.is_null() {
                continue;
            }
            if let Some(index) = self.indexes.get(&def.name) {
                if index.has(value) {
                    return Err(index.duplicate(value));
                }
            }
        }

        let pos = self.row_count;
        for (column, value) in self.columns.iter_mut().zip(values.iter()) {
            column.push(value.clone())?;
        }
        self.row_count += 1;

        for (def, value) in self.schema.columns.iter().zip(values.iter()) {
            if let Some(index) = self.indexes.get_mut(&def.name) {
                index.add(value, pos)?;
            }
        }

        trace!(table = %self.name, pos, "row inserted");
        Ok(Row::new(self.column_names.clone(), values))
    }

    /// Checks a condition's column against this table and coerces its literal.
    fn predicate(&self, condition: &Condition) -> Result<Predicate> {
        let name = condition.column.column_in(&self.name).ok_or_else(|| {
            Error::Column(format!(
                "column {} does not belong to table {:?}",
                condition.column, self.name
            ))
        })?;
        let column = self.schema.position(name).ok_or_else(|| {
            Error::Column(format!(
                "unknown column {name:?} in table {:?}",
                self.name
            ))
        })?;
        let def = &self.schema.columns[column];
        let value = def
            .data_type
            .coerce(condition.value.clone())
            .map_err(|reason| Error::Type {
                column: def.name.clone(),
                reason,
            })?;

        Ok(Predicate {
            column,
            op: condition.op,
            value,
        })
    }

    fn matches(&self, predicate: &Predicate, row_idx: usize) -> bool {
        predicate
            .op
            .evaluate(&self.value_at(predicate.column, row_idx), &predicate.value)
    }

    /// Rows matching `condition`, or every row when there is none.
    ///
    /// Equality on an indexed column is answered by the index, anything else
    /// by a full scan.
    pub fn find(&self, condition: Option<&Condition>) -> Result<Vec<Row>> {
        let Some(condition) = condition else {
            return Ok(self.rows());
        };
        let predicate = self.predicate(condition)?;

        if predicate.op == ComparisonOp::Eq {
            let column = &self.schema.columns[predicate.column].name;
            if let Some(index) = self.indexes.get(column) {
                debug!(table = %self.name, %column, "index lookup");
                return Ok(index
                    .find(&predicate.value)
                    .into_iter()
                    .filter_map(|pos| self.get_row(pos))
                    .collect());
            }
        }

        Ok(self.scan_predicate(&predicate))
    }

    /// Same as [Table::find] but never uses an index.
    pub fn scan(&self, condition: Option<&Condition>) -> Result<Vec<Row>> {
        match condition {
            Some(condition) => {
                let predicate = self.predicate(condition)?;
                Ok(self.scan_predicate(&predicate))
            }
            None => Ok(self.rows()),
        }
    }

    fn scan_predicate(&self, predicate: &Predicate) -> Vec<Row> {
        (0..self.row_count)
            .filter(|pos| self.matches(predicate, *pos))
            .filter_map(|pos| self.get_row(pos))
            .collect()
    }

    /// Sets `updates` on every row matching `condition` and returns how many
    /// rows matched.
    ///
    /// Values are coerced and validated, and the post-update occupancy of every
    /// changed primary key/unique column is checked, before any row changes.
    pub fn update(
        &mut self,
        updates: Vec<(String, Value)>,
        condition: Option<&Condition>,
    ) -> Result<usize> {
        let mut assignments: Vec<(usize, Value)> = Vec::with_capacity(updates.len());
        for (name, value) in updates {
            let column = self.schema.position(&name).ok_or_else(|| {
                Error::Column(format!(
                    "unknown column {name:?} in table {:?}",
                    self.name
                ))
            })?;
            if assignments.iter().any(|(c, _)| *c == column) {
                return Err(Error::Column(format!("column {name:?} assigned more than once")));
            }
            let def = &self.schema.columns[column];
            let value = def.prepare(value)?;
            if def.primary_key && value.is_null() {
                return Err(Error::ConstraintViolation {
                    column: def.name.clone(),
                    reason: "primary key requires a value".into(),
                });
            }
            assignments.push((column, value));
        }

        let predicate = condition.map(|c| self.predicate(c)).transpose()?;
        let matched: Vec<usize> = (0..self.row_count)
            .filter(|pos| predicate.as_ref().is_none_or(|p| self.matches(p, *pos)))
            .collect();

        for (column, value) in &assignments {
            let def = &self.schema.columns[*column];
            if value.is_null() {
                continue;
            }
            let Some(index) = self.indexes.get(&def.name) else {
                continue;
            };
            let changing = matched
                .iter()
                .any(|pos| self.value_at(*column, *pos) != *value);
            if !changing {
                continue;
            }
            let kept = index
                .find(value)
                .into_iter()
                .filter(|pos| matched.binary_search(pos).is_err())
                .count();
            if kept + matched.len() > 1 {
                return Err(index.duplicate(value));
            }
        }

        for &pos in &matched {
            for (column, value) in &assignments {
                let old = self.value_at(*column, pos);
                if old == *value {
                    continue;
                }
                self.columns[*column].set(pos, value)?;
                if let Some(index) = self.indexes.get_mut(&self.schema.columns[*column].name) {
                    index.update(&old, value, pos)?;
                }
            }
        }

        debug!(table = %self.name, rows = matched.len(), "rows updated");
        Ok(matched.len())
    }

    /// Deletes the rows matching `condition` (every row when there is none)
    /// and returns how many were removed.
    pub fn delete(&mut self, condition: Option<&Condition>) -> Result<usize> {
        let Some(condition) = condition else {
            let deleted = self.row_count;
            self.columns.iter_mut().for_each(Column::clear);
            self.indexes.values_mut().for_each(Index::clear);
            self.row_count = 0;
            return Ok(deleted);
        };

        let predicate = self.predicate(condition)?;
        let mut deleted = 0;
        // Walk backwards so removing a row never shifts one still to visit.
        for pos in (0..self.row_count).rev() {
            if !self.matches(&predicate, pos) {
                continue;
            }
            for column in &mut self.columns {
                column.remove(pos)?;
            }
            self.row_count -= 1;
            deleted += 1;
        }

        if deleted > 0 {
            self.rebuild_indexes()?;
        }
        debug!(table = %self.name, rows = deleted, "rows deleted");
        Ok(deleted)
    }

    /// Recomputes every index from the current row positions.
    fn rebuild_indexes(&mut self) -> Result<()> {
        for index in self.indexes.values_mut() {
            let position = self.schema.position(index.column()).ok_or_else(|| {
                internal!("index on missing column {:?}", index.column())
            })?;
            let column = &self.columns[position];
            index.rebuild((0..self.row_count).map(|pos| column.get(pos).unwrap_or(Value::Null)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::error::ErrorKind;

    /// Every index bucket points at exactly the rows holding its value.
    pub(crate) fn assert_indexes_consistent(table: &Table) {
        for index in table.indexes() {
            let rows = table.rows();
            assert_eq!(index.len(), rows.len(), "index {}", index.column());
            for (pos, row) in rows.iter().enumerate() {
                let value = row.get(index.column()).unwrap();
                assert!(index.find(value).contains(&pos));
            }
            for (value, positions) in index.entries() {
                for pos in positions {
                    assert_eq!(rows[*pos].get(index.column()), Some(&value));
                }
            }
        }
    }

    fn pairs(values: &[(&str, Value)]) -> Vec<(String, Value)> {
        values
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn users() -> Table {
        Table::new(
            "users",
            vec![
                ColumnDef::new("id", DataType::Int).primary_key(),
                ColumnDef::new("name", DataType::Text),
                ColumnDef::new("email", DataType::Text).unique(),
            ],
        )
        .unwrap()
    }

    fn insert_user(table: &mut Table, id: i64, name: &str, email: &str) -> Result<Row> {
        table.insert(pairs(&[
            ("id", Value::Int(id)),
            ("name", name.into()),
            ("email", email.into()),
        ]))
    }

    #[test]
    fn test_schema_validation() {
        assert_eq!(
            Table::new("t", vec![]).unwrap_err().kind(),
            ErrorKind::Schema
        );

        let dup = Table::new(
            "t",
            vec![
                ColumnDef::new("a", DataType::Int),
                ColumnDef::new("a", DataType::Text),
            ],
        );
        assert_eq!(dup.unwrap_err().kind(), ErrorKind::Schema);

        let two_pks = Table::new(
            "t",
            vec![
                ColumnDef::new("a", DataType::Int).primary_key(),
                ColumnDef::new("b", DataType::Int).primary_key(),
            ],
        );
        assert_eq!(two_pks.unwrap_err().kind(), ErrorKind::Schema);

        let mut not_unique = ColumnDef::new("a", DataType::Int);
        not_unique.primary_key = true;
        assert_eq!(
            Table::new("t", vec![not_unique]).unwrap_err().kind(),
            ErrorKind::Schema
        );
    }

    #[test]
    fn test_indexes_created_for_constrained_columns() {
        let table = users();
        assert!(table.index("id").unwrap().is_primary_key());
        assert!(table.index("email").unwrap().is_unique());
        assert!(table.index("name").is_none());
    }

    #[test]
    fn test_insert_returns_copy() {
        let mut table = users();
        let row = insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();

        assert_eq!(row.get("id"), Some(&Value::Int(1)));
        assert_eq!(row.get("name"), Some(&"Alice".into()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_row(0), Some(row));
    }

    #[test]
    fn test_insert_missing_columns_are_null() {
        let mut table = users();
        let row = table.insert(pairs(&[("id", Value::Int(7))])).unwrap();
        assert_eq!(row.get("name"), Some(&Value::Null));
        assert_eq!(row.get("email"), Some(&Value::Null));
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_insert_requires_primary_key() {
        let mut table = users();
        let err = table.insert(pairs(&[("name", "x".into())])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

        let err = table
            .insert(pairs(&[("id", Value::Null), ("name", "x".into())]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_primary_key_leaves_table_unchanged() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();

        let err = insert_user(&mut table, 1, "Bob", "b@x.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert!(err.to_string().contains("duplicate primary key"));
        assert_eq!(table.len(), 1);
        assert!(!table.index("email").unwrap().has(&"b@x.com".into()));
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_duplicate_unique_value() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();

        let err = insert_user(&mut table, 2, "Bob", "a@x.com").unwrap_err();
        assert!(err.to_string().contains("duplicate unique value"));
        assert_eq!(table.len(), 1);
        assert!(!table.index("id").unwrap().has(&Value::Int(2)));
    }

    #[test]
    fn test_unique_allows_many_nulls() {
        let mut table = users();
        table.insert(pairs(&[("id", Value::Int(1))])).unwrap();
        table.insert(pairs(&[("id", Value::Int(2))])).unwrap();
        assert_eq!(table.index("email").unwrap().find(&Value::Null), vec![0, 1]);
    }

    #[test]
    fn test_insert_coerces_and_rejects() {
        let mut table = users();
        let row = table
            .insert(pairs(&[("id", "12".into()), ("name", Value::Int(5))]))
            .unwrap();
        assert_eq!(row.get("id"), Some(&Value::Int(12)));
        assert_eq!(row.get("name"), Some(&"5".into()));

        let err = table.insert(pairs(&[("id", "twelve".into())])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = table
            .insert(pairs(&[("id", Value::Int(3)), ("age", Value::Int(3))]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Column);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_find_by_index_and_scan_agree() {
        let mut table = users();
        for id in 0..20 {
            insert_user(&mut table, id, &format!("user{}", id % 3), &format!("u{id}@x.com"))
                .unwrap();
        }

        let by_id = Condition::new("id", ComparisonOp::Eq, 7);
        assert_eq!(table.find(Some(&by_id)).unwrap(), table.scan(Some(&by_id)).unwrap());
        assert_eq!(table.find(Some(&by_id)).unwrap().len(), 1);

        let by_email = Condition::new("email", ComparisonOp::Eq, "u3@x.com");
        assert_eq!(
            table.find(Some(&by_email)).unwrap(),
            table.scan(Some(&by_email)).unwrap()
        );

        let missing = Condition::new("id", ComparisonOp::Eq, 99);
        assert!(table.find(Some(&missing)).unwrap().is_empty());
    }

    #[test]
    fn test_find_scan_operators() {
        let mut table = users();
        for id in 1..=5 {
            insert_user(&mut table, id, "n", &format!("{id}@x")).unwrap();
        }

        let count = |op, v: i64| {
            table
                .find(Some(&Condition::new("id", op, v)))
                .unwrap()
                .len()
        };
        assert_eq!(count(ComparisonOp::Gt, 3), 2);
        assert_eq!(count(ComparisonOp::GtEq, 3), 3);
        assert_eq!(count(ComparisonOp::Lt, 3), 2);
        assert_eq!(count(ComparisonOp::LtEq, 3), 3);
        assert_eq!(count(ComparisonOp::NotEq, 3), 4);
    }

    #[test]
    fn test_find_unknown_column() {
        let table = users();
        let err = table
            .find(Some(&Condition::new("age", ComparisonOp::Eq, 1)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Column);
    }

    #[test]
    fn test_update_changes_rows_and_indexes() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();
        insert_user(&mut table, 2, "Bob", "b@x.com").unwrap();

        let count = table
            .update(
                pairs(&[("email", "c@x.com".into()), ("name", "Al".into())]),
                Some(&Condition::new("id", ComparisonOp::Eq, 1)),
            )
            .unwrap();

        assert_eq!(count, 1);
        let row = table.get_row(0).unwrap();
        assert_eq!(row.get("name"), Some(&"Al".into()));
        assert!(!table.index("email").unwrap().has(&"a@x.com".into()));
        assert_eq!(table.index("email").unwrap().find(&"c@x.com".into()), vec![0]);
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_update_invalid_value_touches_nothing() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();

        let err = table
            .update(
                pairs(&[("name", "Zed".into()), ("id", "abc".into())]),
                Some(&Condition::new("id", ComparisonOp::Eq, 1)),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(table.get_row(0).unwrap().get("name"), Some(&"Alice".into()));
    }

    #[test]
    fn test_update_unique_conflict() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();
        insert_user(&mut table, 2, "Bob", "b@x.com").unwrap();

        let err = table
            .update(
                pairs(&[("email", "a@x.com".into())]),
                Some(&Condition::new("id", ComparisonOp::Eq, 2)),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(table.get_row(1).unwrap().get("email"), Some(&"b@x.com".into()));
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_update_multi_row_unique_conflict_is_atomic() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();
        insert_user(&mut table, 2, "Bob", "b@x.com").unwrap();

        let err = table
            .update(
                pairs(&[("email", "same@x.com".into())]),
                Some(&Condition::new("id", ComparisonOp::Gt, 0)),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(table.get_row(0).unwrap().get("email"), Some(&"a@x.com".into()));
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_update_to_own_value_is_allowed() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();

        let count = table
            .update(
                pairs(&[("email", "a@x.com".into())]),
                Some(&Condition::new("id", ComparisonOp::Eq, 1)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_delete_reindexes_positions() {
        let mut table = users();
        for id in 1..=6 {
            insert_user(&mut table, id, "n", &format!("{id}@x")).unwrap();
        }

        let deleted = table
            .delete(Some(&Condition::new("id", ComparisonOp::LtEq, 3)))
            .unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(table.len(), 3);
        assert_eq!(table.index("id").unwrap().find(&Value::Int(4)), vec![0]);
        assert_eq!(table.index("email").unwrap().find(&"6@x".into()), vec![2]);
        assert_indexes_consistent(&table);

        // Freed keys can be reused.
        insert_user(&mut table, 1, "again", "1@x").unwrap();
        assert_indexes_consistent(&table);
    }

    #[test]
    fn test_delete_without_condition_clears() {
        let mut table = users();
        insert_user(&mut table, 1, "Alice", "a@x.com").unwrap();
        insert_user(&mut table, 2, "Bob", "b@x.com").unwrap();

        assert_eq!(table.delete(None).unwrap(), 2);
        assert!(table.is_empty());
        assert!(table.indexes().all(Index::is_empty));
    }

    #[test]
    fn test_mixed_operations_keep_indexes_consistent() {
        let mut table = users();
        for id in 0..30 {
            insert_user(&mut table, id, "n", &format!("{id}@x")).unwrap();
        }
        table
            .delete(Some(&Condition::new("id", ComparisonOp::Gt, 20)))
            .unwrap();
        table
            .update(
                pairs(&[("email", Value::Null)]),
                Some(&Condition::new("id", ComparisonOp::Lt, 5)),
            )
            .unwrap();
        table
            .delete(Some(&Condition::new("email", ComparisonOp::Eq, Value::Null)))
            .unwrap();
        table
            .update(
                pairs(&[("id", Value::Int(100))]),
                Some(&Condition::new("id", ComparisonOp::Eq, 10)),
            )
            .unwrap();

        assert_eq!(table.len(), 16);
        assert_indexes_consistent(&table);
    }
}
