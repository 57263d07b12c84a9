use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::database::entity::{Entity, OnDelete, TableDef};
use crate::database::filter::Filter;
use crate::database::manager::DatabaseError;
use crate::database::models::TABLES;
use crate::database::store::{Store, UnitOfWork};

type Row = Map<String, Value>;

/// In-process store with the same key and reference rules as the Postgres schema.
/// Writers are serialized; a unit of work edits a private copy of the tables and
/// publishes it on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    committed: RwLock<Tables>,
    writer: Arc<Mutex<()>>,
}

pub struct MemoryUnitOfWork {
    inner: Arc<Inner>,
    staged: Tables,
    _writer: OwnedMutexGuard<()>,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type UnitOfWork = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, DatabaseError> {
        let writer = self.inner.writer.clone().lock_owned().await;
        let staged = self.inner.committed.read().await.clone();
        Ok(MemoryUnitOfWork {
            inner: self.inner.clone(),
            staged,
            _writer: writer,
        })
    }

    async fn select<E: Entity>(&self, filter: Filter) -> Result<Vec<E>, DatabaseError> {
        self.inner.committed.read().await.select(E::TABLE, &filter)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert<E: Entity>(&mut self, entity: &E) -> Result<(), DatabaseError> {
        let row = to_row(entity)?;
        self.staged.insert(E::TABLE, row)
    }

    async fn update<E: Entity>(&mut self, entity: &E) -> Result<(), DatabaseError> {
        let row = to_row(entity)?;
        self.staged.update(E::TABLE, row)
    }

    async fn delete<E: Entity>(&mut self, id: Uuid) -> Result<(), DatabaseError> {
        let mut next = self.staged.clone();
        next.delete(E::TABLE, &Value::String(id.to_string()))?;
        self.staged = next;
        Ok(())
    }

    async fn select<E: Entity>(&mut self, filter: Filter) -> Result<Vec<E>, DatabaseError> {
        self.staged.select(E::TABLE, &filter)
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        let MemoryUnitOfWork {
            inner,
            staged,
            _writer,
        } = self;
        *inner.committed.write().await = staged;
        Ok(())
    }
}

impl Tables {
    fn table(&self, name: &str) -> &[Row] {
        self.rows.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn select<E: Entity>(&self, table: &TableDef, filter: &Filter) -> Result<Vec<E>, DatabaseError> {
        filter.validate(table)?;
        self.table(table.name)
            .iter()
            .filter(|row| filter.matches(row))
            .map(|row| {
                serde_json::from_value(Value::Object(row.clone())).map_err(DatabaseError::from)
            })
            .collect()
    }

    fn insert(&mut self, table: &TableDef, row: Row) -> Result<(), DatabaseError> {
        let id = row_id(&row);
        if self.table(table.name).iter().any(|other| row_id(other) == id) {
            return Err(DatabaseError::Constraint(format!(
                "duplicate key value violates primary key of \"{}\"",
                table.name
            )));
        }
        self.check_row(table, &row, &id)?;
        self.rows.entry(table.name).or_default().push(row);
        Ok(())
    }

    fn update(&mut self, table: &TableDef, row: Row) -> Result<(), DatabaseError> {
        let id = row_id(&row);
        let position = self
            .table(table.name)
            .iter()
            .position(|other| row_id(other) == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} not found", table.name, id)))?;
        self.check_row(table, &row, &id)?;
        if let Some(rows) = self.rows.get_mut(table.name) {
            rows[position] = row;
        }
        Ok(())
    }

    fn delete(&mut self, table: &TableDef, id: &Value) -> Result<(), DatabaseError> {
        let exists = self.table(table.name).iter().any(|row| &row_id(row) == id);
        if !exists {
            return Err(DatabaseError::NotFound(format!("{} {} not found", table.name, id)));
        }

        for child in TABLES {
            for foreign_key in child.foreign_keys.iter().filter(|fk| fk.table == table.name) {
                let referencing: Vec<Value> = self
                    .table(child.name)
                    .iter()
                    .filter(|row| row.get(foreign_key.column) == Some(id))
                    .map(row_id)
                    .collect();

                if referencing.is_empty() {
                    continue;
                }
                match foreign_key.on_delete {
                    OnDelete::NoAction => {
                        return Err(DatabaseError::Constraint(format!(
                            "\"{}\" {} is still referenced from \"{}\".\"{}\"",
                            table.name, id, child.name, foreign_key.column
                        )));
                    }
                    OnDelete::Cascade => {
                        for child_id in &referencing {
                            self.delete(child, child_id)?;
                        }
                    }
                }
            }
        }

        if let Some(rows) = self.rows.get_mut(table.name) {
            rows.retain(|row| &row_id(row) != id);
        }
        Ok(())
    }

    /// Unique keys and foreign keys for a row about to be written
    fn check_row(&self, table: &TableDef, row: &Row, id: &Value) -> Result<(), DatabaseError> {
        for key in table.unique {
            let duplicate = self.table(table.name).iter().any(|other| {
                &row_id(other) != id
                    && key.columns.iter().all(|column| {
                        same_value(other.get(*column), row.get(*column), key.ignore_case)
                    })
            });
            if duplicate {
                return Err(DatabaseError::Constraint(format!(
                    "duplicate key value violates unique ({}) on \"{}\"",
                    key.columns.join(", "),
                    table.name
                )));
            }
        }

        for foreign_key in table.foreign_keys {
            let value = row.get(foreign_key.column).unwrap_or(&Value::Null);
            if value.is_null() {
                continue;
            }
            if !self.table(foreign_key.table).iter().any(|parent| &row_id(parent) == value) {
                return Err(DatabaseError::Constraint(format!(
                    "\"{}\".\"{}\" references missing \"{}\" {}",
                    table.name, foreign_key.column, foreign_key.table, value
                )));
            }
        }

        Ok(())
    }
}

fn same_value(a: Option<&Value>, b: Option<&Value>, ignore_case: bool) -> bool {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) if ignore_case => {
            a.to_lowercase() == b.to_lowercase()
        }
        _ => a.unwrap_or(&Value::Null) == b.unwrap_or(&Value::Null),
    }
}

fn row_id(row: &Row) -> Value {
    row.get("id").cloned().unwrap_or(Value::Null)
}

fn to_row<E: Entity>(entity: &E) -> Result<Row, DatabaseError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!(
            "Entity for table '{}' serialized to {} instead of an object",
            E::TABLE.name,
            other
        ))),
    }
}
