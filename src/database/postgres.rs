use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgArguments, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::entity::{Entity, TableDef};
use crate::database::filter::{Filter, SqlResult};
use crate::database::manager::DatabaseError;
use crate::database::store::{Store, UnitOfWork};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// One Postgres transaction; rolled back on drop unless committed
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    type UnitOfWork = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, DatabaseError> {
        let tx = self.pool.begin().await.map_err(classify)?;
        Ok(PgUnitOfWork { tx })
    }

    async fn select<E: Entity>(&self, filter: Filter) -> Result<Vec<E>, DatabaseError> {
        let sql = filter.to_select_sql(E::TABLE)?;
        let mut q = sqlx::query_as::<_, E>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_all(&self.pool).await.map_err(classify)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert<E: Entity>(&mut self, entity: &E) -> Result<(), DatabaseError> {
        let row = to_row(entity)?;
        let sql = insert_sql(E::TABLE, &row);

        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        q.execute(&mut *self.tx).await.map_err(classify)?;
        Ok(())
    }

    async fn update<E: Entity>(&mut self, entity: &E) -> Result<(), DatabaseError> {
        let row = to_row(entity)?;
        let sql = update_sql(E::TABLE, &row);

        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q.execute(&mut *self.tx).await.map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "{} {} not found",
                E::TABLE.name,
                entity.id()
            )));
        }
        Ok(())
    }

    async fn delete<E: Entity>(&mut self, id: Uuid) -> Result<(), DatabaseError> {
        let query = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", E::TABLE.name);
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "{} {} not found",
                E::TABLE.name,
                id
            )));
        }
        Ok(())
    }

    async fn select<E: Entity>(&mut self, filter: Filter) -> Result<Vec<E>, DatabaseError> {
        let sql = filter.to_select_sql(E::TABLE)?;
        let mut q = sqlx::query_as::<_, E>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch_all(&mut *self.tx).await.map_err(classify)
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await.map_err(classify)
    }
}

fn to_row<E: Entity>(entity: &E) -> Result<Map<String, Value>, DatabaseError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!(
            "Entity for table '{}' serialized to {} instead of an object",
            E::TABLE.name,
            other
        ))),
    }
}

fn column_values(table: &TableDef, row: &Map<String, Value>) -> Vec<Value> {
    table
        .columns
        .iter()
        .map(|column| row.get(column.name).cloned().unwrap_or(Value::Null))
        .collect()
}

fn insert_sql(table: &TableDef, row: &Map<String, Value>) -> SqlResult {
    let names: Vec<String> = table
        .columns
        .iter()
        .map(|column| format!("\"{}\"", column.name))
        .collect();
    let placeholders: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("${}::{}", i + 1, column.sql_type))
        .collect();

    SqlResult {
        query: format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            table.name,
            names.join(", "),
            placeholders.join(", ")
        ),
        params: column_values(table, row),
    }
}

fn update_sql(table: &TableDef, row: &Map<String, Value>) -> SqlResult {
    // columns[0] is the primary key and becomes the last parameter
    let assignments: Vec<String> = table.columns[1..]
        .iter()
        .enumerate()
        .map(|(i, column)| format!("\"{}\" = ${}::{}", column.name, i + 1, column.sql_type))
        .collect();

    let mut params = column_values(table, row);
    let id = params.remove(0);
    params.push(id);

    SqlResult {
        query: format!(
            "UPDATE \"{}\" SET {} WHERE \"id\" = ${}::uuid",
            table.name,
            assignments.join(", "),
            table.columns.len()
        ),
        params,
    }
}

fn classify(err: sqlx::Error) -> DatabaseError {
    let code = err
        .as_database_error()
        .and_then(|db| db.code().map(|code| code.into_owned()));

    match code.as_deref() {
        Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
            DatabaseError::Constraint(err.to_string())
        }
        _ => DatabaseError::Sqlx(err),
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match v {
        Value::Null => q.bind(Option::<String>::None),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => q.bind(i),
            None => q.bind(n.as_f64()),
        },
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    match v {
        Value::Null => q.bind(Option::<String>::None),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => q.bind(i),
            None => q.bind(n.as_f64()),
        },
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::database::models::{Privilege, Role};

    use super::*;

    #[test]
    fn insert_casts_every_column() {
        let privilege = Privilege::new(None, "Home", "Index");
        let row = to_row(&privilege).unwrap();
        let sql = insert_sql(Privilege::TABLE, &row);

        assert_eq!(
            sql.query,
            "INSERT INTO \"privileges\" (\"id\", \"area\", \"controller\", \"action\") \
             VALUES ($1::uuid, $2::text, $3::text, $4::text)"
        );
        assert_eq!(
            sql.params,
            vec![json!(privilege.id), Value::Null, json!("Home"), json!("Index")]
        );
    }

    #[test]
    fn update_binds_id_last() {
        let role = Role {
            id: Uuid::new_v4(),
            name: "Editors".to_string(),
        };
        let row = to_row(&role).unwrap();
        let sql = update_sql(Role::TABLE, &row);

        assert_eq!(
            sql.query,
            "UPDATE \"roles\" SET \"name\" = $1::text WHERE \"id\" = $2::uuid"
        );
        assert_eq!(sql.params, vec![json!("Editors"), json!(role.id)]);
    }
}
