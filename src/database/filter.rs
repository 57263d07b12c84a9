use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::entity::TableDef;
use crate::database::manager::DatabaseError;

/// Parameterized SQL with its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Right-hand side of a column equality
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Null,
    Uuid(Uuid),
    Text(String),
}

impl FilterValue {
    /// The value as stored in a JSON row and bound as a SQL parameter
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Null => Value::Null,
            FilterValue::Uuid(id) => Value::String(id.to_string()),
            FilterValue::Text(text) => Value::String(text.clone()),
        }
    }
}

impl From<Uuid> for FilterValue {
    fn from(id: Uuid) -> Self {
        FilterValue::Uuid(id)
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Null, Into::into)
    }
}

/// Conjunction of column equality conditions. A null value matches NULL columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, FilterValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::new().eq("id", id)
    }

    pub fn eq(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, FilterValue)] {
        &self.conditions
    }

    /// Reject columns the table does not declare
    pub fn validate(&self, table: &TableDef) -> Result<(), DatabaseError> {
        for (column, _) in &self.conditions {
            if table.column(column).is_none() {
                return Err(DatabaseError::QueryError(format!(
                    "Unknown column '{}' on table '{}'",
                    column, table.name
                )));
            }
        }
        Ok(())
    }

    /// Evaluate against a JSON row
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column).unwrap_or(&Value::Null) == &value.to_json())
    }

    /// Build the WHERE clause; placeholders are numbered from `first_param`
    pub fn to_where_sql(
        &self,
        table: &TableDef,
        first_param: usize,
    ) -> Result<SqlResult, DatabaseError> {
        self.validate(table)?;

        if self.conditions.is_empty() {
            return Ok(SqlResult {
                query: String::new(),
                params: vec![],
            });
        }

        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::new();

        for (name, value) in &self.conditions {
            let column = table
                .column(name)
                .ok_or_else(|| DatabaseError::QueryError(format!("Unknown column '{}'", name)))?;

            if *value == FilterValue::Null {
                clauses.push(format!("\"{}\" IS NULL", column.name));
            } else {
                params.push(value.to_json());
                clauses.push(format!(
                    "\"{}\" = ${}::{}",
                    column.name,
                    first_param + params.len() - 1,
                    column.sql_type
                ));
            }
        }

        Ok(SqlResult {
            query: format!(" WHERE {}", clauses.join(" AND ")),
            params,
        })
    }

    /// Full SELECT statement for the table
    pub fn to_select_sql(&self, table: &TableDef) -> Result<SqlResult, DatabaseError> {
        let where_sql = self.to_where_sql(table, 1)?;
        Ok(SqlResult {
            query: format!("SELECT * FROM \"{}\"{}", table.name, where_sql.query),
            params: where_sql.params,
        })
    }
}
