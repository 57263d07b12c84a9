use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};
use uuid::Uuid;

/// Behaviour of a foreign key when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    NoAction,
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    /// Postgres type used to cast bound parameters
    pub sql_type: &'static str,
}

#[derive(Debug)]
pub struct ForeignKey {
    pub column: &'static str,
    pub table: &'static str,
    pub on_delete: OnDelete,
}

/// Columns that must be unique together
#[derive(Debug)]
pub struct UniqueKey {
    pub columns: &'static [&'static str],
    /// Text values compare lowercased, like a `LOWER(column)` index
    pub ignore_case: bool,
}

impl UniqueKey {
    pub const fn exact(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            ignore_case: false,
        }
    }

    pub const fn ignore_case(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            ignore_case: true,
        }
    }
}

/// Static description of a persisted table. The first column is the `id` primary key.
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub unique: &'static [UniqueKey],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// A row type the stores know how to persist
pub trait Entity:
    Clone + Serialize + DeserializeOwned + for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static
{
    const TABLE: &'static TableDef;

    fn id(&self) -> Uuid;
}

#[cfg(test)]
mod tests {
    use crate::database::models::{Account, Role};

    use super::*;

    #[test]
    fn looks_up_columns() {
        let table = Account::TABLE;
        assert_eq!(table.column("role_id").map(|c| c.sql_type), Some("uuid"));
        assert!(table.column("password").is_none());
    }

    #[test]
    fn account_names_are_unique_ignoring_case() {
        let username = Account::TABLE
            .unique
            .iter()
            .find(|key| key.columns == ["username"])
            .unwrap();
        assert!(username.ignore_case);
        assert!(!Role::TABLE.unique.is_empty());
    }

    #[test]
    fn id_is_first_column() {
        assert_eq!(Role::TABLE.columns[0].name, "id");
        assert_eq!(Account::TABLE.columns[0].name, "id");
    }
}
