pub mod entity;
pub mod filter;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use entity::{Entity, TableDef};
pub use filter::{Filter, FilterValue};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, UnitOfWork};
