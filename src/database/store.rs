use async_trait::async_trait;
use uuid::Uuid;

use crate::database::entity::Entity;
use crate::database::filter::Filter;
use crate::database::manager::DatabaseError;

/// Repository operations staged inside one transaction.
/// Dropping a unit of work without calling `commit` discards its changes.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn insert<E: Entity>(&mut self, entity: &E) -> Result<(), DatabaseError>;

    async fn update<E: Entity>(&mut self, entity: &E) -> Result<(), DatabaseError>;

    async fn delete<E: Entity>(&mut self, id: Uuid) -> Result<(), DatabaseError>;

    async fn select<E: Entity>(&mut self, filter: Filter) -> Result<Vec<E>, DatabaseError>;

    async fn find<E: Entity>(&mut self, id: Uuid) -> Result<Option<E>, DatabaseError> {
        Ok(self.select::<E>(Filter::by_id(id)).await?.into_iter().next())
    }

    /// Durably apply every staged change at once
    async fn commit(self) -> Result<(), DatabaseError>;
}

/// Persistence boundary shared by services and the authorization provider
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type UnitOfWork: UnitOfWork + 'static;

    async fn begin(&self) -> Result<Self::UnitOfWork, DatabaseError>;

    /// Read committed rows
    async fn select<E: Entity>(&self, filter: Filter) -> Result<Vec<E>, DatabaseError>;

    async fn find<E: Entity>(&self, id: Uuid) -> Result<Option<E>, DatabaseError> {
        Ok(self.select::<E>(Filter::by_id(id)).await?.into_iter().next())
    }

    async fn ping(&self) -> Result<(), DatabaseError>;
}
