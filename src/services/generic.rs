use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::{Entity, Filter, Store, UnitOfWork};
use crate::services::error::ServiceError;
use crate::types::Operation;

/// Entity-specific work run inside (or right after) a generic write.
/// Every step defaults to doing nothing.
#[async_trait]
pub trait PersistSteps<S: Store, V: Send + Sync + 'static>: Send + Sync {
    /// After the entity row is inserted, before commit
    async fn created(&self, _uow: &mut S::UnitOfWork, _view: &V) -> Result<(), ServiceError> {
        Ok(())
    }

    /// After the entity row is updated, before commit
    async fn edited(&self, _uow: &mut S::UnitOfWork, _view: &V) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Before the entity row is deleted
    async fn deleting(&self, _uow: &mut S::UnitOfWork, _id: Uuid) -> Result<(), ServiceError> {
        Ok(())
    }

    /// After a successful commit
    async fn committed(&self, _operation: Operation) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Steps for entities without dependent rows
pub struct NoSteps;

impl<S: Store, V: Send + Sync + 'static> PersistSteps<S, V> for NoSteps {}

/// Store-backed CRUD over entity `M`, exchanged with callers as view `V`.
/// Each write runs in its own unit of work.
pub struct GenericService<S: Store, M, V: Send + Sync + 'static> {
    store: S,
    steps: Arc<dyn PersistSteps<S, V>>,
    _entity: PhantomData<fn() -> M>,
}

impl<S, M, V> GenericService<S, M, V>
where
    S: Store,
    M: Entity + for<'a> From<&'a V>,
    V: From<M> + Send + Sync + 'static,
{
    pub fn new(store: S, steps: Arc<dyn PersistSteps<S, V>>) -> Self {
        Self {
            store,
            steps,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.store.find::<M>(id).await?.is_some())
    }

    pub async fn get_views(&self) -> Result<Vec<V>, ServiceError> {
        let models: Vec<M> = self.store.select(Filter::new()).await?;
        Ok(models.into_iter().map(V::from).collect())
    }

    pub async fn get_view(&self, id: Uuid) -> Result<V, ServiceError> {
        self.store
            .find::<M>(id)
            .await?
            .map(V::from)
            .ok_or_else(|| ServiceError::not_found(format!("{} {} not found", M::TABLE.name, id)))
    }

    /// Insert the entity built from `view`; returns its id
    pub async fn create(&self, view: &V) -> Result<Uuid, ServiceError> {
        let model = M::from(view);
        let id = model.id();

        let mut uow = self.store.begin().await?;
        uow.insert(&model).await?;
        self.steps.created(&mut uow, view).await?;
        uow.commit().await?;

        tracing::info!("Created {} {}", M::TABLE.name, id);
        self.steps.committed(Operation::Create).await?;
        Ok(id)
    }

    pub async fn edit(&self, view: &V) -> Result<(), ServiceError> {
        let model = M::from(view);

        let mut uow = self.store.begin().await?;
        uow.update(&model).await?;
        self.steps.edited(&mut uow, view).await?;
        uow.commit().await?;

        tracing::info!("Updated {} {}", M::TABLE.name, model.id());
        self.steps.committed(Operation::Update).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let mut uow = self.store.begin().await?;
        self.steps.deleting(&mut uow, id).await?;
        uow.delete::<M>(id).await?;
        uow.commit().await?;

        tracing::info!("Deleted {} {}", M::TABLE.name, id);
        self.steps.committed(Operation::Delete).await?;
        Ok(())
    }
}

impl<S: Store, M, V: Send + Sync + 'static> Clone for GenericService<S, M, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            steps: self.steps.clone(),
            _entity: PhantomData,
        }
    }
}
