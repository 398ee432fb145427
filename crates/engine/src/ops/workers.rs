//! Worker repository: scoped CRUD with soft-archive.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, EntityStatus, ResultEngine, Topic, Worker, WorkerPatch, workers,
    workers::NewWorker,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Active workers of the current tenant. Empty while no tenant is
    /// resolved, so UI lists render empty instead of failing.
    pub async fn list_workers(&self) -> ResultEngine<Vec<Worker>> {
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };
        let models = workers::Entity::find()
            .filter(workers::Column::OwnerId.eq(tenant.owner_id))
            .filter(workers::Column::Status.eq(EntityStatus::Active.as_str()))
            .all(&self.database)
            .await?;
        models.into_iter().map(Worker::try_from).collect()
    }

    /// Direct lookup by id, archived included: historical ledger entries
    /// must still resolve the worker's name.
    pub async fn worker(&self, worker_id: Uuid) -> ResultEngine<Worker> {
        let Some(tenant) = self.tenant() else {
            return Err(EngineError::EntityNotFound("worker".to_string()));
        };
        let model = workers::Entity::find_by_id(worker_id.to_string())
            .filter(workers::Column::OwnerId.eq(tenant.owner_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::EntityNotFound("worker".to_string()))?;
        Worker::try_from(model)
    }

    /// Create a worker with a zero balance. The owner is the resolved
    /// tenant, never a caller-supplied id.
    pub async fn add_worker(&self, new: NewWorker) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let name = normalize_required_text(&new.name, "worker name")?;
        let surname = normalize_required_text(&new.surname, "worker surname")?;

        let worker = Worker::new(name, surname, tenant.owner_id);
        let worker_id = worker.id;
        workers::ActiveModel::from(&worker)
            .insert(&self.database)
            .await?;
        tracing::debug!(%worker_id, "worker created");
        self.publish(&[Topic::Workers]);
        Ok(worker_id)
    }

    /// Patch name fields. The patch type has no balance or status field, so
    /// those stay out of reach by construction.
    pub async fn update_worker(&self, worker_id: Uuid, patch: WorkerPatch) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        if patch.is_empty() {
            return Err(EngineError::Validation("empty patch".to_string()));
        }

        with_tx!(self, |db_tx| {
            workers::Entity::find_by_id(worker_id.to_string())
                .filter(workers::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("worker".to_string()))?;

            let mut active = workers::ActiveModel {
                id: ActiveValue::Set(worker_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_text(&name, "worker name")?);
            }
            if let Some(surname) = patch.surname {
                active.surname =
                    ActiveValue::Set(normalize_required_text(&surname, "worker surname")?);
            }
            active.update(&db_tx).await?;
            Ok(())
        })?;
        self.publish(&[Topic::Workers]);
        Ok(())
    }

    /// Soft-archive: drops the worker from `list_workers` while keeping the
    /// row (and its balance history) addressable.
    pub async fn archive_worker(&self, worker_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        with_tx!(self, |db_tx| {
            workers::Entity::find_by_id(worker_id.to_string())
                .filter(workers::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("worker".to_string()))?;

            let active = workers::ActiveModel {
                id: ActiveValue::Set(worker_id.to_string()),
                status: ActiveValue::Set(EntityStatus::Archived.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })?;
        tracing::debug!(%worker_id, "worker archived");
        self.publish(&[Topic::Workers]);
        Ok(())
    }
}
