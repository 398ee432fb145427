//! Task ledger transactions and the filtered task query.
//!
//! `add_task` and `delete_task` pair the ledger-row write with the worker
//! balance mutation inside one DB transaction: either both land or neither
//! does. The payout is computed before the transaction starts and only the
//! precomputed delta is applied inside it.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Task, TaskFilters, Topic,
    tasks::{self, NewTask},
    workers,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Record a task and credit its payout to the worker's accrued balance.
    ///
    /// Aborts with `EntityNotFound` when the worker (or the referenced crop)
    /// is absent or archived at commit time, leaving no partial effect.
    pub async fn add_task(&self, new: NewTask) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let kind = normalize_required_text(&new.kind, "task kind")?;
        // Pure computation, validated before any I/O.
        let task = Task::from_new(
            &NewTask { kind, ..new },
            tenant.owner_id.clone(),
            Utc::now(),
        )?;
        let task_id = task.id;

        with_tx!(self, |db_tx| {
            let worker = self
                .require_worker_active(&db_tx, &tenant.owner_id, task.worker_id)
                .await?;
            if let Some(crop_id) = task.crop_id {
                self.require_crop_active(&db_tx, &tenant.owner_id, crop_id)
                    .await?;
            }

            let new_balance = worker.accrued_balance_minor + task.payout_minor;
            let worker_active = workers::ActiveModel {
                id: ActiveValue::Set(worker.id),
                accrued_balance_minor: ActiveValue::Set(new_balance),
                ..Default::default()
            };
            worker_active.update(&db_tx).await?;
            tasks::ActiveModel::try_from(&task)?.insert(&db_tx).await?;
            Ok(())
        })?;

        tracing::debug!(%task_id, worker_id = %task.worker_id, payout_minor = task.payout_minor, "task recorded");
        self.publish(&[Topic::Tasks, Topic::Workers]);
        Ok(task_id)
    }

    /// Delete a task and reverse the exact payout credited at creation.
    ///
    /// The reversal uses the persisted `payout_minor`; it is skipped when
    /// the worker row has vanished, but the task row is removed either way.
    pub async fn delete_task(&self, task_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;

        let task = with_tx!(self, |db_tx| {
            let task_model = tasks::Entity::find_by_id(task_id.to_string())
                .filter(tasks::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("task".to_string()))?;
            let task = Task::try_from(task_model.clone())?;

            let worker_model = workers::Entity::find_by_id(task_model.worker_id.clone())
                .one(&db_tx)
                .await?;
            if let Some(worker) = worker_model {
                let new_balance = worker.accrued_balance_minor - task.payout_minor;
                let worker_active = workers::ActiveModel {
                    id: ActiveValue::Set(worker.id),
                    accrued_balance_minor: ActiveValue::Set(new_balance),
                    ..Default::default()
                };
                worker_active.update(&db_tx).await?;
            }

            tasks::Entity::delete_by_id(task_model.id).exec(&db_tx).await?;
            Ok(task)
        })?;

        tracing::debug!(%task_id, worker_id = %task.worker_id, payout_minor = task.payout_minor, "task deleted");
        self.publish(&[Topic::Tasks, Topic::Workers]);
        Ok(())
    }

    /// Tasks of the current tenant, optionally narrowed by date window,
    /// worker, and crop. Ordered date descending, then insertion descending.
    pub async fn list_tasks(&self, filters: &TaskFilters) -> ResultEngine<Vec<Task>> {
        filters.validate()?;
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };

        let mut query = tasks::Entity::find()
            .filter(tasks::Column::OwnerId.eq(tenant.owner_id))
            .order_by_desc(tasks::Column::Date)
            .order_by_desc(tasks::Column::CreatedAt);
        if let Some(from) = filters.date_from {
            query = query.filter(tasks::Column::Date.gte(from));
        }
        if let Some(to) = filters.date_to {
            query = query.filter(tasks::Column::Date.lte(to));
        }
        if let Some(worker_id) = filters.worker_id {
            query = query.filter(tasks::Column::WorkerId.eq(worker_id.to_string()));
        }
        if let Some(crop_id) = filters.crop_id {
            query = query.filter(tasks::Column::CropId.eq(crop_id.to_string()));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Task::try_from).collect()
    }
}
