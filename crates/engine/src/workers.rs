//! The module contains the `Worker` struct and its persistence model.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EntityStatus};

/// A farm worker.
///
/// `accrued_balance_minor` is the signed running total of task payouts
/// credited minus payments debited, in minor currency units. It can go
/// negative when a worker has been paid ahead of recorded work. The field is
/// mutated exclusively by ledger transactions; [`WorkerPatch`] deliberately
/// has no way to express it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub accrued_balance_minor: i64,
    pub status: EntityStatus,
    pub owner_id: String,
}

impl Worker {
    pub(crate) fn new(name: String, surname: String, owner_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            surname,
            accrued_balance_minor: 0,
            status: EntityStatus::Active,
            owner_id,
        }
    }
}

/// Fields accepted when creating a worker. The balance starts at zero and
/// the owner is stamped from the resolved tenant.
#[derive(Clone, Debug)]
pub struct NewWorker {
    pub name: String,
    pub surname: String,
}

/// Direct field patch for a worker. Balance and status are not patchable:
/// the balance belongs to ledger transactions, the status to `archive`.
#[derive(Clone, Debug, Default)]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
}

impl WorkerPatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub surname: String,
    pub accrued_balance_minor: i64,
    pub status: String,
    pub owner_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Worker {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid worker id".to_string()))?;
        Ok(Self {
            id,
            name: model.name,
            surname: model.surname,
            accrued_balance_minor: model.accrued_balance_minor,
            status: EntityStatus::try_from(model.status.as_str())?,
            owner_id: model.owner_id,
        })
    }
}

impl From<&Worker> for ActiveModel {
    fn from(worker: &Worker) -> Self {
        Self {
            id: ActiveValue::Set(worker.id.to_string()),
            name: ActiveValue::Set(worker.name.clone()),
            surname: ActiveValue::Set(worker.surname.clone()),
            accrued_balance_minor: ActiveValue::Set(worker.accrued_balance_minor),
            status: ActiveValue::Set(worker.status.as_str().to_string()),
            owner_id: ActiveValue::Set(worker.owner_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_worker_starts_active_with_zero_balance() {
        let worker = Worker::new("Ana".to_string(), "Reyes".to_string(), "owner".to_string());
        assert_eq!(worker.accrued_balance_minor, 0);
        assert_eq!(worker.status, EntityStatus::Active);
    }

    #[test]
    fn model_round_trip() {
        let worker = Worker::new("Ana".to_string(), "Reyes".to_string(), "owner".to_string());
        let active = ActiveModel::from(&worker);
        let model = Model {
            id: active.id.clone().unwrap(),
            name: active.name.clone().unwrap(),
            surname: active.surname.clone().unwrap(),
            accrued_balance_minor: active.accrued_balance_minor.clone().unwrap(),
            status: active.status.clone().unwrap(),
            owner_id: active.owner_id.clone().unwrap(),
        };
        assert_eq!(Worker::try_from(model).unwrap(), worker);
    }
}
