//! Payment ledger entries: money handed to a worker, debited from the
//! accrued balance.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub owner_id: String,
    /// Insertion instant; tie-breaks same-day payments in listings.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub(crate) fn from_new(
        new: &NewPayment,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if new.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "payment amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            worker_id: new.worker_id,
            amount_minor: new.amount_minor,
            date: new.date,
            owner_id,
            created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewPayment {
    pub worker_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
}

/// Optional date window for listing payments; bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct PaymentFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl PaymentFilters {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(EngineError::Validation(
                "invalid range: date_from must be <= date_to".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sum of amounts over an already-filtered set.
pub fn total_amount_minor(payments: &[Payment]) -> i64 {
    payments.iter().map(|payment| payment.amount_minor).sum()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub worker_id: String,
    pub amount_minor: i64,
    pub date: Date,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workers::Entity",
        from = "Column::WorkerId",
        to = "super::workers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Workers,
}

impl Related<super::workers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid payment id".to_string()))?;
        let worker_id = Uuid::parse_str(&model.worker_id)
            .map_err(|_| EngineError::Validation("invalid worker id".to_string()))?;
        Ok(Self {
            id,
            worker_id,
            amount_minor: model.amount_minor,
            date: model.date,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            worker_id: ActiveValue::Set(payment.worker_id.to_string()),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            date: ActiveValue::Set(payment.date),
            owner_id: ActiveValue::Set(payment.owner_id.clone()),
            created_at: ActiveValue::Set(payment.created_at),
        }
    }
}
