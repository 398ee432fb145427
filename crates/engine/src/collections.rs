//! Collection ledger entries: money collected from a buyer, debited from
//! the owed balance.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    pub(crate) fn from_new(
        new: &NewCollection,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if new.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "collection amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            buyer_id: new.buyer_id,
            amount_minor: new.amount_minor,
            date: new.date,
            owner_id,
            created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewCollection {
    pub buyer_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub buyer_id: String,
    pub amount_minor: i64,
    pub date: Date,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::buyers::Entity",
        from = "Column::BuyerId",
        to = "super::buyers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Buyers,
}

impl Related<super::buyers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Collection {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid collection id".to_string()))?;
        let buyer_id = Uuid::parse_str(&model.buyer_id)
            .map_err(|_| EngineError::Validation("invalid buyer id".to_string()))?;
        Ok(Self {
            id,
            buyer_id,
            amount_minor: model.amount_minor,
            date: model.date,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Collection> for ActiveModel {
    fn from(collection: &Collection) -> Self {
        Self {
            id: ActiveValue::Set(collection.id.to_string()),
            buyer_id: ActiveValue::Set(collection.buyer_id.to_string()),
            amount_minor: ActiveValue::Set(collection.amount_minor),
            date: ActiveValue::Set(collection.date),
            owner_id: ActiveValue::Set(collection.owner_id.clone()),
            created_at: ActiveValue::Set(collection.created_at),
        }
    }
}
