//! The module contains the `Buyer` struct and its persistence model.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EntityStatus};

/// A produce buyer.
///
/// `owed_balance_minor` is the signed running total of sale totals credited
/// minus collections debited. Like the worker balance it is mutated only by
/// ledger transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub id: Uuid,
    pub name: String,
    pub owed_balance_minor: i64,
    pub status: EntityStatus,
    pub owner_id: String,
}

impl Buyer {
    pub(crate) fn new(name: String, owner_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owed_balance_minor: 0,
            status: EntityStatus::Active,
            owner_id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewBuyer {
    pub name: String,
}

/// Direct field patch for a buyer; excludes balance and status.
#[derive(Clone, Debug, Default)]
pub struct BuyerPatch {
    pub name: Option<String>,
}

impl BuyerPatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "buyers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owed_balance_minor: i64,
    pub status: String,
    pub owner_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
    #[sea_orm(has_many = "super::collections::Entity")]
    Collections,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Buyer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid buyer id".to_string()))?;
        Ok(Self {
            id,
            name: model.name,
            owed_balance_minor: model.owed_balance_minor,
            status: EntityStatus::try_from(model.status.as_str())?,
            owner_id: model.owner_id,
        })
    }
}

impl From<&Buyer> for ActiveModel {
    fn from(buyer: &Buyer) -> Self {
        Self {
            id: ActiveValue::Set(buyer.id.to_string()),
            name: ActiveValue::Set(buyer.name.clone()),
            owed_balance_minor: ActiveValue::Set(buyer.owed_balance_minor),
            status: ActiveValue::Set(buyer.status.as_str().to_string()),
            owner_id: ActiveValue::Set(buyer.owner_id.clone()),
        }
    }
}
