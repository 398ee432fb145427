//! Supervisors invited by an owner.
//!
//! The table is consulted once, at registration time: a principal whose
//! email matches a supervisor row registers as a member of that supervisor's
//! owner tenant.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Supervisor {
    pub(crate) fn new(
        name: String,
        email: String,
        phone: Option<String>,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            owner_id,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "supervisors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Supervisor {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid supervisor id".to_string()))?;
        Ok(Self {
            id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Supervisor> for ActiveModel {
    fn from(supervisor: &Supervisor) -> Self {
        Self {
            id: ActiveValue::Set(supervisor.id.to_string()),
            name: ActiveValue::Set(supervisor.name.clone()),
            email: ActiveValue::Set(supervisor.email.clone()),
            phone: ActiveValue::Set(supervisor.phone.clone()),
            owner_id: ActiveValue::Set(supervisor.owner_id.clone()),
            created_at: ActiveValue::Set(supervisor.created_at),
        }
    }
}
