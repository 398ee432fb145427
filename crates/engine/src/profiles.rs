//! User profiles, read by the tenancy resolver at sign-in.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, tenancy::Role};

/// A registered user's profile.
///
/// `owner_id` is set for members and points at the owner whose tenant their
/// session resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub owner_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub role: String,
    pub owner_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Profile {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            email: model.email,
            role: Role::try_from(model.role.as_str())?,
            owner_id: model.owner_id,
        })
    }
}

impl From<&Profile> for ActiveModel {
    fn from(profile: &Profile) -> Self {
        Self {
            id: ActiveValue::Set(profile.id.clone()),
            email: ActiveValue::Set(profile.email.clone()),
            role: ActiveValue::Set(profile.role.as_str().to_string()),
            owner_id: ActiveValue::Set(profile.owner_id.clone()),
        }
    }
}
