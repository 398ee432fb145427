//! The module contains the `Crop` struct and its persistence model.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine};

/// A cultivated plot.
///
/// Crops carry no balance; tasks reference them so reports can aggregate
/// work per crop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Cultivated area in hectares; strictly positive.
    pub area_ha: f64,
    pub status: EntityStatus,
    pub owner_id: String,
}

impl Crop {
    pub(crate) fn new(
        name: String,
        description: String,
        area_ha: f64,
        owner_id: String,
    ) -> ResultEngine<Self> {
        validate_area(area_ha)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            area_ha,
            status: EntityStatus::Active,
            owner_id,
        })
    }
}

pub(crate) fn validate_area(area_ha: f64) -> ResultEngine<()> {
    if !area_ha.is_finite() || area_ha <= 0.0 {
        return Err(EngineError::Validation(
            "crop area must be a positive number".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct NewCrop {
    pub name: String,
    pub description: String,
    pub area_ha: f64,
}

/// Direct field patch for a crop; excludes status.
#[derive(Clone, Debug, Default)]
pub struct CropPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub area_ha: Option<f64>,
}

impl CropPatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.area_ha.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "crops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub area_ha: f64,
    pub status: String,
    pub owner_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Crop {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid crop id".to_string()))?;
        Ok(Self {
            id,
            name: model.name,
            description: model.description,
            area_ha: model.area_ha,
            status: EntityStatus::try_from(model.status.as_str())?,
            owner_id: model.owner_id,
        })
    }
}

impl From<&Crop> for ActiveModel {
    fn from(crop: &Crop) -> Self {
        Self {
            id: ActiveValue::Set(crop.id.to_string()),
            name: ActiveValue::Set(crop.name.clone()),
            description: ActiveValue::Set(crop.description.clone()),
            area_ha: ActiveValue::Set(crop.area_ha),
            status: ActiveValue::Set(crop.status.as_str().to_string()),
            owner_id: ActiveValue::Set(crop.owner_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_area() {
        assert!(Crop::new("Olives".into(), String::new(), 0.0, "o".into()).is_err());
        assert!(Crop::new("Olives".into(), String::new(), -1.5, "o".into()).is_err());
        assert!(Crop::new("Olives".into(), String::new(), f64::NAN, "o".into()).is_err());
    }

    #[test]
    fn accepts_positive_area() {
        let crop = Crop::new("Olives".into(), "east slope".into(), 2.5, "o".into()).unwrap();
        assert_eq!(crop.status, EntityStatus::Active);
        assert_eq!(crop.area_ha, 2.5);
    }
}
