//! Crop repository: scoped CRUD with soft-archive.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Crop, CropPatch, EngineError, EntityStatus, ResultEngine, Topic, crops, crops::NewCrop,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Active crops of the current tenant; empty while unresolved.
    pub async fn list_crops(&self) -> ResultEngine<Vec<Crop>> {
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };
        let models = crops::Entity::find()
            .filter(crops::Column::OwnerId.eq(tenant.owner_id))
            .filter(crops::Column::Status.eq(EntityStatus::Active.as_str()))
            .all(&self.database)
            .await?;
        models.into_iter().map(Crop::try_from).collect()
    }

    /// Direct lookup by id, archived included.
    pub async fn crop(&self, crop_id: Uuid) -> ResultEngine<Crop> {
        let Some(tenant) = self.tenant() else {
            return Err(EngineError::EntityNotFound("crop".to_string()));
        };
        let model = crops::Entity::find_by_id(crop_id.to_string())
            .filter(crops::Column::OwnerId.eq(tenant.owner_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::EntityNotFound("crop".to_string()))?;
        Crop::try_from(model)
    }

    pub async fn add_crop(&self, new: NewCrop) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let name = normalize_required_text(&new.name, "crop name")?;

        let crop = Crop::new(name, new.description, new.area_ha, tenant.owner_id)?;
        let crop_id = crop.id;
        crops::ActiveModel::from(&crop)
            .insert(&self.database)
            .await?;
        tracing::debug!(%crop_id, "crop created");
        self.publish(&[Topic::Crops]);
        Ok(crop_id)
    }

    pub async fn update_crop(&self, crop_id: Uuid, patch: CropPatch) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        if patch.is_empty() {
            return Err(EngineError::Validation("empty patch".to_string()));
        }
        if let Some(area_ha) = patch.area_ha {
            crate::crops::validate_area(area_ha)?;
        }

        with_tx!(self, |db_tx| {
            crops::Entity::find_by_id(crop_id.to_string())
                .filter(crops::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("crop".to_string()))?;

            let mut active = crops::ActiveModel {
                id: ActiveValue::Set(crop_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_text(&name, "crop name")?);
            }
            if let Some(description) = patch.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(area_ha) = patch.area_ha {
                active.area_ha = ActiveValue::Set(area_ha);
            }
            active.update(&db_tx).await?;
            Ok(())
        })?;
        self.publish(&[Topic::Crops]);
        Ok(())
    }

    pub async fn archive_crop(&self, crop_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        with_tx!(self, |db_tx| {
            crops::Entity::find_by_id(crop_id.to_string())
                .filter(crops::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("crop".to_string()))?;

            let active = crops::ActiveModel {
                id: ActiveValue::Set(crop_id.to_string()),
                status: ActiveValue::Set(EntityStatus::Archived.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })?;
        tracing::debug!(%crop_id, "crop archived");
        self.publish(&[Topic::Crops]);
        Ok(())
    }
}
