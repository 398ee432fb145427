//! Buyer repository: scoped CRUD with soft-archive.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Buyer, BuyerPatch, EngineError, EntityStatus, ResultEngine, Topic, buyers, buyers::NewBuyer,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Active buyers of the current tenant; empty while unresolved.
    pub async fn list_buyers(&self) -> ResultEngine<Vec<Buyer>> {
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };
        let models = buyers::Entity::find()
            .filter(buyers::Column::OwnerId.eq(tenant.owner_id))
            .filter(buyers::Column::Status.eq(EntityStatus::Active.as_str()))
            .all(&self.database)
            .await?;
        models.into_iter().map(Buyer::try_from).collect()
    }

    /// Direct lookup by id, archived included.
    pub async fn buyer(&self, buyer_id: Uuid) -> ResultEngine<Buyer> {
        let Some(tenant) = self.tenant() else {
            return Err(EngineError::EntityNotFound("buyer".to_string()));
        };
        let model = buyers::Entity::find_by_id(buyer_id.to_string())
            .filter(buyers::Column::OwnerId.eq(tenant.owner_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::EntityNotFound("buyer".to_string()))?;
        Buyer::try_from(model)
    }

    /// Create a buyer with a zero owed balance under the resolved tenant.
    pub async fn add_buyer(&self, new: NewBuyer) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let name = normalize_required_text(&new.name, "buyer name")?;

        let buyer = Buyer::new(name, tenant.owner_id);
        let buyer_id = buyer.id;
        buyers::ActiveModel::from(&buyer)
            .insert(&self.database)
            .await?;
        tracing::debug!(%buyer_id, "buyer created");
        self.publish(&[Topic::Buyers]);
        Ok(buyer_id)
    }

    pub async fn update_buyer(&self, buyer_id: Uuid, patch: BuyerPatch) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        if patch.is_empty() {
            return Err(EngineError::Validation("empty patch".to_string()));
        }

        with_tx!(self, |db_tx| {
            buyers::Entity::find_by_id(buyer_id.to_string())
                .filter(buyers::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("buyer".to_string()))?;

            let mut active = buyers::ActiveModel {
                id: ActiveValue::Set(buyer_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_text(&name, "buyer name")?);
            }
            active.update(&db_tx).await?;
            Ok(())
        })?;
        self.publish(&[Topic::Buyers]);
        Ok(())
    }

    pub async fn archive_buyer(&self, buyer_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        with_tx!(self, |db_tx| {
            buyers::Entity::find_by_id(buyer_id.to_string())
                .filter(buyers::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("buyer".to_string()))?;

            let active = buyers::ActiveModel {
                id: ActiveValue::Set(buyer_id.to_string()),
                status: ActiveValue::Set(EntityStatus::Archived.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })?;
        tracing::debug!(%buyer_id, "buyer archived");
        self.publish(&[Topic::Buyers]);
        Ok(())
    }
}
