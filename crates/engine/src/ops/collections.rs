//! Collection ledger transactions and the per-buyer collection listing.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Collection, ResultEngine, Topic, buyers,
    collections::{self, NewCollection},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record a collection and debit it from the buyer's owed balance.
    pub async fn add_collection(&self, new: NewCollection) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let collection = Collection::from_new(&new, tenant.owner_id.clone(), Utc::now())?;
        let collection_id = collection.id;

        with_tx!(self, |db_tx| {
            let buyer = self
                .require_buyer_active(&db_tx, &tenant.owner_id, collection.buyer_id)
                .await?;

            let new_balance = buyer.owed_balance_minor - collection.amount_minor;
            let buyer_active = buyers::ActiveModel {
                id: ActiveValue::Set(buyer.id),
                owed_balance_minor: ActiveValue::Set(new_balance),
                ..Default::default()
            };
            buyer_active.update(&db_tx).await?;
            collections::ActiveModel::from(&collection)
                .insert(&db_tx)
                .await?;
            Ok(())
        })?;

        tracing::debug!(%collection_id, buyer_id = %collection.buyer_id, amount_minor = collection.amount_minor, "collection recorded");
        self.publish(&[Topic::Collections, Topic::Buyers]);
        Ok(collection_id)
    }

    /// Collections received from one buyer, newest first.
    pub async fn list_collections(&self, buyer_id: Uuid) -> ResultEngine<Vec<Collection>> {
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };
        let models = collections::Entity::find()
            .filter(collections::Column::OwnerId.eq(tenant.owner_id))
            .filter(collections::Column::BuyerId.eq(buyer_id.to_string()))
            .order_by_desc(collections::Column::Date)
            .order_by_desc(collections::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Collection::try_from).collect()
    }
}
