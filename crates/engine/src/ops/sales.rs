//! Sale ledger transactions and the sale listing.
//!
//! There is deliberately no `delete_sale`: the observed transaction set has
//! no sale reversal, and adding one would invent accounting semantics.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ResultEngine, Sale, Topic, buyers,
    sales::{self, NewSale},
};

use super::{Engine, with_tx};

impl Engine {
    /// Record a sale and credit its total to the buyer's owed balance.
    pub async fn add_sale(&self, new: NewSale) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        // Total computed and lines validated before any I/O.
        let sale = Sale::from_new(&new, tenant.owner_id.clone(), Utc::now())?;
        let sale_id = sale.id;

        with_tx!(self, |db_tx| {
            let buyer = self
                .require_buyer_active(&db_tx, &tenant.owner_id, sale.buyer_id)
                .await?;

            let new_balance = buyer.owed_balance_minor + sale.total_minor;
            let buyer_active = buyers::ActiveModel {
                id: ActiveValue::Set(buyer.id),
                owed_balance_minor: ActiveValue::Set(new_balance),
                ..Default::default()
            };
            buyer_active.update(&db_tx).await?;
            sales::ActiveModel::try_from(&sale)?.insert(&db_tx).await?;
            Ok(())
        })?;

        tracing::debug!(%sale_id, buyer_id = %sale.buyer_id, total_minor = sale.total_minor, "sale recorded");
        self.publish(&[Topic::Sales, Topic::Buyers]);
        Ok(sale_id)
    }

    /// Sales of the current tenant, newest first.
    pub async fn list_sales(&self) -> ResultEngine<Vec<Sale>> {
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };
        let models = sales::Entity::find()
            .filter(sales::Column::OwnerId.eq(tenant.owner_id))
            .order_by_desc(sales::Column::Date)
            .order_by_desc(sales::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Sale::try_from).collect()
    }
}
