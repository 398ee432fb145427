//! Payment ledger transactions and the filtered payment query.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Payment, PaymentFilters, ResultEngine, Topic,
    payments::{self, NewPayment},
    workers,
};

use super::{Engine, with_tx};

impl Engine {
    /// Record a payment and debit it from the worker's accrued balance.
    /// The balance may go negative: paying ahead of recorded work is legal.
    ///
    /// Not idempotent by design — each call is a distinct real-world
    /// payment, so submitting twice debits twice.
    pub async fn add_payment(&self, new: NewPayment) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let payment = Payment::from_new(&new, tenant.owner_id.clone(), Utc::now())?;
        let payment_id = payment.id;

        with_tx!(self, |db_tx| {
            let worker = self
                .require_worker_active(&db_tx, &tenant.owner_id, payment.worker_id)
                .await?;

            let new_balance = worker.accrued_balance_minor - payment.amount_minor;
            let worker_active = workers::ActiveModel {
                id: ActiveValue::Set(worker.id),
                accrued_balance_minor: ActiveValue::Set(new_balance),
                ..Default::default()
            };
            worker_active.update(&db_tx).await?;
            payments::ActiveModel::from(&payment).insert(&db_tx).await?;
            Ok(())
        })?;

        tracing::debug!(%payment_id, worker_id = %payment.worker_id, amount_minor = payment.amount_minor, "payment recorded");
        self.publish(&[Topic::Payments, Topic::Workers]);
        Ok(payment_id)
    }

    /// Delete a payment and credit the exact amount back to the worker.
    pub async fn delete_payment(&self, payment_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;

        let payment = with_tx!(self, |db_tx| {
            let payment_model = payments::Entity::find_by_id(payment_id.to_string())
                .filter(payments::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("payment".to_string()))?;
            let payment = Payment::try_from(payment_model.clone())?;

            let worker_model = workers::Entity::find_by_id(payment_model.worker_id.clone())
                .one(&db_tx)
                .await?;
            if let Some(worker) = worker_model {
                let new_balance = worker.accrued_balance_minor + payment.amount_minor;
                let worker_active = workers::ActiveModel {
                    id: ActiveValue::Set(worker.id),
                    accrued_balance_minor: ActiveValue::Set(new_balance),
                    ..Default::default()
                };
                worker_active.update(&db_tx).await?;
            }

            payments::Entity::delete_by_id(payment_model.id)
                .exec(&db_tx)
                .await?;
            Ok(payment)
        })?;

        tracing::debug!(%payment_id, worker_id = %payment.worker_id, amount_minor = payment.amount_minor, "payment deleted");
        self.publish(&[Topic::Payments, Topic::Workers]);
        Ok(())
    }

    /// Payments of the current tenant within an optional date window.
    /// Ordered date descending, then insertion descending.
    pub async fn list_payments(&self, filters: &PaymentFilters) -> ResultEngine<Vec<Payment>> {
        filters.validate()?;
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };

        let mut query = payments::Entity::find()
            .filter(payments::Column::OwnerId.eq(tenant.owner_id))
            .order_by_desc(payments::Column::Date)
            .order_by_desc(payments::Column::CreatedAt);
        if let Some(from) = filters.date_from {
            query = query.filter(payments::Column::Date.gte(from));
        }
        if let Some(to) = filters.date_to {
            query = query.filter(payments::Column::Date.lte(to));
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Payment::try_from).collect()
    }
}
