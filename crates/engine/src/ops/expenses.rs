//! Expense records: tenant-scoped CRUD, no balance linkage, hard delete.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpensePatch, ResultEngine, Topic,
    expenses::{self, NewExpense},
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Expenses of the current tenant, newest first; empty while unresolved.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let Some(tenant) = self.tenant() else {
            return Ok(Vec::new());
        };
        let models = expenses::Entity::find()
            .filter(expenses::Column::OwnerId.eq(tenant.owner_id))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    pub async fn add_expense(&self, new: NewExpense) -> ResultEngine<Uuid> {
        let tenant = self.require_tenant()?;
        let category = normalize_required_text(&new.category, "expense category")?;

        let expense = Expense::from_new(
            &NewExpense { category, ..new },
            tenant.owner_id,
            Utc::now(),
        )?;
        let expense_id = expense.id;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        self.publish(&[Topic::Expenses]);
        Ok(expense_id)
    }

    pub async fn update_expense(&self, expense_id: Uuid, patch: ExpensePatch) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        if patch.is_empty() {
            return Err(EngineError::Validation("empty patch".to_string()));
        }
        if let Some(amount_minor) = patch.amount_minor {
            crate::expenses::validate_amount(amount_minor)?;
        }

        with_tx!(self, |db_tx| {
            expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("expense".to_string()))?;

            let mut active = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                ..Default::default()
            };
            if let Some(category) = patch.category {
                active.category =
                    ActiveValue::Set(normalize_required_text(&category, "expense category")?);
            }
            if let Some(description) = patch.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(amount_minor) = patch.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(date) = patch.date {
                active.date = ActiveValue::Set(date);
            }
            active.update(&db_tx).await?;
            Ok(())
        })?;
        self.publish(&[Topic::Expenses]);
        Ok(())
    }

    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        let tenant = self.require_tenant()?;
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::OwnerId.eq(tenant.owner_id.clone()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound("expense".to_string()))?;
            expenses::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })?;
        self.publish(&[Topic::Expenses]);
        Ok(())
    }
}
