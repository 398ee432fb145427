//! Farm expenses: plain records with no balance linkage.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn from_new(
        new: &NewExpense,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        validate_amount(new.amount_minor)?;
        Ok(Self {
            id: Uuid::new_v4(),
            category: new.category.clone(),
            description: new.description.clone(),
            amount_minor: new.amount_minor,
            date: new.date,
            owner_id,
            created_at,
        })
    }
}

pub(crate) fn validate_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::Validation(
            "expense amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
}

/// Field patch for an expense. Nothing here touches a balance, so the
/// amount is freely editable.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    pub(crate) fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.description.is_none()
            && self.amount_minor.is_none()
            && self.date.is_none()
    }
}

/// Sum of amounts over an already-filtered set.
pub fn total_amount_minor(expenses: &[Expense]) -> i64 {
    expenses.iter().map(|expense| expense.amount_minor).sum()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category: String,
    pub description: String,
    pub amount_minor: i64,
    pub date: Date,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid expense id".to_string()))?;
        Ok(Self {
            id,
            category: model.category,
            description: model.description,
            amount_minor: model.amount_minor,
            date: model.date,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            category: ActiveValue::Set(expense.category.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            date: ActiveValue::Set(expense.date),
            owner_id: ActiveValue::Set(expense.owner_id.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}
