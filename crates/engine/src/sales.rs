//! Sale ledger entries: produce sold to a buyer on credit, credited to the
//! buyer's owed balance.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// One graded line item of a sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub grade: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub date: NaiveDate,
    pub items: Vec<SaleLine>,
    /// Σ quantity × unit price over `items`, fixed at creation.
    pub total_minor: i64,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewSale {
    pub buyer_id: Uuid,
    pub date: NaiveDate,
    pub items: Vec<SaleLine>,
}

/// Validate the line items and compute the sale total. Pure; no I/O.
pub fn sale_total_minor(items: &[SaleLine]) -> ResultEngine<i64> {
    if items.is_empty() {
        return Err(EngineError::Validation(
            "a sale needs at least one line item".to_string(),
        ));
    }
    let mut total: i64 = 0;
    for item in items {
        if item.quantity < 0 {
            return Err(EngineError::Validation(
                "sale quantity must not be negative".to_string(),
            ));
        }
        if item.unit_price_minor < 0 {
            return Err(EngineError::Validation(
                "sale unit price must not be negative".to_string(),
            ));
        }
        let line_total = item
            .quantity
            .checked_mul(item.unit_price_minor)
            .ok_or_else(|| EngineError::Validation("sale total overflows".to_string()))?;
        total = total
            .checked_add(line_total)
            .ok_or_else(|| EngineError::Validation("sale total overflows".to_string()))?;
    }
    Ok(total)
}

impl Sale {
    /// Build a sale from validated input; the total is computed here, once.
    pub(crate) fn from_new(
        new: &NewSale,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let total_minor = sale_total_minor(&new.items)?;
        Ok(Self {
            id: Uuid::new_v4(),
            buyer_id: new.buyer_id,
            date: new.date,
            items: new.items.clone(),
            total_minor,
            owner_id,
            created_at,
        })
    }
}

/// Sum of sale totals over an already-filtered set.
pub fn total_sales_minor(sales: &[Sale]) -> i64 {
    sales.iter().map(|sale| sale.total_minor).sum()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub buyer_id: String,
    pub date: Date,
    /// Line items as a JSON document.
    pub items: String,
    pub total_minor: i64,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::buyers::Entity",
        from = "Column::BuyerId",
        to = "super::buyers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Buyers,
}

impl Related<super::buyers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid sale id".to_string()))?;
        let buyer_id = Uuid::parse_str(&model.buyer_id)
            .map_err(|_| EngineError::Validation("invalid buyer id".to_string()))?;
        let items = serde_json::from_str::<Vec<SaleLine>>(&model.items)
            .map_err(|_| EngineError::Validation("invalid sale items".to_string()))?;
        Ok(Self {
            id,
            buyer_id,
            date: model.date,
            items,
            total_minor: model.total_minor,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<&Sale> for ActiveModel {
    type Error = EngineError;

    fn try_from(sale: &Sale) -> Result<Self, Self::Error> {
        let items = serde_json::to_string(&sale.items)
            .map_err(|_| EngineError::Validation("invalid sale items".to_string()))?;
        Ok(Self {
            id: ActiveValue::Set(sale.id.to_string()),
            buyer_id: ActiveValue::Set(sale.buyer_id.to_string()),
            date: ActiveValue::Set(sale.date),
            items: ActiveValue::Set(items),
            total_minor: ActiveValue::Set(sale.total_minor),
            owner_id: ActiveValue::Set(sale.owner_id.clone()),
            created_at: ActiveValue::Set(sale.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, unit_price_minor: i64) -> SaleLine {
        SaleLine {
            grade: "first".to_string(),
            quantity,
            unit_price_minor,
        }
    }

    #[test]
    fn total_sums_line_items() {
        assert_eq!(
            sale_total_minor(&[item(10, 100), item(5, 200)]).unwrap(),
            2000
        );
    }

    #[test]
    fn rejects_empty_and_negative_items() {
        assert!(sale_total_minor(&[]).is_err());
        assert!(sale_total_minor(&[item(-1, 100)]).is_err());
        assert!(sale_total_minor(&[item(1, -100)]).is_err());
    }
}
