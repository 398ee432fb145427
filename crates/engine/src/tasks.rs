//! Task ledger entries and payout computation.
//!
//! A task credits its payout to the worker's accrued balance. The payout is
//! computed up front, outside any transaction, and the computed value is
//! what gets persisted and later reversed on delete — the transaction never
//! recomputes it.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Task kind recorded for harvest work.
///
/// Any other kind string is paid flat; this one requires the per-line
/// harvest payout, and harvest lines are only accepted under it.
pub const HARVEST_KIND: &str = "harvest";

/// One graded line of a harvest: how much of which quality at what
/// per-unit price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestLine {
    pub grade: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
}

/// How a task's payout is determined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayoutSpec {
    /// A flat entered amount, in minor units.
    Flat(i64),
    /// Harvest work: payout = Σ quantity × unit price over the lines.
    Harvest(Vec<HarvestLine>),
}

impl PayoutSpec {
    /// Validate and compute the payout. Pure; performs no I/O.
    pub fn payout_minor(&self) -> ResultEngine<i64> {
        match self {
            Self::Flat(amount) => {
                if *amount < 0 {
                    return Err(EngineError::Validation(
                        "flat payout must not be negative".to_string(),
                    ));
                }
                Ok(*amount)
            }
            Self::Harvest(lines) => {
                if lines.is_empty() {
                    return Err(EngineError::Validation(
                        "a harvest needs at least one line".to_string(),
                    ));
                }
                let mut total: i64 = 0;
                for line in lines {
                    if line.quantity < 0 {
                        return Err(EngineError::Validation(
                            "harvest quantity must not be negative".to_string(),
                        ));
                    }
                    if line.unit_price_minor < 0 {
                        return Err(EngineError::Validation(
                            "harvest unit price must not be negative".to_string(),
                        ));
                    }
                    let line_total = line
                        .quantity
                        .checked_mul(line.unit_price_minor)
                        .ok_or_else(|| {
                            EngineError::Validation("harvest payout overflows".to_string())
                        })?;
                    total = total.checked_add(line_total).ok_or_else(|| {
                        EngineError::Validation("harvest payout overflows".to_string())
                    })?;
                }
                Ok(total)
            }
        }
    }

    fn harvest_lines(&self) -> Option<&[HarvestLine]> {
        match self {
            Self::Flat(_) => None,
            Self::Harvest(lines) => Some(lines),
        }
    }
}

/// A recorded unit of work, immutable once computed except via delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub kind: String,
    pub payout_minor: i64,
    pub crop_id: Option<Uuid>,
    pub harvest: Option<Vec<HarvestLine>>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewTask {
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub kind: String,
    pub crop_id: Option<Uuid>,
    pub payout: PayoutSpec,
}

impl Task {
    /// Build a task from validated input. The payout is computed here, once.
    pub(crate) fn from_new(
        new: &NewTask,
        owner_id: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        // The kind decides the payout rule; a mismatched spec is an input
        // error, not a degenerate payout.
        match (&new.payout, new.kind == HARVEST_KIND) {
            (PayoutSpec::Flat(_), true) => {
                return Err(EngineError::Validation(
                    "a harvest task requires harvest lines".to_string(),
                ));
            }
            (PayoutSpec::Harvest(_), false) => {
                return Err(EngineError::Validation(
                    "harvest lines require a harvest task".to_string(),
                ));
            }
            _ => {}
        }
        let payout_minor = new.payout.payout_minor()?;
        Ok(Self {
            id: Uuid::new_v4(),
            worker_id: new.worker_id,
            date: new.date,
            kind: new.kind.clone(),
            payout_minor,
            crop_id: new.crop_id,
            harvest: new.payout.harvest_lines().map(<[HarvestLine]>::to_vec),
            owner_id,
            created_at,
        })
    }
}

/// Optional predicates for listing tasks. All supplied filters are combined
/// with AND on top of the tenant scope; date bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct TaskFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub worker_id: Option<Uuid>,
    pub crop_id: Option<Uuid>,
}

impl TaskFilters {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(EngineError::Validation(
                "invalid range: date_from must be <= date_to".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sum of payouts over an already-filtered set. Derived on demand; there is
/// no stored aggregate to keep consistent.
pub fn total_payout_minor(tasks: &[Task]) -> i64 {
    tasks.iter().map(|task| task.payout_minor).sum()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub worker_id: String,
    pub date: Date,
    pub kind: String,
    pub payout_minor: i64,
    pub crop_id: Option<String>,
    /// Harvest lines as a JSON document, absent for flat-paid tasks.
    pub harvest: Option<String>,
    pub owner_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workers::Entity",
        from = "Column::WorkerId",
        to = "super::workers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Workers,
    #[sea_orm(
        belongs_to = "super::crops::Entity",
        from = "Column::CropId",
        to = "super::crops::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Crops,
}

impl Related<super::workers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workers.def()
    }
}

impl Related<super::crops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Task {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::Validation("invalid task id".to_string()))?;
        let worker_id = Uuid::parse_str(&model.worker_id)
            .map_err(|_| EngineError::Validation("invalid worker id".to_string()))?;
        let crop_id = model
            .crop_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| EngineError::Validation("invalid crop id".to_string()))?;
        let harvest = model
            .harvest
            .as_deref()
            .map(serde_json::from_str::<Vec<HarvestLine>>)
            .transpose()
            .map_err(|_| EngineError::Validation("invalid harvest detail".to_string()))?;
        Ok(Self {
            id,
            worker_id,
            date: model.date,
            kind: model.kind,
            payout_minor: model.payout_minor,
            crop_id,
            harvest,
            owner_id: model.owner_id,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<&Task> for ActiveModel {
    type Error = EngineError;

    fn try_from(task: &Task) -> Result<Self, Self::Error> {
        let harvest = task
            .harvest
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|_| EngineError::Validation("invalid harvest detail".to_string()))?;
        Ok(Self {
            id: ActiveValue::Set(task.id.to_string()),
            worker_id: ActiveValue::Set(task.worker_id.to_string()),
            date: ActiveValue::Set(task.date),
            kind: ActiveValue::Set(task.kind.clone()),
            payout_minor: ActiveValue::Set(task.payout_minor),
            crop_id: ActiveValue::Set(task.crop_id.map(|id| id.to_string())),
            harvest: ActiveValue::Set(harvest),
            owner_id: ActiveValue::Set(task.owner_id.clone()),
            created_at: ActiveValue::Set(task.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64, unit_price_minor: i64) -> HarvestLine {
        HarvestLine {
            grade: "first".to_string(),
            quantity,
            unit_price_minor,
        }
    }

    #[test]
    fn harvest_payout_sums_lines() {
        let payout = PayoutSpec::Harvest(vec![line(10, 100), line(5, 200)]);
        assert_eq!(payout.payout_minor().unwrap(), 2000);
    }

    #[test]
    fn flat_payout_is_the_entered_amount() {
        assert_eq!(PayoutSpec::Flat(500).payout_minor().unwrap(), 500);
    }

    #[test]
    fn rejects_empty_harvest() {
        assert!(PayoutSpec::Harvest(Vec::new()).payout_minor().is_err());
    }

    #[test]
    fn kind_and_payout_must_correspond() {
        let new = |kind: &str, payout: PayoutSpec| NewTask {
            worker_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind: kind.to_string(),
            crop_id: None,
            payout,
        };

        let flat_harvest = Task::from_new(
            &new(HARVEST_KIND, PayoutSpec::Flat(500)),
            "owner".to_string(),
            Utc::now(),
        );
        assert!(flat_harvest.is_err());

        let lines_on_pruning = Task::from_new(
            &new("pruning", PayoutSpec::Harvest(vec![line(10, 100)])),
            "owner".to_string(),
            Utc::now(),
        );
        assert!(lines_on_pruning.is_err());

        let flat_pruning = Task::from_new(
            &new("pruning", PayoutSpec::Flat(500)),
            "owner".to_string(),
            Utc::now(),
        );
        assert_eq!(flat_pruning.unwrap().payout_minor, 500);
    }

    #[test]
    fn rejects_negative_quantity_and_price() {
        assert!(
            PayoutSpec::Harvest(vec![line(-1, 100)])
                .payout_minor()
                .is_err()
        );
        assert!(
            PayoutSpec::Harvest(vec![line(1, -100)])
                .payout_minor()
                .is_err()
        );
        assert!(PayoutSpec::Flat(-1).payout_minor().is_err());
    }

    #[test]
    fn rejects_overflowing_payout() {
        assert!(
            PayoutSpec::Harvest(vec![line(i64::MAX, 2)])
                .payout_minor()
                .is_err()
        );
    }

    #[test]
    fn filter_range_must_be_ordered() {
        let filters = TaskFilters {
            date_from: NaiveDate::from_ymd_opt(2024, 2, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(filters.validate().is_err());
        assert!(TaskFilters::default().validate().is_ok());
    }

    #[test]
    fn harvest_detail_survives_model_round_trip() {
        let new = NewTask {
            worker_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind: HARVEST_KIND.to_string(),
            crop_id: None,
            payout: PayoutSpec::Harvest(vec![line(10, 100)]),
        };
        let task = Task::from_new(&new, "owner".to_string(), Utc::now()).unwrap();
        let active = ActiveModel::try_from(&task).unwrap();
        let model = Model {
            id: active.id.clone().unwrap(),
            worker_id: active.worker_id.clone().unwrap(),
            date: active.date.clone().unwrap(),
            kind: active.kind.clone().unwrap(),
            payout_minor: active.payout_minor.clone().unwrap(),
            crop_id: active.crop_id.clone().unwrap(),
            harvest: active.harvest.clone().unwrap(),
            owner_id: active.owner_id.clone().unwrap(),
            created_at: active.created_at.clone().unwrap(),
        };
        let back = Task::try_from(model).unwrap();
        assert_eq!(back, task);
        assert_eq!(back.payout_minor, 1000);
    }
}
