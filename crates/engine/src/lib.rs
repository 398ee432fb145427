//! Core engine for a multi-tenant farm ledger.
//!
//! The engine is a balance-ledger store over a relational database: workers
//! accrue a balance through recorded tasks and are debited through payments,
//! buyers owe a balance through sales and settle it through collections.
//! Every balance mutation happens inside a database transaction together
//! with the ledger row it accounts for, so no state is observable where one
//! exists without the other.
//!
//! Reads are scoped to the tenant resolved by [`TenancyResolver`]; committed
//! mutations are announced on a [`ChangeFeed`] so callers can re-run their
//! queries and keep rendered lists live.

pub use buyers::{Buyer, BuyerPatch, NewBuyer};
pub use collections::{Collection, NewCollection};
pub use crops::{Crop, CropPatch, NewCrop};
pub use error::EngineError;
pub use expenses::{Expense, ExpensePatch, NewExpense, total_amount_minor as total_expenses_minor};
pub use feed::{ChangeFeed, Topic};
pub use ops::{Engine, EngineBuilder};
pub use payments::{NewPayment, Payment, PaymentFilters, total_amount_minor as total_payments_minor};
pub use profiles::Profile;
pub use sales::{NewSale, Sale, SaleLine, sale_total_minor, total_sales_minor};
pub use status::EntityStatus;
pub use supervisors::Supervisor;
pub use tasks::{
    HARVEST_KIND, HarvestLine, NewTask, PayoutSpec, Task, TaskFilters, total_payout_minor,
};
pub use tenancy::{Principal, Role, Tenant, TenancyResolver, TenantState};
pub use workers::{NewWorker, Worker, WorkerPatch};

mod buyers;
mod collections;
mod crops;
mod error;
mod expenses;
mod feed;
mod ops;
mod payments;
mod profiles;
mod sales;
mod status;
mod supervisors;
mod tasks;
mod tenancy;
mod workers;

pub(crate) type ResultEngine<T> = Result<T, EngineError>;
