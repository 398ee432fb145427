use sea_orm::DatabaseConnection;

use crate::{ChangeFeed, EngineError, ResultEngine, TenancyResolver};

mod access;
mod buyers;
mod collections;
mod crops;
mod expenses;
mod payments;
mod profiles;
mod sales;
mod tasks;
mod workers;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine. Stateless over the database: balances live in rows,
/// not in memory, and every mutation goes through a DB transaction.
#[derive(Debug)]
pub struct Engine {
    pub(crate) database: DatabaseConnection,
    tenancy: TenancyResolver,
    feed: ChangeFeed,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The tenancy resolver bound to this engine's database.
    pub fn tenancy(&self) -> &TenancyResolver {
        &self.tenancy
    }

    /// Change notifications for committed mutations.
    pub fn changes(&self) -> &ChangeFeed {
        &self.feed
    }

    pub(crate) fn tenant(&self) -> Option<crate::Tenant> {
        self.tenancy.tenant()
    }

    pub(crate) fn require_tenant(&self) -> ResultEngine<crate::Tenant> {
        self.tenancy.require_tenant()
    }

    pub(crate) fn publish(&self, topics: &[crate::Topic]) {
        self.feed.publish(topics);
    }
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        let tenancy = TenancyResolver::new(self.database.clone());
        Engine {
            database: self.database,
            tenancy,
            feed: ChangeFeed::new(),
        }
    }
}
