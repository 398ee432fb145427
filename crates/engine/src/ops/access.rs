//! Tenant-scoped target checks used by the ledger transactions.
//!
//! Every check runs against the transaction's connection, so a target that
//! was archived or removed by a concurrent commit is seen before this
//! transaction writes anything.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, EntityStatus, ResultEngine, buyers, crops, workers};

use super::Engine;

/// Generates `require_<entity>_active` for a balance-target entity: the row
/// must exist in the tenant's scope and not be archived.
macro_rules! impl_require_active {
    ($require_fn:ident, $entity:path, $owner_col:expr, $status_col:expr, $model:ty, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            owner_id: &str,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($owner_col.eq(owner_id.to_string()))
                .filter($status_col.eq(EntityStatus::Active.as_str()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::EntityNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_active!(
        require_worker_active,
        workers::Entity,
        workers::Column::OwnerId,
        workers::Column::Status,
        workers::Model,
        "worker"
    );

    impl_require_active!(
        require_buyer_active,
        buyers::Entity,
        buyers::Column::OwnerId,
        buyers::Column::Status,
        buyers::Model,
        "buyer"
    );

    impl_require_active!(
        require_crop_active,
        crops::Entity,
        crops::Column::OwnerId,
        crops::Column::Status,
        crops::Model,
        "crop"
    );
}
