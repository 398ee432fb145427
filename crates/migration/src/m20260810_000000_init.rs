//! Initial schema migration - creates all tables from scratch.
//!
//! The schema follows one rule: every tenant-owned table carries an
//! `owner_id` column, and every ledger table additionally carries the
//! `date`/`created_at` pair the listings sort by.
//!
//! - `profiles`: registered accounts and their tenant role
//! - `supervisors`: member invitations, matched by email at registration
//! - `workers`: balance holders credited by tasks, debited by payments
//! - `buyers`: balance holders credited by sales, debited by collections
//! - `crops`: cultivated plots referenced by tasks
//! - `tasks`, `payments`, `sales`, `collections`: the ledger rows
//! - `expenses`: standalone expense records, no balance linkage

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    Email,
    Role,
    OwnerId,
}

#[derive(Iden)]
enum Supervisors {
    Table,
    Id,
    Name,
    Email,
    Phone,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Workers {
    Table,
    Id,
    Name,
    Surname,
    AccruedBalanceMinor,
    Status,
    OwnerId,
}

#[derive(Iden)]
enum Buyers {
    Table,
    Id,
    Name,
    OwedBalanceMinor,
    Status,
    OwnerId,
}

#[derive(Iden)]
enum Crops {
    Table,
    Id,
    Name,
    Description,
    AreaHa,
    Status,
    OwnerId,
}

#[derive(Iden)]
enum Tasks {
    Table,
    Id,
    WorkerId,
    Date,
    Kind,
    PayoutMinor,
    CropId,
    Harvest,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    WorkerId,
    AmountMinor,
    Date,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    BuyerId,
    Date,
    Items,
    TotalMinor,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Collections {
    Table,
    Id,
    BuyerId,
    AmountMinor,
    Date,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Category,
    Description,
    AmountMinor,
    Date,
    OwnerId,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Profiles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Email).string().not_null())
                    .col(ColumnDef::new(Profiles::Role).string().not_null())
                    .col(ColumnDef::new(Profiles::OwnerId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-profiles-email-unique")
                    .table(Profiles::Table)
                    .col(Profiles::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Supervisors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Supervisors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Supervisors::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Supervisors::Name).string().not_null())
                    .col(ColumnDef::new(Supervisors::Email).string().not_null())
                    .col(ColumnDef::new(Supervisors::Phone).string())
                    .col(ColumnDef::new(Supervisors::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Supervisors::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-supervisors-email-unique")
                    .table(Supervisors::Table)
                    .col(Supervisors::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-supervisors-owner_id")
                    .table(Supervisors::Table)
                    .col(Supervisors::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Workers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Workers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workers::Name).string().not_null())
                    .col(ColumnDef::new(Workers::Surname).string().not_null())
                    .col(
                        ColumnDef::new(Workers::AccruedBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Workers::Status).string().not_null())
                    .col(ColumnDef::new(Workers::OwnerId).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workers-owner_id")
                    .table(Workers::Table)
                    .col(Workers::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Buyers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Buyers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Buyers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Buyers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Buyers::OwedBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Buyers::Status).string().not_null())
                    .col(ColumnDef::new(Buyers::OwnerId).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-buyers-owner_id")
                    .table(Buyers::Table)
                    .col(Buyers::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Crops
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Crops::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Crops::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Crops::Name).string().not_null())
                    .col(ColumnDef::new(Crops::Description).string().not_null())
                    .col(ColumnDef::new(Crops::AreaHa).double().not_null())
                    .col(ColumnDef::new(Crops::Status).string().not_null())
                    .col(ColumnDef::new(Crops::OwnerId).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-crops-owner_id")
                    .table(Crops::Table)
                    .col(Crops::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Tasks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tasks::WorkerId).string().not_null())
                    .col(ColumnDef::new(Tasks::Date).date().not_null())
                    .col(ColumnDef::new(Tasks::Kind).string().not_null())
                    .col(ColumnDef::new(Tasks::PayoutMinor).big_integer().not_null())
                    .col(ColumnDef::new(Tasks::CropId).string())
                    .col(ColumnDef::new(Tasks::Harvest).string())
                    .col(ColumnDef::new(Tasks::OwnerId).string().not_null())
                    .col(ColumnDef::new(Tasks::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-worker_id")
                            .from(Tasks::Table, Tasks::WorkerId)
                            .to(Workers::Table, Workers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasks-crop_id")
                            .from(Tasks::Table, Tasks::CropId)
                            .to(Crops::Table, Crops::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tasks-owner_id-date")
                    .table(Tasks::Table)
                    .col(Tasks::OwnerId)
                    .col(Tasks::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tasks-worker_id")
                    .table(Tasks::Table)
                    .col(Tasks::WorkerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::WorkerId).string().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Date).date().not_null())
                    .col(ColumnDef::new(Payments::OwnerId).string().not_null())
                    .col(ColumnDef::new(Payments::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-worker_id")
                            .from(Payments::Table, Payments::WorkerId)
                            .to(Workers::Table, Workers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-owner_id-date")
                    .table(Payments::Table)
                    .col(Payments::OwnerId)
                    .col(Payments::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Sales
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::BuyerId).string().not_null())
                    .col(ColumnDef::new(Sales::Date).date().not_null())
                    .col(ColumnDef::new(Sales::Items).string().not_null())
                    .col(ColumnDef::new(Sales::TotalMinor).big_integer().not_null())
                    .col(ColumnDef::new(Sales::OwnerId).string().not_null())
                    .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-buyer_id")
                            .from(Sales::Table, Sales::BuyerId)
                            .to(Buyers::Table, Buyers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-owner_id-date")
                    .table(Sales::Table)
                    .col(Sales::OwnerId)
                    .col(Sales::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Collections
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collections::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Collections::BuyerId).string().not_null())
                    .col(
                        ColumnDef::new(Collections::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Collections::Date).date().not_null())
                    .col(ColumnDef::new(Collections::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Collections::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-collections-buyer_id")
                            .from(Collections::Table, Collections::BuyerId)
                            .to(Buyers::Table, Buyers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-collections-buyer_id")
                    .table(Collections::Table)
                    .col(Collections::BuyerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::OwnerId).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-owner_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::OwnerId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Crops::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Buyers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Supervisors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        Ok(())
    }
}
