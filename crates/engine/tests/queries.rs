use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    Engine, EngineError, ExpensePatch, NewCrop, NewExpense, NewPayment, NewTask, NewWorker,
    PayoutSpec, PaymentFilters, Principal, Role, TaskFilters, TenantState, WorkerPatch,
    total_expenses_minor,
};
use migration::MigratorTrait;

async fn fresh_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

async fn sign_up(engine: &Engine, id: &str, email: &str) {
    let principal = Principal {
        id: id.to_string(),
        email: email.to_string(),
    };
    engine.register_profile(&principal).await.unwrap();
    engine.tenancy().sign_in(principal).await.unwrap();
}

async fn engine_with_owner() -> Engine {
    let engine = fresh_engine().await;
    sign_up(&engine, "owner-1", "owner@example.com").await;
    engine
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn add_worker(engine: &Engine, name: &str) -> uuid::Uuid {
    engine
        .add_worker(NewWorker {
            name: name.to_string(),
            surname: "Reyes".to_string(),
        })
        .await
        .unwrap()
}

fn flat_task(worker_id: uuid::Uuid, day: NaiveDate, payout_minor: i64) -> NewTask {
    NewTask {
        worker_id,
        date: day,
        kind: "pruning".to_string(),
        crop_id: None,
        payout: PayoutSpec::Flat(payout_minor),
    }
}

#[tokio::test]
async fn tasks_are_filtered_by_window_worker_and_crop() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;
    let luis = add_worker(&engine, "Luis").await;
    let crop_id = engine
        .add_crop(NewCrop {
            name: "Olives".to_string(),
            description: String::new(),
            area_ha: 2.5,
        })
        .await
        .unwrap();

    engine
        .add_task(flat_task(ana, date(2026, 3, 1), 100))
        .await
        .unwrap();
    engine
        .add_task(NewTask {
            crop_id: Some(crop_id),
            ..flat_task(ana, date(2026, 3, 15), 200)
        })
        .await
        .unwrap();
    engine
        .add_task(flat_task(luis, date(2026, 3, 20), 300))
        .await
        .unwrap();

    let march = engine
        .list_tasks(&TaskFilters {
            date_from: Some(date(2026, 3, 10)),
            date_to: Some(date(2026, 3, 31)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(march.len(), 2);
    // Newest first.
    assert_eq!(march[0].date, date(2026, 3, 20));
    assert_eq!(march[1].date, date(2026, 3, 15));

    let anas = engine
        .list_tasks(&TaskFilters {
            worker_id: Some(ana),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(anas.len(), 2);

    let on_crop = engine
        .list_tasks(&TaskFilters {
            crop_id: Some(crop_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(on_crop.len(), 1);
    assert_eq!(on_crop[0].payout_minor, 200);
}

#[tokio::test]
async fn same_day_entries_come_back_newest_insertion_first() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;

    let first = engine
        .add_task(flat_task(ana, date(2026, 3, 1), 100))
        .await
        .unwrap();
    let second = engine
        .add_task(flat_task(ana, date(2026, 3, 1), 200))
        .await
        .unwrap();

    let tasks = engine.list_tasks(&Default::default()).await.unwrap();
    assert_eq!(tasks[0].id, second);
    assert_eq!(tasks[1].id, first);
}

#[tokio::test]
async fn inverted_date_window_is_rejected() {
    let engine = engine_with_owner().await;
    let err = engine
        .list_payments(&PaymentFilters {
            date_from: Some(date(2026, 4, 1)),
            date_to: Some(date(2026, 3, 1)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn payments_window_is_inclusive() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;
    for day in [date(2026, 3, 1), date(2026, 3, 15), date(2026, 3, 31)] {
        engine
            .add_payment(NewPayment {
                worker_id: ana,
                amount_minor: 100,
                date: day,
            })
            .await
            .unwrap();
    }

    let window = engine
        .list_payments(&PaymentFilters {
            date_from: Some(date(2026, 3, 1)),
            date_to: Some(date(2026, 3, 15)),
        })
        .await
        .unwrap();
    assert_eq!(window.len(), 2);
}

#[tokio::test]
async fn tenants_do_not_see_each_other() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;

    sign_up(&engine, "owner-2", "other@example.com").await;
    assert!(engine.list_workers().await.unwrap().is_empty());
    let err = engine.worker(ana).await.unwrap_err();
    assert_eq!(err, EngineError::EntityNotFound("worker".to_string()));
}

#[tokio::test]
async fn reads_without_a_resolved_tenant_are_empty() {
    let engine = fresh_engine().await;
    assert_eq!(engine.tenancy().current(), TenantState::SignedOut);
    assert!(engine.list_workers().await.unwrap().is_empty());
    assert!(engine.list_tasks(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn sign_in_without_a_profile_fails_and_signs_out() {
    let engine = fresh_engine().await;
    let err = engine
        .tenancy()
        .sign_in(Principal {
            id: "ghost".to_string(),
            email: "ghost@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Unauthenticated);
    assert_eq!(engine.tenancy().current(), TenantState::SignedOut);
}

#[tokio::test]
async fn invited_email_registers_as_member_of_the_inviting_owner() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;
    engine
        .add_supervisor("Luis", "Luis@Example.com", None)
        .await
        .unwrap();

    // Case differences between invitation and registration must not matter.
    let profile = engine
        .register_profile(&Principal {
            id: "member-1".to_string(),
            email: "luis@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(profile.role, Role::Member);
    assert_eq!(profile.owner_id.as_deref(), Some("owner-1"));

    engine
        .tenancy()
        .sign_in(Principal {
            id: "member-1".to_string(),
            email: "luis@example.com".to_string(),
        })
        .await
        .unwrap();

    // The member operates inside the owner's tenant.
    let workers = engine.list_workers().await.unwrap();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].id, ana);

    // But supervisor management stays with the owner.
    let err = engine.list_supervisors().await.unwrap_err();
    assert_eq!(err, EngineError::Unauthenticated);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let engine = engine_with_owner().await;
    let err = engine
        .register_profile(&Principal {
            id: "owner-1".to_string(),
            email: "owner@example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn reused_email_under_a_new_principal_is_rejected() {
    let engine = engine_with_owner().await;
    let err = engine
        .register_profile(&Principal {
            id: "owner-9".to_string(),
            email: "Owner@Example.com".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn duplicate_supervisor_email_is_rejected() {
    let engine = engine_with_owner().await;
    engine
        .add_supervisor("Luis", "luis@example.com", None)
        .await
        .unwrap();
    let err = engine
        .add_supervisor("Other", "luis@example.com", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn supervisor_invitation_can_be_withdrawn() {
    let engine = engine_with_owner().await;
    let id = engine
        .add_supervisor("Luis", "luis@example.com", Some("555-0000".to_string()))
        .await
        .unwrap();
    assert_eq!(engine.list_supervisors().await.unwrap().len(), 1);

    engine.delete_supervisor(id).await.unwrap();
    assert!(engine.list_supervisors().await.unwrap().is_empty());
}

#[tokio::test]
async fn worker_patch_edits_names_but_never_the_balance() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;
    engine
        .add_task(flat_task(ana, date(2026, 3, 1), 500))
        .await
        .unwrap();

    engine
        .update_worker(
            ana,
            WorkerPatch {
                name: Some("Ana María".to_string()),
                surname: None,
            },
        )
        .await
        .unwrap();

    let worker = engine.worker(ana).await.unwrap();
    assert_eq!(worker.name, "Ana María");
    assert_eq!(worker.accrued_balance_minor, 500);

    let err = engine.update_worker(ana, WorkerPatch::default()).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn archived_workers_leave_the_list_but_stay_readable() {
    let engine = engine_with_owner().await;
    let ana = add_worker(&engine, "Ana").await;
    engine.archive_worker(ana).await.unwrap();

    assert!(engine.list_workers().await.unwrap().is_empty());
    let worker = engine.worker(ana).await.unwrap();
    assert_eq!(worker.status, engine::EntityStatus::Archived);
}

#[tokio::test]
async fn expenses_support_full_crud() {
    let engine = engine_with_owner().await;
    let id = engine
        .add_expense(NewExpense {
            category: "fuel".to_string(),
            description: "tractor diesel".to_string(),
            amount_minor: 4500,
            date: date(2026, 5, 2),
        })
        .await
        .unwrap();
    engine
        .add_expense(NewExpense {
            category: "seeds".to_string(),
            description: String::new(),
            amount_minor: 1200,
            date: date(2026, 5, 10),
        })
        .await
        .unwrap();

    let expenses = engine.list_expenses().await.unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].category, "seeds");
    assert_eq!(total_expenses_minor(&expenses), 5700);

    engine
        .update_expense(
            id,
            ExpensePatch {
                amount_minor: Some(5000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let expenses = engine.list_expenses().await.unwrap();
    assert_eq!(total_expenses_minor(&expenses), 6200);

    engine.delete_expense(id).await.unwrap();
    assert_eq!(engine.list_expenses().await.unwrap().len(), 1);

    let err = engine.delete_expense(id).await.unwrap_err();
    assert_eq!(err, EngineError::EntityNotFound("expense".to_string()));
}

#[tokio::test]
async fn non_positive_expense_amounts_are_rejected() {
    let engine = engine_with_owner().await;
    let err = engine
        .add_expense(NewExpense {
            category: "fuel".to_string(),
            description: String::new(),
            amount_minor: 0,
            date: date(2026, 5, 2),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
