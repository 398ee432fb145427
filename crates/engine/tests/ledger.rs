use chrono::NaiveDate;
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Engine, EngineError, HARVEST_KIND, HarvestLine, NewBuyer, NewCollection, NewCrop, NewPayment,
    NewSale, NewTask, NewWorker, PayoutSpec, Principal, SaleLine, Topic, total_payout_minor,
};
use migration::MigratorTrait;

async fn engine_with_owner() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build();
    sign_up(&engine, "owner-1", "owner@example.com").await;
    engine
}

async fn sign_up(engine: &Engine, id: &str, email: &str) {
    let principal = Principal {
        id: id.to_string(),
        email: email.to_string(),
    };
    engine.register_profile(&principal).await.unwrap();
    engine.tenancy().sign_in(principal).await.unwrap();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn add_worker(engine: &Engine, name: &str) -> Uuid {
    engine
        .add_worker(NewWorker {
            name: name.to_string(),
            surname: "Reyes".to_string(),
        })
        .await
        .unwrap()
}

async fn add_buyer(engine: &Engine, name: &str) -> Uuid {
    engine
        .add_buyer(NewBuyer {
            name: name.to_string(),
        })
        .await
        .unwrap()
}

fn flat_task(worker_id: Uuid, day: NaiveDate, payout_minor: i64) -> NewTask {
    NewTask {
        worker_id,
        date: day,
        kind: "pruning".to_string(),
        crop_id: None,
        payout: PayoutSpec::Flat(payout_minor),
    }
}

#[tokio::test]
async fn flat_task_credits_worker_balance() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    engine
        .add_task(flat_task(worker_id, date(2026, 3, 10), 500))
        .await
        .unwrap();

    let worker = engine.worker(worker_id).await.unwrap();
    assert_eq!(worker.accrued_balance_minor, 500);
}

#[tokio::test]
async fn harvest_task_credits_summed_payout() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    engine
        .add_task(NewTask {
            worker_id,
            date: date(2026, 3, 10),
            kind: HARVEST_KIND.to_string(),
            crop_id: None,
            payout: PayoutSpec::Harvest(vec![
                HarvestLine {
                    grade: "first".to_string(),
                    quantity: 10,
                    unit_price_minor: 100,
                },
                HarvestLine {
                    grade: "second".to_string(),
                    quantity: 5,
                    unit_price_minor: 200,
                },
            ]),
        })
        .await
        .unwrap();

    let worker = engine.worker(worker_id).await.unwrap();
    assert_eq!(worker.accrued_balance_minor, 2000);
}

#[tokio::test]
async fn delete_task_reverses_the_credited_payout() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    let task_id = engine
        .add_task(flat_task(worker_id, date(2026, 3, 10), 700))
        .await
        .unwrap();
    engine.delete_task(task_id).await.unwrap();

    let worker = engine.worker(worker_id).await.unwrap();
    assert_eq!(worker.accrued_balance_minor, 0);
    assert!(engine.list_tasks(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn payment_debits_and_its_deletion_restores() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    // Paying ahead of recorded work is legal; the balance goes negative.
    let payment_id = engine
        .add_payment(NewPayment {
            worker_id,
            amount_minor: 300,
            date: date(2026, 3, 12),
        })
        .await
        .unwrap();
    assert_eq!(
        engine.worker(worker_id).await.unwrap().accrued_balance_minor,
        -300
    );

    engine.delete_payment(payment_id).await.unwrap();
    assert_eq!(
        engine.worker(worker_id).await.unwrap().accrued_balance_minor,
        0
    );
}

#[tokio::test]
async fn balance_always_equals_ledger_sum() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    let t1 = engine
        .add_task(flat_task(worker_id, date(2026, 3, 1), 500))
        .await
        .unwrap();
    engine
        .add_task(flat_task(worker_id, date(2026, 3, 2), 800))
        .await
        .unwrap();
    engine
        .add_payment(NewPayment {
            worker_id,
            amount_minor: 300,
            date: date(2026, 3, 3),
        })
        .await
        .unwrap();
    engine.delete_task(t1).await.unwrap();

    let tasks = engine.list_tasks(&Default::default()).await.unwrap();
    let payments = engine.list_payments(&Default::default()).await.unwrap();
    let ledger_sum = total_payout_minor(&tasks)
        - payments.iter().map(|p| p.amount_minor).sum::<i64>();

    let worker = engine.worker(worker_id).await.unwrap();
    assert_eq!(worker.accrued_balance_minor, 500);
    assert_eq!(worker.accrued_balance_minor, ledger_sum);
}

#[tokio::test]
async fn task_kind_and_payout_spec_must_match() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    // A harvest task without its lines has no payout rule to apply.
    let err = engine
        .add_task(NewTask {
            kind: HARVEST_KIND.to_string(),
            ..flat_task(worker_id, date(2026, 3, 10), 500)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    // And harvest lines under any other kind are equally malformed.
    let err = engine
        .add_task(NewTask {
            worker_id,
            date: date(2026, 3, 10),
            kind: "pruning".to_string(),
            crop_id: None,
            payout: PayoutSpec::Harvest(vec![HarvestLine {
                grade: "first".to_string(),
                quantity: 10,
                unit_price_minor: 100,
            }]),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert!(engine.list_tasks(&Default::default()).await.unwrap().is_empty());
    assert_eq!(
        engine.worker(worker_id).await.unwrap().accrued_balance_minor,
        0
    );
}

#[tokio::test]
async fn harvest_task_without_lines_is_rejected() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    let err = engine
        .add_task(NewTask {
            worker_id,
            date: date(2026, 3, 10),
            kind: HARVEST_KIND.to_string(),
            crop_id: None,
            payout: PayoutSpec::Harvest(Vec::new()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn payment_for_missing_worker_is_rejected_without_effect() {
    let engine = engine_with_owner().await;

    let err = engine
        .add_payment(NewPayment {
            worker_id: Uuid::new_v4(),
            amount_minor: 300,
            date: date(2026, 3, 12),
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EntityNotFound("worker".to_string()));
    assert!(engine.list_payments(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn task_for_archived_worker_is_rejected_without_effect() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;
    engine.archive_worker(worker_id).await.unwrap();

    let err = engine
        .add_task(flat_task(worker_id, date(2026, 3, 10), 500))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EntityNotFound("worker".to_string()));

    assert!(engine.list_tasks(&Default::default()).await.unwrap().is_empty());
    assert_eq!(
        engine.worker(worker_id).await.unwrap().accrued_balance_minor,
        0
    );
}

#[tokio::test]
async fn task_with_unknown_crop_leaves_no_partial_effect() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;

    let err = engine
        .add_task(NewTask {
            crop_id: Some(Uuid::new_v4()),
            ..flat_task(worker_id, date(2026, 3, 10), 500)
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EntityNotFound("crop".to_string()));

    // The worker credit from inside the aborted transaction must not survive.
    assert_eq!(
        engine.worker(worker_id).await.unwrap().accrued_balance_minor,
        0
    );
    assert!(engine.list_tasks(&Default::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn task_with_archived_crop_is_rejected() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;
    let crop_id = engine
        .add_crop(NewCrop {
            name: "Olives".to_string(),
            description: String::new(),
            area_ha: 2.5,
        })
        .await
        .unwrap();
    engine.archive_crop(crop_id).await.unwrap();

    let err = engine
        .add_task(NewTask {
            crop_id: Some(crop_id),
            ..flat_task(worker_id, date(2026, 3, 10), 500)
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EntityNotFound("crop".to_string()));
}

#[tokio::test]
async fn sale_credits_and_collection_debits_buyer_balance() {
    let engine = engine_with_owner().await;
    let buyer_id = add_buyer(&engine, "Mercado Sur").await;

    engine
        .add_sale(NewSale {
            buyer_id,
            date: date(2026, 4, 1),
            items: vec![
                SaleLine {
                    grade: "first".to_string(),
                    quantity: 20,
                    unit_price_minor: 150,
                },
                SaleLine {
                    grade: "second".to_string(),
                    quantity: 10,
                    unit_price_minor: 90,
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(
        engine.buyer(buyer_id).await.unwrap().owed_balance_minor,
        3900
    );

    engine
        .add_collection(NewCollection {
            buyer_id,
            amount_minor: 1500,
            date: date(2026, 4, 5),
        })
        .await
        .unwrap();
    assert_eq!(
        engine.buyer(buyer_id).await.unwrap().owed_balance_minor,
        2400
    );
}

#[tokio::test]
async fn sale_with_no_items_is_rejected() {
    let engine = engine_with_owner().await;
    let buyer_id = add_buyer(&engine, "Mercado Sur").await;

    let err = engine
        .add_sale(NewSale {
            buyer_id,
            date: date(2026, 4, 1),
            items: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let engine = engine_with_owner().await;
    let worker_id = add_worker(&engine, "Ana").await;
    let buyer_id = add_buyer(&engine, "Mercado Sur").await;

    let err = engine
        .add_payment(NewPayment {
            worker_id,
            amount_minor: 0,
            date: date(2026, 3, 12),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .add_collection(NewCollection {
            buyer_id,
            amount_minor: -50,
            date: date(2026, 4, 5),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .add_task(flat_task(worker_id, date(2026, 3, 10), -1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn writes_without_a_resolved_tenant_fail() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build();

    let err = engine
        .add_worker(NewWorker {
            name: "Ana".to_string(),
            surname: "Reyes".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Unauthenticated);
}

#[tokio::test]
async fn committed_mutations_are_announced_on_the_feed() {
    let engine = engine_with_owner().await;
    let mut feed = engine.changes().subscribe();

    let worker_id = add_worker(&engine, "Ana").await;
    assert_eq!(feed.try_recv().unwrap(), Topic::Workers);

    engine
        .add_task(flat_task(worker_id, date(2026, 3, 10), 500))
        .await
        .unwrap();
    assert_eq!(feed.try_recv().unwrap(), Topic::Tasks);
    assert_eq!(feed.try_recv().unwrap(), Topic::Workers);
}
