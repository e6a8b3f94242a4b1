//! Database-backed tests for the multi-table operations.
//!
//! Require a PostgreSQL server reachable through `DATABASE_URL`.
//! Run with: cargo test --test transactions -- --ignored

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::mpsc;

use maintrack_server::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        equipment::EquipmentInput,
        maintenance::{CreateMaintenance, UpdateMaintenance},
        repair::RepairInput,
        supplier::SupplierInput,
        user::NewUser,
        EquipmentStatus, MaintenanceStatus, Role,
    },
    repository::{maintenance::ScheduleFields, CredentialStore, Repository},
    services::{
        email::{Mailer, OutgoingEmail},
        Services,
    },
};

/// Forwards every email to a channel
struct CapturingMailer(mpsc::UnboundedSender<OutgoingEmail>);

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        let _ = self.0.send(email);
        Ok(())
    }
}

fn equipment(name: &str, supplier_id: Option<i32>) -> EquipmentInput {
    EquipmentInput {
        name: name.to_string(),
        category: Some("pumps".to_string()),
        purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        status: EquipmentStatus::Active,
        price: Decimal::new(125_000, 2),
        supplier_id,
    }
}

fn fields(description: &str) -> ScheduleFields {
    ScheduleFields {
        scheduled_date: Utc::now(),
        description: description.to_string(),
        status: MaintenanceStatus::Pending,
        technician_id: None,
    }
}

fn repair(issue: &str) -> RepairInput {
    RepairInput {
        repair_date: Utc::now(),
        issue_description: issue.to_string(),
        cost: Decimal::new(4_550, 2),
        technician_id: None,
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
#[ignore]
async fn scheduling_maintenance_flags_equipment(pool: PgPool) {
    let repo = Repository::new(pool);
    let pump = repo.equipment.create(&equipment("Pump", None)).await.unwrap();

    let schedule = repo.maintenance.create(pump.id, &fields("Seal check")).await.unwrap();

    assert_eq!(schedule.equipment_id, pump.id);
    let pump = repo.equipment.get_by_id(pump.id).await.unwrap();
    assert_eq!(pump.status, EquipmentStatus::Maintenance);
}

#[sqlx::test]
#[ignore]
async fn scheduling_for_unknown_equipment_is_not_found(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    let err = repo.maintenance.create(4242, &fields("Ghost")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count(&pool, "maintenance_schedules").await, 0);
}

#[sqlx::test]
#[ignore]
async fn repair_completes_maintenance_and_reactivates_equipment(pool: PgPool) {
    let repo = Repository::new(pool);
    let pump = repo.equipment.create(&equipment("Pump", None)).await.unwrap();
    let schedule = repo.maintenance.create(pump.id, &fields("Leak")).await.unwrap();

    let repair = repo.repairs.create(schedule.id, &repair("Replaced seal")).await.unwrap();

    assert_eq!(repair.maintenance_id, schedule.id);
    assert_eq!(repair.cost, Decimal::new(4_550, 2));
    let schedule = repo.maintenance.get_by_id(schedule.id).await.unwrap();
    assert_eq!(schedule.status, MaintenanceStatus::Completed);
    let pump = repo.equipment.get_by_id(pump.id).await.unwrap();
    assert_eq!(pump.status, EquipmentStatus::Active);
}

#[sqlx::test]
#[ignore]
async fn repair_rolls_back_when_last_update_fails(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    let pump = repo.equipment.create(&equipment("Pump", None)).await.unwrap();
    let schedule = repo.maintenance.create(pump.id, &fields("Leak")).await.unwrap();

    // Make the equipment status update fail inside the repair transaction
    sqlx::query(
        r#"
        CREATE FUNCTION reject_equipment_update() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'equipment updates disabled';
        END;
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        r#"
        CREATE TRIGGER reject_equipment_update BEFORE UPDATE ON equipments
        FOR EACH ROW EXECUTE FUNCTION reject_equipment_update()
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let err = repo.repairs.create(schedule.id, &repair("Replaced seal")).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));

    assert_eq!(count(&pool, "repair_history").await, 0);
    let schedule = repo.maintenance.get_by_id(schedule.id).await.unwrap();
    assert_eq!(schedule.status, MaintenanceStatus::Pending);
    let pump = repo.equipment.get_by_id(pump.id).await.unwrap();
    assert_eq!(pump.status, EquipmentStatus::Maintenance);
}

#[sqlx::test]
#[ignore]
async fn repair_for_unknown_maintenance_is_not_found(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    let err = repo.repairs.create(4242, &repair("Nothing")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count(&pool, "repair_history").await, 0);
}

#[sqlx::test]
#[ignore]
async fn deleting_supplier_cascades(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    let acme = repo
        .suppliers
        .create(&SupplierInput {
            name: "Acme".into(),
            phone: None,
            email: Some("sales@acme.test".into()),
            address: None,
        })
        .await
        .unwrap();
    let other = repo.equipment.create(&equipment("Unrelated", None)).await.unwrap();

    for name in ["Pump", "Compressor"] {
        let item = repo.equipment.create(&equipment(name, Some(acme.id))).await.unwrap();
        let schedule = repo.maintenance.create(item.id, &fields("Service")).await.unwrap();
        repo.repairs.create(schedule.id, &repair("Fixed")).await.unwrap();
    }

    repo.suppliers.delete_cascade(acme.id).await.unwrap();

    assert_eq!(count(&pool, "suppliers").await, 0);
    assert_eq!(count(&pool, "equipments").await, 1);
    assert_eq!(count(&pool, "maintenance_schedules").await, 0);
    assert_eq!(count(&pool, "repair_history").await, 0);
    assert!(repo.equipment.find_by_id(other.id).await.unwrap().is_some());
}

#[sqlx::test]
#[ignore]
async fn deleting_missing_supplier_changes_nothing(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    repo.equipment.create(&equipment("Pump", None)).await.unwrap();
    let err = repo.suppliers.delete_cascade(999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count(&pool, "equipments").await, 1);
}

#[sqlx::test]
#[ignore]
async fn deleting_equipment_cascades(pool: PgPool) {
    let repo = Repository::new(pool.clone());
    let pump = repo.equipment.create(&equipment("Pump", None)).await.unwrap();
    let drill = repo.equipment.create(&equipment("Drill", None)).await.unwrap();
    let schedule = repo.maintenance.create(pump.id, &fields("Leak")).await.unwrap();
    repo.repairs.create(schedule.id, &repair("Fixed")).await.unwrap();
    repo.maintenance.create(drill.id, &fields("Bits")).await.unwrap();

    repo.equipment.delete_cascade(pump.id).await.unwrap();

    assert!(repo.equipment.find_by_id(pump.id).await.unwrap().is_none());
    assert_eq!(count(&pool, "repair_history").await, 0);
    assert_eq!(count(&pool, "maintenance_schedules").await, 1);
}

#[sqlx::test]
#[ignore]
async fn search_matches_literal_substrings(pool: PgPool) {
    let repo = Repository::new(pool);
    repo.equipment.create(&equipment("Pump 50%", None)).await.unwrap();
    repo.equipment.create(&equipment("Pump 500", None)).await.unwrap();

    let hits = repo.search.search("50%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Pump 50%");

    let hits = repo.search.search("pump").await.unwrap();
    assert_eq!(hits.len(), 2);
}

async fn technician(repo: &Repository, name: &str) -> i32 {
    repo.users
        .insert(&NewUser {
            username: name.to_string(),
            email: format!("{}@maintrack.test", name),
            password_hash: "h".to_string(),
            role: Role::Technician,
            phone: None,
        })
        .await
        .unwrap()
        .id
}

async fn next_recipient(rx: &mut mpsc::UnboundedReceiver<OutgoingEmail>) -> String {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("notice should be sent")
        .unwrap()
        .to
}

#[sqlx::test]
#[ignore]
async fn technicians_are_notified_on_assignment_only(pool: PgPool) {
    let repo = Repository::new(pool);
    let tom = technician(&repo, "tom").await;
    let ann = technician(&repo, "ann").await;
    let pump = repo.equipment.create(&equipment("Pump", None)).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let services = Services::new(
        repo.clone(),
        Arc::new(repo.users.clone()),
        Arc::new(CapturingMailer(tx)),
        &AppConfig::default(),
    )
    .unwrap();

    let schedule = services
        .maintenance
        .create(
            Some(pump.id),
            CreateMaintenance {
                equipment_id: None,
                scheduled_date: Utc::now(),
                description: "Seal check".into(),
                status: MaintenanceStatus::Pending,
                technician_id: Some(tom),
            },
        )
        .await
        .unwrap();
    assert_eq!(next_recipient(&mut rx).await, "tom@maintrack.test");

    let update = |technician_id| UpdateMaintenance {
        scheduled_date: schedule.scheduled_date,
        description: "Seal check".into(),
        status: MaintenanceStatus::InProgress,
        technician_id,
    };

    // Same technician: no notice
    services.maintenance.update(schedule.id, update(Some(tom))).await.unwrap();
    // Reassigned: the new technician hears about it
    services.maintenance.update(schedule.id, update(Some(ann))).await.unwrap();
    assert_eq!(next_recipient(&mut rx).await, "ann@maintrack.test");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rx.try_recv().is_err());
}
