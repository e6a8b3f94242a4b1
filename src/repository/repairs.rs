//! Repair history repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{repair::RepairInput, EquipmentStatus, MaintenanceStatus, RepairHistory},
};

#[derive(Clone)]
pub struct RepairsRepository {
    pool: Pool<Postgres>,
}

impl RepairsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All repairs, newest first
    pub async fn list(&self) -> AppResult<Vec<RepairHistory>> {
        let rows = sqlx::query_as::<_, RepairHistory>(
            "SELECT * FROM repair_history ORDER BY repair_date DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_maintenance(&self, maintenance_id: i32) -> AppResult<Vec<RepairHistory>> {
        let rows = sqlx::query_as::<_, RepairHistory>(
            "SELECT * FROM repair_history WHERE maintenance_id = $1 ORDER BY repair_date DESC, id DESC",
        )
        .bind(maintenance_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<RepairHistory>> {
        let row = sqlx::query_as::<_, RepairHistory>("SELECT * FROM repair_history WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Record a repair and propagate statuses.
    ///
    /// Inserts the repair, completes the maintenance schedule and puts its
    /// equipment back to active. The three writes commit together or not at all.
    pub async fn create(&self, maintenance_id: i32, data: &RepairInput) -> AppResult<RepairHistory> {
        let mut tx = self.pool.begin().await?;

        let repair = sqlx::query_as::<_, RepairHistory>(
            r#"
            INSERT INTO repair_history (maintenance_id, repair_date, issue_description, cost, technician_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(maintenance_id)
        .bind(data.repair_date)
        .bind(&data.issue_description)
        .bind(data.cost)
        .bind(data.technician_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::from_write(e, "Repair already exists", "Maintenance or technician not found")
        })?;

        let equipment_id: Option<i32> = sqlx::query_scalar(
            "UPDATE maintenance_schedules SET status = $1 WHERE id = $2 RETURNING equipment_id",
        )
        .bind(MaintenanceStatus::Completed)
        .bind(maintenance_id)
        .fetch_optional(&mut *tx)
        .await?;
        let equipment_id = equipment_id
            .ok_or_else(|| AppError::NotFound(format!("Maintenance {} not found", maintenance_id)))?;

        sqlx::query("UPDATE equipments SET status = $1 WHERE id = $2")
            .bind(EquipmentStatus::Active)
            .bind(equipment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(repair)
    }

    pub async fn update(&self, id: i32, data: &RepairInput) -> AppResult<RepairHistory> {
        sqlx::query_as::<_, RepairHistory>(
            r#"
            UPDATE repair_history
            SET repair_date = $1, issue_description = $2, cost = $3, technician_id = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(data.repair_date)
        .bind(&data.issue_description)
        .bind(data.cost)
        .bind(data.technician_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Repair already exists", "Technician not found"))?
        .ok_or_else(|| AppError::NotFound(format!("Repair {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM repair_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Repair {} not found", id)));
        }
        Ok(())
    }
}
