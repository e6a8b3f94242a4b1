//! Maintenance schedules repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{EquipmentStatus, MaintenanceSchedule, MaintenanceStatus},
};

/// Fields written when a schedule is inserted or replaced
#[derive(Debug, Clone)]
pub struct ScheduleFields {
    pub scheduled_date: DateTime<Utc>,
    pub description: String,
    pub status: MaintenanceStatus,
    pub technician_id: Option<i32>,
}

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceSchedule>> {
        let rows = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules ORDER BY scheduled_date, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceSchedule>> {
        let rows = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules WHERE equipment_id = $1 ORDER BY scheduled_date, id",
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceSchedule> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<MaintenanceSchedule>> {
        let row = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a schedule and flag its equipment as under maintenance, atomically
    pub async fn create(
        &self,
        equipment_id: i32,
        fields: &ScheduleFields,
    ) -> AppResult<MaintenanceSchedule> {
        let mut tx = self.pool.begin().await?;

        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            INSERT INTO maintenance_schedules (equipment_id, scheduled_date, description, status, technician_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .bind(fields.scheduled_date)
        .bind(&fields.description)
        .bind(fields.status)
        .bind(fields.technician_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::from_write(e, "Maintenance already exists", "Equipment or technician not found")
        })?;

        sqlx::query("UPDATE equipments SET status = $1 WHERE id = $2")
            .bind(EquipmentStatus::Maintenance)
            .bind(equipment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(schedule)
    }

    pub async fn update(&self, id: i32, fields: &ScheduleFields) -> AppResult<MaintenanceSchedule> {
        sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            UPDATE maintenance_schedules
            SET scheduled_date = $1, description = $2, status = $3, technician_id = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(fields.scheduled_date)
        .bind(&fields.description)
        .bind(fields.status)
        .bind(fields.technician_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Maintenance already exists", "Technician not found"))?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance {} not found", id)))
    }

    /// Delete a schedule and its repair history
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM repair_history WHERE maintenance_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
