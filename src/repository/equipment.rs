//! Equipment repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{EquipmentInput, StatusCount},
        Equipment,
    },
};

const MISSING_SUPPLIER: &str = "Supplier not found";

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>("SELECT * FROM equipments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>("SELECT * FROM equipments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_by_supplier(&self, supplier_id: i32) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            "SELECT * FROM equipments WHERE supplier_id = $1 ORDER BY id",
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Equipment counts grouped by status
    pub async fn count_by_status(&self) -> AppResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM equipments GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create equipment
    pub async fn create(&self, data: &EquipmentInput) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipments (name, category, purchase_date, status, price, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.purchase_date)
        .bind(data.status)
        .bind(data.price)
        .bind(data.supplier_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Equipment already exists", MISSING_SUPPLIER))
    }

    /// Replace every field of an equipment row
    pub async fn update(&self, id: i32, data: &EquipmentInput) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipments
            SET name = $1, category = $2, purchase_date = $3, status = $4, price = $5, supplier_id = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.purchase_date)
        .bind(data.status)
        .bind(data.price)
        .bind(data.supplier_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Equipment already exists", MISSING_SUPPLIER))?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Update equipment owned by a given supplier; the supplier link itself is kept
    pub async fn update_for_supplier(
        &self,
        supplier_id: i32,
        id: i32,
        data: &EquipmentInput,
    ) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipments
            SET name = $1, category = $2, purchase_date = $3, status = $4, price = $5
            WHERE id = $6 AND supplier_id = $7
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.category)
        .bind(data.purchase_date)
        .bind(data.status)
        .bind(data.price)
        .bind(id)
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Equipment {} not found for supplier {}",
                id, supplier_id
            ))
        })
    }

    /// Delete equipment together with its schedules and their repair history
    pub async fn delete_cascade(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM repair_history
            WHERE maintenance_id IN (SELECT id FROM maintenance_schedules WHERE equipment_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM maintenance_schedules WHERE equipment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM equipments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
