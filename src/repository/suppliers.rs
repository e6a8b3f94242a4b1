//! Suppliers repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{supplier::SupplierInput, Supplier},
};

const DUPLICATE_SUPPLIER: &str = "Supplier already exists";

#[derive(Clone)]
pub struct SuppliersRepository {
    pool: Pool<Postgres>,
}

impl SuppliersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Supplier> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Supplier {} not found", id)))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn create(&self, data: &SupplierInput) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, phone, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_SUPPLIER, "Referenced row not found"))
    }

    pub async fn update(&self, id: i32, data: &SupplierInput) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $1, phone = $2, email = $3, address = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_SUPPLIER, "Referenced row not found"))?
        .ok_or_else(|| AppError::NotFound(format!("Supplier {} not found", id)))
    }

    /// Delete a supplier with everything hanging off its equipment:
    /// repair history, then schedules, then equipment, then the supplier row.
    pub async fn delete_cascade(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM repair_history
            WHERE maintenance_id IN (
                SELECT m.id FROM maintenance_schedules m
                JOIN equipments e ON e.id = m.equipment_id
                WHERE e.supplier_id = $1
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM maintenance_schedules
            WHERE equipment_id IN (SELECT id FROM equipments WHERE supplier_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM equipments WHERE supplier_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Supplier {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
