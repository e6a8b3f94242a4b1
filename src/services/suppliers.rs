//! Supplier service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        supplier::{SupplierDetail, SupplierInput},
        Supplier,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SuppliersService {
    repository: Repository,
}

impl SuppliersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Supplier>> {
        self.repository.suppliers.list().await
    }

    /// Supplier with the equipment it provided
    pub async fn get_detail(&self, id: i32) -> AppResult<SupplierDetail> {
        let supplier = self.repository.suppliers.get_by_id(id).await?;
        let equipments = self.repository.equipment.list_by_supplier(id).await?;
        Ok(SupplierDetail {
            supplier,
            equipments,
        })
    }

    pub async fn create(&self, data: SupplierInput) -> AppResult<Supplier> {
        data.validate()?;
        let supplier = self.repository.suppliers.create(&data).await?;
        tracing::info!(supplier_id = supplier.id, "Supplier created");
        Ok(supplier)
    }

    pub async fn update(&self, id: i32, data: SupplierInput) -> AppResult<Supplier> {
        data.validate()?;
        self.repository.suppliers.update(id, &data).await
    }

    /// Remove a supplier with its equipment, their schedules and repairs
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.suppliers.delete_cascade(id).await?;
        tracing::info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }
}
