//! Equipment service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        equipment::{EquipmentDetail, EquipmentInput, StatusCount},
        Equipment,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    /// Equipment with its maintenance schedules
    pub async fn get_detail(&self, id: i32) -> AppResult<EquipmentDetail> {
        let equipment = self.repository.equipment.get_by_id(id).await?;
        let schedules = self.repository.maintenance.list_by_equipment(id).await?;
        Ok(EquipmentDetail {
            equipment,
            schedules,
        })
    }

    pub async fn stats(&self) -> AppResult<Vec<StatusCount>> {
        self.repository.equipment.count_by_status().await
    }

    pub async fn create(&self, data: EquipmentInput) -> AppResult<Equipment> {
        data.validate()?;
        let equipment = self.repository.equipment.create(&data).await?;
        tracing::info!(equipment_id = equipment.id, "Equipment created");
        Ok(equipment)
    }

    pub async fn update(&self, id: i32, data: EquipmentInput) -> AppResult<Equipment> {
        data.validate()?;
        self.repository.equipment.update(id, &data).await
    }

    /// Delete equipment along with its schedules and repairs
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete_cascade(id).await?;
        tracing::info!(equipment_id = id, "Equipment deleted");
        Ok(())
    }

    /// Register equipment under a supplier
    pub async fn create_for_supplier(
        &self,
        supplier_id: i32,
        mut data: EquipmentInput,
    ) -> AppResult<Equipment> {
        data.validate()?;
        self.repository.suppliers.get_by_id(supplier_id).await?;
        data.supplier_id = Some(supplier_id);
        self.repository.equipment.create(&data).await
    }

    pub async fn update_for_supplier(
        &self,
        supplier_id: i32,
        id: i32,
        data: EquipmentInput,
    ) -> AppResult<Equipment> {
        data.validate()?;
        self.repository
            .equipment
            .update_for_supplier(supplier_id, id, &data)
            .await
    }
}
