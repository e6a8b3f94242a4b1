//! Repair history service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{repair::RepairInput, RepairHistory},
    repository::Repository,
};

#[derive(Clone)]
pub struct RepairsService {
    repository: Repository,
}

impl RepairsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<RepairHistory>> {
        self.repository.repairs.list().await
    }

    /// Record a repair: completes the maintenance and reactivates the equipment
    pub async fn create(&self, maintenance_id: i32, data: RepairInput) -> AppResult<RepairHistory> {
        data.validate()?;
        let repair = self.repository.repairs.create(maintenance_id, &data).await?;
        tracing::info!(repair_id = repair.id, maintenance_id, "Repair recorded");
        Ok(repair)
    }

    pub async fn update(&self, id: i32, data: RepairInput) -> AppResult<RepairHistory> {
        data.validate()?;
        self.repository.repairs.update(id, &data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.repairs.delete(id).await
    }
}
