//! Maintenance scheduling service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{assigned_technician, CreateMaintenance, MaintenanceDetail, UpdateMaintenance},
        MaintenanceSchedule,
    },
    repository::{maintenance::ScheduleFields, CredentialStore, Repository},
};

use super::email::{Notifier, OutgoingEmail};

/// Technician owed an assignment notice after a write, if any.
/// `previous` is `None` for a new schedule.
pub fn technician_to_notify(previous: Option<i32>, current: Option<i32>) -> Option<i32> {
    current.filter(|id| previous != Some(*id))
}

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    credentials: Arc<dyn CredentialStore>,
    notifier: Notifier,
}

impl MaintenanceService {
    pub fn new(
        repository: Repository,
        credentials: Arc<dyn CredentialStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            repository,
            credentials,
            notifier,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceSchedule>> {
        self.repository.maintenance.list().await
    }

    /// Schedule with its repair history
    pub async fn get_detail(&self, id: i32) -> AppResult<MaintenanceDetail> {
        let maintenance = self.repository.maintenance.get_by_id(id).await?;
        let history = self.repository.repairs.list_by_maintenance(id).await?;
        Ok(MaintenanceDetail {
            maintenance,
            history,
        })
    }

    /// Schedule maintenance; the equipment switches to "maintenance" status.
    ///
    /// `equipment_id` comes from the path on the nested route and from the body otherwise.
    pub async fn create(
        &self,
        equipment_id: Option<i32>,
        data: CreateMaintenance,
    ) -> AppResult<MaintenanceSchedule> {
        data.validate()?;
        let equipment_id = equipment_id
            .or(data.equipment_id)
            .ok_or_else(|| AppError::Validation("equipment_id is required".to_string()))?;

        let fields = ScheduleFields {
            scheduled_date: data.scheduled_date,
            description: data.description,
            status: data.status,
            technician_id: assigned_technician(data.technician_id),
        };
        let schedule = self.repository.maintenance.create(equipment_id, &fields).await?;
        tracing::info!(
            maintenance_id = schedule.id,
            equipment_id,
            technician_id = ?schedule.technician_id,
            "Maintenance scheduled"
        );

        if let Some(technician_id) = technician_to_notify(None, schedule.technician_id) {
            self.notify_assignment(technician_id, &schedule).await;
        }
        Ok(schedule)
    }

    /// Replace a schedule; a newly assigned technician gets notified
    pub async fn update(&self, id: i32, data: UpdateMaintenance) -> AppResult<MaintenanceSchedule> {
        data.validate()?;
        let previous = self.repository.maintenance.get_by_id(id).await?;

        let fields = ScheduleFields {
            scheduled_date: data.scheduled_date,
            description: data.description,
            status: data.status,
            technician_id: assigned_technician(data.technician_id),
        };
        let schedule = self.repository.maintenance.update(id, &fields).await?;

        if let Some(technician_id) =
            technician_to_notify(previous.technician_id, schedule.technician_id)
        {
            self.notify_assignment(technician_id, &schedule).await;
        }
        Ok(schedule)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.maintenance.delete(id).await?;
        tracing::info!(maintenance_id = id, "Maintenance deleted");
        Ok(())
    }

    /// Email the technician; failures are logged and never reach the caller
    async fn notify_assignment(&self, technician_id: i32, schedule: &MaintenanceSchedule) {
        match self.credentials.get_by_id(technician_id).await {
            Ok(technician) => {
                self.notifier.dispatch(OutgoingEmail::assignment(
                    &technician.email,
                    &technician.username,
                    &schedule.description,
                    &schedule.scheduled_date.format("%Y-%m-%d %H:%M").to_string(),
                ));
            }
            Err(e) => {
                tracing::warn!(technician_id, error = %e, "Assignment notice not sent");
            }
        }
    }
}
