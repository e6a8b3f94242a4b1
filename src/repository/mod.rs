//! Repository layer for database operations

pub mod equipment;
pub mod maintenance;
#[cfg(test)]
pub mod memory;
pub mod repairs;
pub mod search;
pub mod suppliers;
pub mod users;

use sqlx::{Pool, Postgres};

pub use users::CredentialStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub equipment: equipment::EquipmentRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub repairs: repairs::RepairsRepository,
    pub suppliers: suppliers::SuppliersRepository,
    pub search: search::SearchRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            repairs: repairs::RepairsRepository::new(pool.clone()),
            suppliers: suppliers::SuppliersRepository::new(pool.clone()),
            search: search::SearchRepository::new(pool.clone()),
            pool,
        }
    }
}
