//! Business logic services

pub mod auth;
pub mod email;
pub mod equipment;
pub mod maintenance;
pub mod password;
pub mod repairs;
pub mod search;
pub mod suppliers;
pub mod tokens;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    repository::{CredentialStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub repairs: repairs::RepairsService,
    pub suppliers: suppliers::SuppliersService,
    pub search: search::SearchService,
}

impl Services {
    /// Create all services.
    ///
    /// `credentials` is normally `repository.users`; tests swap in an in-memory store.
    pub fn new(
        repository: Repository,
        credentials: Arc<dyn CredentialStore>,
        mailer: Arc<dyn email::Mailer>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let notifier = email::Notifier::new(mailer, config.email.max_in_flight);
        let tokens = tokens::TokenCodec::new(&config.auth.jwt_secret);
        let passwords = password::PasswordHasherService::new(&config.auth)?;

        Ok(Self {
            auth: auth::AuthService::new(
                credentials.clone(),
                tokens,
                passwords,
                notifier.clone(),
                &config.auth,
                config.links.clone(),
            ),
            users: users::UsersService::new(credentials.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(
                repository.clone(),
                credentials,
                notifier,
            ),
            repairs: repairs::RepairsService::new(repository.clone()),
            suppliers: suppliers::SuppliersService::new(repository.clone()),
            search: search::SearchService::new(repository),
        })
    }
}
