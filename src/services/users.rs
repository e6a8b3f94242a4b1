//! User administration service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        user::{EditUser, UserQuery},
        User,
    },
    repository::CredentialStore,
};

#[derive(Clone)]
pub struct UsersService {
    credentials: Arc<dyn CredentialStore>,
}

impl UsersService {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.credentials.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.credentials.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, data: EditUser) -> AppResult<User> {
        data.validate()?;
        let user = self.credentials.update(id, &data).await?;
        tracing::info!(user_id = id, role = %user.role, "User updated");
        Ok(user)
    }

    /// Delete a user; maintenance and repair rows keep existing with no technician
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.credentials.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{user::NewUser, Role},
        repository::memory::MemoryStore,
    };

    async fn seeded() -> (UsersService, i32) {
        let store = Arc::new(MemoryStore::new());
        let tech = store
            .insert(&NewUser {
                username: "tom".into(),
                email: "t@x.com".into(),
                password_hash: "h".into(),
                role: Role::Technician,
                phone: None,
            })
            .await
            .unwrap();
        store
            .insert(&NewUser {
                username: "vic".into(),
                email: "v@x.com".into(),
                password_hash: "h".into(),
                role: Role::Viewer,
                phone: None,
            })
            .await
            .unwrap();
        (UsersService::new(store), tech.id)
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let (service, tech_id) = seeded().await;
        let techs = service
            .list(&UserQuery {
                role: Some(Role::Technician),
            })
            .await
            .unwrap();
        assert_eq!(techs.len(), 1);
        assert_eq!(techs[0].id, tech_id);
        assert_eq!(service.list(&UserQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let (service, tech_id) = seeded().await;
        let err = service
            .update(
                tech_id,
                EditUser {
                    username: "tom".into(),
                    email: "v@x.com".into(),
                    role: Role::Admin,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_changes_role() {
        let (service, tech_id) = seeded().await;
        let user = service
            .update(
                tech_id,
                EditUser {
                    username: "tom".into(),
                    email: "t@x.com".into(),
                    role: Role::Admin,
                },
            )
            .await
            .unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let (service, _) = seeded().await;
        assert!(matches!(
            service.delete(999).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
