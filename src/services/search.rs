//! Free-text search service

use crate::{
    error::{AppError, AppResult},
    models::search::{SearchDetail, SearchHit, SearchKind},
    repository::Repository,
};

#[derive(Clone)]
pub struct SearchService {
    repository: Repository,
}

impl SearchService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// A missing or blank `q` is a validation error
    pub async fn search(&self, query: Option<&str>) -> AppResult<Vec<SearchHit>> {
        let term = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::Validation("query param q required".to_string()))?;
        self.repository.search.search(term).await
    }

    /// Load the record a search hit refers to
    pub async fn detail(&self, kind: Option<SearchKind>, id: Option<i32>) -> AppResult<SearchDetail> {
        let (kind, id) = match (kind, id) {
            (Some(kind), Some(id)) => (kind, id),
            _ => {
                return Err(AppError::Validation(
                    "type and id query parameters are required".to_string(),
                ))
            }
        };

        let detail = match kind {
            SearchKind::Equipment => self
                .repository
                .equipment
                .find_by_id(id)
                .await?
                .map(SearchDetail::Equipment),
            SearchKind::Maintenance => self
                .repository
                .maintenance
                .find_by_id(id)
                .await?
                .map(SearchDetail::Maintenance),
            SearchKind::Repair => self
                .repository
                .repairs
                .find_by_id(id)
                .await?
                .map(SearchDetail::Repair),
            SearchKind::Supplier => self
                .repository
                .suppliers
                .find_by_id(id)
                .await?
                .map(SearchDetail::Supplier),
        };

        detail.ok_or_else(|| AppError::NotFound(format!("No {:?} with id {}", kind, id)))
    }
}
