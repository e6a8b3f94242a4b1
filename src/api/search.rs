//! Search endpoints

use axum::{
    extract::State,
    Json,
};

use crate::{
    error::AppResult,
    models::search::{DetailQuery, SearchDetail, SearchHit, SearchQuery},
    AppState,
};

use super::AppQuery;

/// Substring search over equipment, schedules, repairs and suppliers
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching records", body = Vec<SearchHit>),
        (status = 400, description = "q missing or blank", body = crate::error::ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let hits = state.services.search.search(query.q.as_deref()).await?;
    Ok(Json(hits))
}

/// Full record behind a search hit
#[utoipa::path(
    get,
    path = "/search/detail",
    tag = "search",
    params(DetailQuery),
    responses(
        (status = 200, description = "Record", body = SearchDetail),
        (status = 400, description = "type or id missing or invalid", body = crate::error::ErrorResponse),
        (status = 404, description = "No such record")
    )
)]
pub async fn search_detail(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DetailQuery>,
) -> AppResult<Json<SearchDetail>> {
    let detail = state.services.search.detail(query.kind, query.id).await?;
    Ok(Json(detail))
}
