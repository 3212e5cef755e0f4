use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SearchResponseDto};
use crate::clients::job_search::SearchParams;
use crate::constants::search::{
    DEFAULT_DISTANCE, DEFAULT_FORMAT, DEFAULT_HOURS_OLD, DEFAULT_RESULTS_WANTED,
};
use crate::services::SearchError;

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Gateway(e) => Self::search_gateway_error(e.to_string()),
        }
    }
}

/// Fills in gateway defaults for unset (zero or empty) parameters.
pub(crate) fn apply_search_defaults(params: &mut SearchParams) {
    if params.results_wanted <= 0 {
        params.results_wanted = DEFAULT_RESULTS_WANTED;
    }
    if params.distance <= 0 {
        params.distance = DEFAULT_DISTANCE;
    }
    if params.hours_old <= 0 {
        params.hours_old = DEFAULT_HOURS_OLD;
    }
    if params.format.is_empty() {
        params.format = DEFAULT_FORMAT.to_string();
    }
}

/// `POST /api/jobs/search`
pub async fn search_jobs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchParams>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchResponseDto>>, ApiError> {
    let Json(mut params) = payload?;
    apply_search_defaults(&mut params);

    let jobs = state.search_service().search(&params).await?;

    Ok(Json(ApiResponse::success(SearchResponseDto {
        count: jobs.len(),
        jobs,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_only_unset_fields() {
        let mut params = SearchParams {
            search_term: "rust".to_string(),
            hours_old: 24,
            ..Default::default()
        };
        apply_search_defaults(&mut params);

        assert_eq!(params.results_wanted, 20);
        assert_eq!(params.distance, 50);
        assert_eq!(params.hours_old, 24);
        assert_eq!(params.format, "json");
    }
}
