//! JSON helper endpoints used by the landing page.

use std::sync::Arc;

use axum::{extract::Extension, response::{IntoResponse, Response}, Json};
use grid_dataset::DatasetKey;
use region_catalog::CountrySummary;
use serde::Serialize;

use super::common::internal_error;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<CountrySummary>,
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<DatasetKey>,
}

/// GET /api/countries - countries in the region catalog with zone counts
pub async fn countries_handler(Extension(state): Extension<Arc<AppState>>) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: state.catalog.countries(),
    })
}

/// GET /api/datasets - `{variable, method}` pairs found in the data directory
pub async fn datasets_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let worker_state = Arc::clone(&state);
    match tokio::task::spawn_blocking(move || worker_state.loader.list_datasets()).await {
        Ok(Ok(datasets)) => Json(DatasetsResponse { datasets }).into_response(),
        Ok(Err(e)) => internal_error(format!("failed to list datasets: {e}")),
        Err(e) => internal_error(format!("dataset listing task failed: {e}")),
    }
}
