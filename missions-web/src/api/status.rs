//! Completed-missions status endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use missions_common::config::{STEP_TAR, STEP_TAR_EXTRACT};

use crate::{ApiError, ApiResult, AppState};

/// Query parameters for the status endpoint
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub username: String,
}

/// Per-person completion map
#[derive(Debug, Serialize)]
pub struct MissionStatusResponse {
    pub completed_missions: BTreeMap<String, bool>,
}

/// GET /missions/status?username=...
///
/// Returns, for every known mission step, whether the person has
/// completed it.
pub async fn mission_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<MissionStatusResponse>> {
    if query.username.is_empty() {
        return Err(ApiError::BadRequest("Missing username".to_string()));
    }

    let steps = state.completions.completed_steps(&query.username).await;

    let mut completed_missions = BTreeMap::new();
    for step in [STEP_TAR, STEP_TAR_EXTRACT] {
        completed_missions.insert(step.to_string(), steps.contains(step));
    }

    Ok(Json(MissionStatusResponse { completed_missions }))
}
