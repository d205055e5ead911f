//! Tar-creation mission endpoints
//!
//! The user downloads the mission's source files, packs them into a
//! correctly-structured `.tar.gz`, and uploads the result.

use axum::extract::{Multipart, Path, State};
use axum::response::Response;
use axum::Json;
use tracing::{info, warn};

use missions_common::config::STEP_TAR;
use missions_common::TarballValidator;

use crate::api::{attachment, read_upload, UploadResponse};
use crate::{ApiError, ApiResult, AppState};

/// GET /missions/tar/file/:name
///
/// Serve one of the mission's source files as a download attachment.
/// Unknown names are a 404.
pub async fn tar_file_download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let Some(contents) = state.config.tar.files.get(&name) else {
        return Err(ApiError::NotFound(format!("No mission file named {}", name)));
    };
    Ok(attachment(&name, "application/octet-stream", contents.clone()))
}

/// POST /missions/tar/upload
///
/// Multipart fields: `username`, `tarfile`. Validates the uploaded tarball
/// and records completion of the `tar` step on success. Validation
/// failures are an application-level outcome (failure status token), not
/// an HTTP error; the user resubmits.
pub async fn tar_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload = read_upload(multipart, "tarfile").await?;

    let validator = TarballValidator::new(&state.config.tar);
    match validator.validate(&upload.bytes) {
        Ok(()) => {
            state.completions.record(&upload.username, STEP_TAR).await;
            info!("tarball upload accepted for {}", upload.username);
            Ok(Json(UploadResponse::success("create status: success")))
        }
        Err(e) => {
            warn!("tarball upload rejected for {}: {}", upload.username, e);
            Ok(Json(UploadResponse::failure(
                "create status: failure",
                e.to_string(),
            )))
        }
    }
}
