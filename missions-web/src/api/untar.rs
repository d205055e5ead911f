//! Extraction mission endpoints
//!
//! The user downloads the reference tarball, extracts one specific member,
//! and uploads that file back unchanged.

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use tracing::{info, warn};

use missions_common::config::STEP_TAR_EXTRACT;
use missions_common::FileContentValidator;

use crate::api::{attachment, read_upload, UploadResponse};
use crate::{ApiResult, AppState};

/// GET /missions/tar/extract/download
///
/// Serve the reference tarball as a download attachment.
pub async fn extract_download(State(state): State<AppState>) -> Response {
    attachment(
        state.reference.tarball_name(),
        "application/gzip",
        state.reference.bytes().to_vec(),
    )
}

/// POST /missions/tar/extract/upload
///
/// Multipart fields: `username`, `extracted_file`. Compares the uploaded
/// bytes against the member extracted from the reference tarball and
/// records completion of the `tar_extract` step on success.
pub async fn extract_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload = read_upload(multipart, "extracted_file").await?;

    let validator = FileContentValidator::new(state.reference.wanted_bytes());
    match validator.validate(&upload.bytes) {
        Ok(()) => {
            state
                .completions
                .record(&upload.username, STEP_TAR_EXTRACT)
                .await;
            info!("extracted file accepted for {}", upload.username);
            Ok(Json(UploadResponse::success("unpack status: success")))
        }
        Err(e) => {
            warn!("extracted file rejected for {}: {}", upload.username, e);
            Ok(Json(UploadResponse::failure(
                "unpack status: failure",
                e.to_string(),
            )))
        }
    }
}
