//! HTTP API handlers
//!
//! One module per endpoint group:
//! - `health` - health check
//! - `tar` - tar-creation mission (source file downloads, tarball upload)
//! - `untar` - extraction mission (reference tarball download, file upload)
//! - `status` - per-person completed-missions map

mod health;
mod status;
mod tar;
mod untar;

pub use health::{health_check, health_routes};
pub use status::mission_status;
pub use tar::{tar_file_download, tar_upload};
pub use untar::{extract_download, extract_upload};

use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::{ApiError, ApiResult};

/// Upload outcome. `status` carries the textual token the calling surface
/// matches on; `reason` explains failures in user-readable terms.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UploadResponse {
    pub fn success(token: &str) -> Self {
        Self {
            status: token.to_string(),
            reason: None,
        }
    }

    pub fn failure(token: &str, reason: String) -> Self {
        Self {
            status: token.to_string(),
            reason: Some(reason),
        }
    }
}

/// A parsed mission upload: who is submitting, and the file bytes
pub(crate) struct MissionUpload {
    pub username: String,
    pub bytes: Vec<u8>,
}

/// Read `username` plus the named file field out of a multipart request.
/// Unknown extra fields are ignored.
pub(crate) async fn read_upload(
    mut multipart: Multipart,
    file_field: &str,
) -> ApiResult<MissionUpload> {
    let mut username: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Malformed multipart request: {}", e))
    })? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("username") => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Unreadable username field: {}", e))
                })?;
                username = Some(value);
            }
            Some(name) if name == file_field => {
                let value = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Unreadable {} field: {}", file_field, e))
                })?;
                bytes = Some(value.to_vec());
            }
            _ => {}
        }
    }

    let username = username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing username field".to_string()))?;
    let bytes = bytes
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} field", file_field)))?;

    Ok(MissionUpload { username, bytes })
}

/// Serve bytes as a named download attachment
pub(crate) fn attachment(filename: &str, content_type: &'static str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}
