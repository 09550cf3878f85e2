//! Handler for client logo uploads.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use helios_core::logo::logo_extension;
use helios_core::types::DbId;
use helios_db::repositories::ClientRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a stored logo.
#[derive(Debug, Serialize)]
pub struct LogoUploadResponse {
    pub url: String,
    pub file_name: String,
    /// Client whose `logo_url` was updated, if one was named.
    pub client_id: Option<DbId>,
}

/// POST /api/v1/uploads/logo
///
/// Multipart form with a required `file` field and an optional `client_id`
/// field. The logo is stored content-addressed; when `client_id` is given the
/// client's `logo_url` is pointed at it.
pub async fn upload_logo(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<LogoUploadResponse>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;
    let mut client_id: Option<DbId> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            "client_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let id = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("Invalid client_id '{text}'")))?;
                client_id = Some(id);
            }
            _ => {}
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    let ext = logo_extension(&filename)?;

    if let Some(id) = client_id {
        if !ClientRepo::exists(&state.pool, id).await? {
            return Err(AppError::not_found("Client", id));
        }
    }

    let stored = state
        .logo_store
        .store(&data, &ext)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store logo: {e}")))?;

    if let Some(id) = client_id {
        ClientRepo::set_logo_url(&state.pool, id, &stored.url)
            .await?
            .ok_or(AppError::not_found("Client", id))?;
    }

    tracing::info!(
        file_name = %stored.file_name,
        bytes = data.len(),
        client_id,
        uploaded_by = admin.user_id,
        "Logo stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LogoUploadResponse {
                url: stored.url,
                file_name: stored.file_name,
                client_id,
            },
        }),
    ))
}
