//! Image upload endpoint

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    services::upload::UploadedImage,
    AppState,
};

/// Multipart form accepted by the upload endpoint
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadForm {
    /// Image to compress
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Previous image being replaced
    pub old_file_url: Option<String>,
}

/// Upload and compress an image
#[utoipa::path(
    post,
    path = "/upload",
    tag = "upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored as a data URL", body = UploadedImage),
        (status = 400, description = "Missing or unreadable image", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadedImage>> {
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut old_file_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            "oldFileUrl" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field: {}", e)))?;
                old_file_url = Some(text);
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if let Some(old) = old_file_url.filter(|url| url.starts_with("data:")) {
        // Data URLs live on the record itself; there is nothing to delete
        let preview: String = old.chars().take(50).collect();
        tracing::debug!("Replacing previous upload {}...", preview);
    }

    let uploaded = state
        .services
        .upload
        .process_image(filename, content_type.as_deref(), bytes)
        .await?;
    Ok(Json(uploaded))
}
