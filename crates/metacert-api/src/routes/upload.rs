//! # Upload Endpoint
//!
//! `POST /upload` — accepts a multipart request with one binary `file`
//! field (original filename preserved as the pin name) and three text
//! fields `sname`, `title`, `desc`, publishes the two linked objects,
//! and answers with both references:
//!
//! ```json
//! { "pinataLink": "ipfs://<cid>", "jsonPinataLink": "https://<gateway>/ipfs/<cid>" }
//! ```

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use metacert_pin::Asset;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Success body of the upload endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Raw reference to the pinned artwork.
    #[serde(rename = "pinataLink")]
    pub pinata_link: String,
    /// Gateway-resolvable URL of the pinned metadata document — the
    /// string a mint transaction embeds on-chain.
    #[serde(rename = "jsonPinataLink")]
    pub json_pinata_link: String,
}

/// The multipart fields once extracted.
#[derive(Debug, Default)]
struct UploadFields {
    asset: Option<Asset>,
    sname: String,
    title: String,
    desc: String,
}

async fn read_fields(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?;
                fields.asset = Some(Asset {
                    bytes: bytes.to_vec(),
                    file_name,
                });
            }
            "sname" => {
                fields.sname = field
                    .text()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?
            }
            "title" => {
                fields.title = field
                    .text()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?
            }
            "desc" => {
                fields.desc = field
                    .text()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?
            }
            // Unknown fields (wallet addresses, UIDs destined for the
            // mint transaction) are the caller's business, not ours.
            _ => {}
        }
    }

    Ok(fields)
}

/// Publish an uploaded credential artwork and its metadata document.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Both objects pinned", body = UploadResponse),
        (status = 400, description = "No file uploaded", body = crate::error::ErrorBody),
        (status = 500, description = "Pinning service failure", body = crate::error::ErrorBody),
    ),
)]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let fields = read_fields(multipart).await?;
    let asset = fields.asset.ok_or(AppError::MissingFile)?;

    tracing::info!(
        file_name = %asset.file_name,
        size = asset.bytes.len(),
        subject = %fields.sname,
        "publishing uploaded credential content"
    );

    let published = state
        .publisher
        .publish(asset, &fields.sname, &fields.title, &fields.desc)
        .await?;

    Ok(Json(UploadResponse {
        pinata_link: published.asset_ref.to_string(),
        json_pinata_link: published.metadata_url,
    }))
}

/// Routes served by this module.
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload))
}
