//! Handler for link metadata snapshots.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::ingest::IngestResponse;
use crate::api::dto::links::LinkMetadataRequest;
use crate::domain::events::EventStream;
use crate::error::AppError;
use crate::state::AppState;

/// Writes a link snapshot to the `dub_links_metadata` stream.
///
/// # Endpoint
///
/// `POST /api/links/metadata`
///
/// # Request Body
///
/// ```json
/// {
///   "link_id": "link_1",
///   "domain": "s.example.com",
///   "key": "promo",
///   "url": "https://example.com/landing",
///   "project_id": "proj_1",
///   "deleted": false
/// }
/// ```
///
/// Every call is written; repeated snapshots are not collapsed.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails and 500 if the event store
/// write fails.
pub async fn link_metadata_handler(
    State(state): State<AppState>,
    Json(payload): Json<LinkMetadataRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    payload.validate()?;

    let ack = state
        .dispatcher
        .record_link_metadata(&payload.snapshot(), payload.deleted)
        .await?;

    Ok(Json(IngestResponse::new(EventStream::LinksMetadata, ack)))
}
