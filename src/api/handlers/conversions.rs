//! Handler for conversion events.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::conversions::ConversionRequest;
use crate::api::dto::ingest::IngestResponse;
use crate::domain::events::EventStream;
use crate::error::AppError;
use crate::state::AppState;

/// Writes a conversion to the `dub_conversion_events` stream.
///
/// # Endpoint
///
/// `POST /api/conversions`
///
/// # Request Body
///
/// ```json
/// {
///   "event_name": "Purchase",
///   "click_id": "Xq3v9bT0aLpQ2mZk",
///   "affiliate_id": "partner_7",
///   "properties": { "amount": 4900, "currency": "usd" }
/// }
/// ```
pub async fn conversion_handler(
    State(state): State<AppState>,
    Json(payload): Json<ConversionRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    payload.validate()?;

    let ack = state.dispatcher.record_conversion(payload.into()).await?;

    Ok(Json(IngestResponse::new(EventStream::Conversions, ack)))
}
