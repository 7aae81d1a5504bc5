//! Handler for the click-recording redirect.

use axum::{
    extract::{ConnectInfo, Path, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};
use validator::Validate;

use crate::api::dto::clicks::RedirectQuery;
use crate::application::services::dispatcher::validate_click;
use crate::domain::entities::InboundRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Records a click and redirects the visitor.
///
/// Called by the link-serving edge with the visitor's headers and the
/// ingestion API token.
///
/// # Endpoint
///
/// `GET /r/{resource_id}?url=..&root=..&click_id=..&via=..`
///
/// # Request Flow
///
/// 1. Validate the query (URL, click id, affiliate)
/// 2. Spawn click recording in the background
/// 3. Return immediately, never waiting on any store
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: to `url`
/// - **204 No Content**: no `url` given, click recorded only
/// - **400 Bad Request**: malformed query
/// - **401 Unauthorized**: missing or invalid token
pub async fn redirect_handler(
    Path(resource_id): Path<String>,
    Query(query): Query<RedirectQuery>,
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    query.validate()?;

    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let (parts, _body) = request.into_parts();
    let inbound = InboundRequest::new(parts.headers, parts.uri, peer_ip);

    let input = query.into_click_input(resource_id);
    validate_click(&input)?;
    let destination = input.url.clone();

    let dispatcher = Arc::clone(&state.dispatcher);
    tokio::spawn(async move {
        let resource_id = input.resource_id.clone();
        match dispatcher.record_click(inbound, input).await {
            Ok(Some(outcomes)) => debug!(
                "Click on {} dispatched to {} destinations",
                resource_id,
                outcomes.len()
            ),
            Ok(None) => debug!("Click on {} not recorded", resource_id),
            Err(e) => warn!("Click on {} rejected: {}", resource_id, e),
        }
    });

    Ok(match destination {
        Some(url) => Redirect::temporary(&url).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
