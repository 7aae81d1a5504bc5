//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

use crate::{error::AppError, state::AppState};

/// Shared secret callers present on `/api/*`.
///
/// Only the SHA-256 digest is kept. Comparison runs over the full digest so
/// timing does not depend on where the presented token diverges.
#[derive(Clone)]
pub struct ApiToken {
    digest: Arc<[u8; 32]>,
}

impl ApiToken {
    pub fn new(token: &str) -> Self {
        Self {
            digest: Arc::new(Self::hash(token)),
        }
    }

    fn hash(token: &str) -> [u8; 32] {
        Sha256::digest(token.as_bytes()).into()
    }

    pub fn verify(&self, presented: &str) -> bool {
        let presented = Self::hash(presented);
        self.digest
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header
/// is missing, malformed, or carries the wrong token.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/conversions", post(conversion_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    if !st.api_token.verify(&token) {
        tracing::warn!("Rejected request to {} with invalid token", parts.uri.path());
        return Err(AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({"reason": "Invalid token"}),
        ));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let token = ApiToken::new("s3cret-token");
        assert!(token.verify("s3cret-token"));
        assert!(!token.verify("s3cret-tokeN"));
        assert!(!token.verify(""));
    }

    #[test]
    fn test_debug_hides_token() {
        let token = ApiToken::new("s3cret-token");
        assert_eq!(format!("{:?}", token), "ApiToken(***)");
    }
}
