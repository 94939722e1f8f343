use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates the Authorization Bearer header
/// and adds `DoctorClaims` to the request.
/// Usage: `.route_layer(middleware::from_fn_with_state(state.clone(), auth::jwt_auth))`
/// Handlers can then extract `Extension(claims): Extension<DoctorClaims>`.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Authorization header required".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    let claims = match state.token_config.validate_token(token.trim()) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(email = %claims.email, "Authentication successful, adding claims to request");

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DoctorClaims;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt; // for `oneshot`

    async fn whoami(Extension(claims): Extension<DoctorClaims>) -> String {
        claims.email
    }

    fn protected_app() -> (Router, AppState) {
        let state = AppStateBuilder::new().build();
        let app = Router::new()
            .route("/protected", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
            .with_state(state.clone());
        (app, state)
    }

    async fn status_for(app: Router, auth_header: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method("GET").uri("/protected");
        if let Some(value) = auth_header {
            builder = builder.header("Authorization", value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let (app, state) = protected_app();
        let token = state.token_config.issue_token("doc@example.com").unwrap();

        let (status, body) = status_for(app, Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "doc@example.com");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (app, _) = protected_app();
        let (status, body) = status_for(app, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authorization header required"));
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_unauthorized() {
        let (app, state) = protected_app();
        let token = state.token_config.issue_token("doc@example.com").unwrap();

        let (status, _) = status_for(app, Some(&format!("Basic {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let (app, _) = protected_app();
        let (status, body) = status_for(app, Some("Bearer not.a.token")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
    }
}
