use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::jwt_auth;
use crate::shared::{AppState, MessageResponse};
use crate::{client, doctor, program};

/// Builds the full HTTP surface: resource groups, the bearer-token gate on
/// the protected client routes, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .nest("/clients", client_routes(state.clone()))
        .nest("/doctors", doctor_routes())
        .nest("/programs", program_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}

fn client_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/program-enroll", post(client::enroll_client))
        .route("/clients", get(client::list_clients))
        .route("/update", put(client::update_client))
        .route("/delete", delete(client::delete_client))
        .route(
            "/prescription",
            post(client::create_prescription).put(client::update_prescription),
        )
        .route("/prescriptions", post(client::list_prescriptions))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth));

    Router::new()
        .route("/register", post(client::register_client))
        .route("/search", post(client::search_client))
        .merge(protected)
}

fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(doctor::register_doctor))
        .route("/login", post(doctor::login_doctor))
}

fn program_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(program::register_program))
        .route("/all", get(program::list_programs))
}
