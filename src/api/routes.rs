use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::{self, AppState};
use crate::gateway::CatalogGateway;

pub fn create_router<G: CatalogGateway + 'static>() -> Router<AppState<G>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/categories", get(handlers::list_categories::<G>))
        // Form sessions
        .route("/sessions", post(handlers::create_session::<G>))
        .route(
            "/sessions/:session_id",
            get(handlers::get_session::<G>).delete(handlers::delete_session::<G>),
        )
        .route(
            "/sessions/:session_id/category",
            post(handlers::select_category::<G>),
        )
        .route(
            "/sessions/:session_id/subcategory",
            post(handlers::select_subcategory::<G>),
        )
        .route(
            "/sessions/:session_id/fields/:property_id",
            put(handlers::set_field::<G>),
        )
        .route(
            "/sessions/:session_id/fields/:property_id/choices",
            get(handlers::list_choices::<G>),
        )
        .route("/sessions/:session_id/submit", post(handlers::submit::<G>))
        .layer(cors)
}
