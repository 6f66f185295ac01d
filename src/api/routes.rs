use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/regions", get(handlers::list_regions))
        .route("/themes", get(handlers::list_themes))
        // Preferences
        .route("/preferences", get(handlers::get_preferences))
        .route(
            "/preferences/region",
            put(handlers::set_region).delete(handlers::clear_region),
        )
        .route("/preferences/theme", put(handlers::set_theme))
        // Vocabularies
        .route("/catalog/:media/genres", get(handlers::list_genres))
        .route("/catalog/:media/providers", get(handlers::list_providers))
        // Filters
        .route(
            "/filters",
            get(handlers::get_filters).delete(handlers::clear_filters),
        )
        .route("/filters/quick-genre/:id", post(handlers::toggle_quick_genre))
        .route("/filters/genres/:id", post(handlers::toggle_genre))
        .route("/filters/platforms/:id", post(handlers::toggle_platform))
        .route("/filters/indie", post(handlers::toggle_indie))
        // Watched / watchlist
        .route("/lists/:kind", get(handlers::get_list))
        .route("/lists/:kind/toggle", post(handlers::toggle_list_entry))
        // Discovery & navigation
        .route("/discover", post(handlers::discover))
        .route("/discover/status", get(handlers::discovery_status))
        .route("/titles/:media/:id", get(handlers::title_detail))
        .route("/search", get(handlers::search_titles))
        .route("/people/:id", get(handlers::person_detail))
        .layer(
            // Request id first so the trace span can pick it up
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
