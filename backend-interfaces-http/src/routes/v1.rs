use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    entity_handlers, event_handlers, link_handlers, ops_handlers, trace_handlers,
    tracking_handlers,
};

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entities",
            post(entity_handlers::create_entity).get(entity_handlers::list_entities),
        )
        .route(
            "/entities/external/:external_id",
            get(entity_handlers::get_entity_by_external_id),
        )
        .route(
            "/entities/:id",
            get(entity_handlers::get_entity)
                .patch(entity_handlers::update_entity)
                .delete(entity_handlers::delete_entity),
        )
        .route(
            "/events",
            post(event_handlers::create_event).get(event_handlers::list_events),
        )
        .route(
            "/events/entity/:id",
            get(event_handlers::list_entity_events),
        )
        .route(
            "/events/:id",
            get(event_handlers::get_event).delete(event_handlers::delete_event),
        )
        .route(
            "/links",
            post(link_handlers::create_link).delete(link_handlers::delete_link),
        )
        .route("/links/:id/children", get(link_handlers::get_children))
        .route("/links/:id/parents", get(link_handlers::get_parents))
        .route("/trace/:id", get(trace_handlers::trace_entity))
        .route("/trace/:id/tree", get(trace_handlers::entity_tree))
        .route("/tracking/package", post(tracking_handlers::create_package))
        .route(
            "/tracking/package/:tracking_number/event",
            post(tracking_handlers::add_package_event),
        )
        .route(
            "/tracking/track/:tracking_number",
            get(tracking_handlers::track_package),
        )
        .route("/tracking/packages", get(tracking_handlers::list_packages))
        .route("/tracking/stats", get(tracking_handlers::tracking_stats))
        .route("/metrics", get(ops_handlers::metrics_prometheus))
}

/// API routes served at the root and again under `/api/v1`, plus the ops endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops_handlers::root))
        .route("/health", get(ops_handlers::health))
        .route("/version", get(ops_handlers::version))
        .merge(api_routes())
        .nest("/api/v1", api_routes())
        .with_state(state)
}
