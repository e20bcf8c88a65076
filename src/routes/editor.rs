use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Editor Router Module
///
/// Defines the routes exclusively accessible to users with the 'editor' role:
/// the approval queues (articles and affiliation requests) and publisher
/// management.
///
/// Access Control:
/// This entire router is nested under '/editor' and sits behind the
/// authentication layer; the `role='editor'` check is then performed inside
/// each handler via `policy`, so a journalist or reader reaching these paths
/// receives 403 rather than executing any moderation logic.
pub fn editor_routes() -> Router<AppState> {
    Router::new()
        // GET /editor/articles
        // Lists ALL articles in the system, including unapproved drafts.
        // Used for editorial oversight beyond the pending queue.
        .route("/articles", get(handlers::get_all_articles))
        // GET /editor/articles/pending
        // The approval queue: unapproved articles, newest first.
        .route("/articles/pending", get(handlers::get_pending_articles))
        // POST /editor/articles/{id}/approve
        // The core moderation endpoint: flips Draft -> Approved exactly once and
        // fires the subscriber mail + social fan-out on the winning call.
        .route("/articles/{id}/approve", post(handlers::approve_article))
        // GET /editor/requests/pending
        // Affiliation requests awaiting review, oldest first, with names resolved.
        .route("/requests/pending", get(handlers::get_pending_requests))
        // POST /editor/requests/{id}/approve
        // Approves an affiliation request; staff insertion and the approved flip
        // are coupled in one repository transaction.
        .route(
            "/requests/{id}/approve",
            post(handlers::approve_affiliation_request),
        )
        // --- Publisher Management ---
        // GET/POST /editor/publishers
        .route(
            "/publishers",
            get(handlers::get_publishers).post(handlers::create_publisher),
        )
        // GET/PUT/DELETE /editor/publishers/{id}
        // Detail view with staff sets; rename and membership replacement; deletion
        // detaches (never deletes) the publisher's articles.
        .route(
            "/publishers/{id}",
            get(handlers::get_publisher_details)
                .put(handlers::update_publisher)
                .delete(handlers::delete_publisher),
        )
}
