use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in). These routes cover the open reading surface of the
/// platform plus the registration gateway.
///
/// Security Mandate:
/// Every article retrieval handler in this module must enforce `approved=true`
/// at the Repository level. Drafts awaiting editorial review are never served
/// from these paths.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /register
        // Creates a user with a chosen role. Credential management belongs to the
        // identity provider; this service records identity and role only.
        .route("/register", post(handlers::register_user))
        // GET /articles
        // Lists approved articles, newest first. Critical enforcement of
        // `approved=true` occurs in the handler's Repository query.
        .route("/articles", get(handlers::get_articles))
        // GET /articles/{id}
        // Retrieves one approved article. Unapproved ids return 404, making drafts
        // indistinguishable from missing rows on the public surface.
        .route("/articles/{id}", get(handlers::get_article_details))
        // GET /newsletters
        // Lists newsletters. No approval flag exists on newsletters; they are
        // public on creation.
        .route("/newsletters", get(handlers::get_newsletters))
        // GET /newsletters/{id}
        // Retrieves one newsletter with its resolved article set.
        .route("/newsletters/{id}", get(handlers::get_newsletter_details))
}
