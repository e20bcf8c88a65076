use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user who has passed the authentication
/// layer. Role-specific rules (journalist authorship, reader subscriptions,
/// affiliation requests) are enforced per-handler through `policy`, so a
/// journalist hitting a reader-only path receives 403, not 404.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware
/// being present on the router layer above this module. That guarantees every
/// handler receives a validated `AuthUser` carrying the user's ID and role,
/// which drives the Owner-Only checks (e.g. in `update_article`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Retrieves the currently authenticated user's canonical record.
        .route("/me", get(handlers::get_me))
        // GET /me/articles
        // Lists the caller's own articles including unapproved drafts.
        .route("/me/articles", get(handlers::get_my_articles))
        // GET /me/newsletters
        // Lists the caller's own newsletters.
        .route("/me/newsletters", get(handlers::get_my_newsletters))
        // --- Article Authoring (Journalist) ---
        // POST /articles
        // Submits a new article. Always created unapproved; the author is the session user.
        .route("/articles", post(handlers::create_article))
        // PUT/DELETE /articles/{id}
        // Modify or remove an article. Ownership (or the editor role) is enforced
        // within the handler logic; the payload cannot flip the approved flag.
        .route(
            "/articles/{id}",
            put(handlers::update_article).delete(handlers::delete_article),
        )
        // --- Newsletter Authoring (Journalist/Editor) ---
        .route("/newsletters", post(handlers::create_newsletter))
        .route(
            "/newsletters/{id}",
            put(handlers::update_newsletter).delete(handlers::delete_newsletter),
        )
        // --- Subscriptions (Reader) ---
        // GET /subscriptions
        // The reader's management view: current opt-ins plus the full catalog.
        .route("/subscriptions", get(handlers::get_subscriptions))
        // PUT/DELETE /subscriptions/journalists/{id}
        // Idempotent opt-in/opt-out on a journalist. The composite primary key on
        // the subscription table absorbs duplicate subscribes.
        .route(
            "/subscriptions/journalists/{id}",
            put(handlers::subscribe_journalist).delete(handlers::unsubscribe_journalist),
        )
        // PUT/DELETE /subscriptions/publishers/{id}
        .route(
            "/subscriptions/publishers/{id}",
            put(handlers::subscribe_publisher).delete(handlers::unsubscribe_publisher),
        )
        // GET /feed
        // Approved articles from subscribed journalists or publishers, deduplicated.
        .route("/feed", get(handlers::get_feed))
        // --- Affiliation (Journalist) ---
        // GET /affiliation/publishers
        // Publishers the journalist is not yet affiliated with.
        .route(
            "/affiliation/publishers",
            get(handlers::get_available_publishers),
        )
        // POST /affiliation/requests/{publisher_id}
        // Creates a pending affiliation request; duplicates surface as 409.
        .route(
            "/affiliation/requests/{publisher_id}",
            post(handlers::request_affiliation),
        )
}
