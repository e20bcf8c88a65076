use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod distribution;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;

// Module for routing segregation (Public, Authenticated, Editor).
pub mod routes;
use auth::AuthUser; // The resolved authenticated user identity.
use routes::{authenticated, editor, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use distribution::{MailRelay, NotifierState, SocialState, XClient};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// This struct auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas that have been decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all public handler functions here for documentation generation.
    paths(
        handlers::register_user, handlers::get_articles, handlers::get_article_details,
        handlers::get_newsletters, handlers::get_newsletter_details, handlers::get_me,
        handlers::get_my_articles, handlers::get_my_newsletters, handlers::create_article,
        handlers::update_article, handlers::delete_article, handlers::create_newsletter,
        handlers::update_newsletter, handlers::delete_newsletter, handlers::get_subscriptions,
        handlers::subscribe_journalist, handlers::unsubscribe_journalist,
        handlers::subscribe_publisher, handlers::unsubscribe_publisher, handlers::get_feed,
        handlers::get_available_publishers, handlers::request_affiliation,
        handlers::get_all_articles, handlers::get_pending_articles, handlers::approve_article,
        handlers::get_pending_requests, handlers::approve_affiliation_request,
        handlers::get_publishers, handlers::get_publisher_details, handlers::create_publisher,
        handlers::update_publisher, handlers::delete_publisher
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            models::Role, models::User, models::RegisterUserRequest,
            models::Article, models::CreateArticleRequest, models::UpdateArticleRequest,
            models::Newsletter, models::NewsletterDetail, models::CreateNewsletterRequest,
            models::UpdateNewsletterRequest, models::Publisher, models::PublisherDetail,
            models::CreatePublisherRequest, models::UpdatePublisherRequest,
            models::PublisherRequest, models::AffiliationRequestView,
            models::SubscriptionsView,
        )
    ),
    tags(
        (name = "newsroom", description = "Role-based news publishing API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and
/// immutable container holding all essential application services and configuration,
/// shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: Abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Notifier: Abstracts subscriber email dispatch behind the HTTP mail relay.
    pub notifier: NotifierState,
    /// Social Poster: Best-effort announcement client for article approvals.
    pub social: SocialState,
    /// Configuration: The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers and extractors to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for NotifierState {
    fn from_ref(app_state: &AppState) -> NotifierState {
        app_state.notifier.clone()
    }
}

impl FromRef<AppState> for SocialState {
    fn from_ref(app_state: &AppState) -> SocialState {
        app_state.social.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// A middleware function that enforces authentication for the `authenticated_routes`
/// and the nested editor router.
///
/// *Mechanism*: It attempts to extract `AuthUser` from the request. Since `AuthUser`
/// implements `FromRequestParts`, if authentication (JWT validation, DB lookup) fails,
/// the extractor immediately rejects the request with a 401 Unauthorized status,
/// preventing execution of the handler. If successful, the request proceeds and the
/// handler re-extracts the identity for its role check.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and scoped
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: No middleware applied.
        .merge(public::public_routes())
        // Authenticated Routes: Protected by the `auth_middleware`.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Editor Routes: Nested under '/editor', behind the same authentication
        // layer. The 'editor' role check is performed *inside* the handlers.
        .nest(
            "/editor",
            editor::editor_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: Wraps the request/response lifecycle in a
                // tracing span that carries the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns the x-request-id header to the
                // client and injects it into downstream service calls.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation. It extracts the
/// `x-request-id` header (if present) and includes it in the structured logging
/// metadata alongside the HTTP method and URI, so every log line for a single
/// request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
