use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// The closed set of roles a user can hold. Stored as the Postgres enum `user_role`
/// and serialized lowercase on the wire. All authorization decisions branch on this
/// type (see `policy.rs`) instead of comparing raw strings at call sites.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Reader,
    Journalist,
    Editor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Reader => write!(f, "reader"),
            Role::Journalist => write!(f, "journalist"),
            Role::Editor => write!(f, "editor"),
        }
    }
}

/// User
///
/// The canonical identity record from the `users` table. The role is assigned at
/// registration and immutable afterwards; no update operation touches it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    // Notification mails are addressed here.
    pub email: String,
    pub role: Role,
}

/// Publisher
///
/// A publishing outlet. Staff membership (editors, journalists) lives in the
/// `publisher_editors` / `publisher_journalists` join tables.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Publisher {
    pub id: Uuid,
    pub name: String,
}

/// PublisherDetail
///
/// A publisher together with its resolved staff sets. Assembled by the repository
/// from the join tables; used by the editor management endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PublisherDetail {
    pub id: Uuid,
    pub name: String,
    pub editors: Vec<User>,
    pub journalists: Vec<User>,
}

/// PublisherRequest
///
/// A journalist's pending (or approved) affiliation request. The database enforces
/// UNIQUE (journalist_id, publisher_id), which is what makes request creation
/// idempotent per pair. Approval is one-directional; requests are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct PublisherRequest {
    pub id: Uuid,
    pub journalist_id: Uuid,
    pub publisher_id: Uuid,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// AffiliationRequestView
///
/// Enriched pending-request row for the editor queue, joined with the journalist's
/// username and the publisher's name (same pattern as enriched notification rows).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct AffiliationRequestView {
    pub id: Uuid,
    pub journalist_id: Uuid,
    pub journalist_username: String,
    pub publisher_id: Uuid,
    pub publisher_name: String,
    pub created_at: DateTime<Utc>,
}

/// Article
///
/// A news article. Created unapproved by a journalist; `approved` flips to true
/// exactly once via the editor approval endpoint and is never reset. The publisher
/// reference is nullable: deleting a publisher detaches its articles (SET NULL)
/// rather than deleting them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub publisher_id: Option<Uuid>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Newsletter
///
/// A curated bundle of articles. Newsletters carry no approval flag and are always
/// visible once created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Newsletter {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// NewsletterDetail
///
/// A newsletter with its article set resolved from `newsletter_articles`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct NewsletterDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub articles: Vec<Article>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterUserRequest
///
/// Input payload for the public registration endpoint (POST /register).
/// Credential handling lives with the external auth provider; this service only
/// records the identity and the chosen role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// CreateArticleRequest
///
/// Input payload for submitting a new article (POST /articles). The article is
/// always created unapproved; the author is taken from the authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    /// Optional publisher attribution. Must be a publisher the journalist is
    /// affiliated with; validated in the handler.
    pub publisher_id: Option<Uuid>,
}

/// UpdateArticleRequest
///
/// Partial update payload for PUT /articles/{id}. Only provided fields change;
/// the approved flag is deliberately not part of this payload, so no update can
/// reset an approval.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<Uuid>,
}

/// CreateNewsletterRequest
///
/// Input payload for POST /newsletters, including the bundled article ids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateNewsletterRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub article_ids: Vec<Uuid>,
}

/// UpdateNewsletterRequest
///
/// Partial update payload for PUT /newsletters/{id}. When `article_ids` is
/// provided it replaces the newsletter's article set wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateNewsletterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_ids: Option<Vec<Uuid>>,
}

/// CreatePublisherRequest
///
/// Editor payload for creating a publisher with its initial staff assignment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreatePublisherRequest {
    pub name: String,
    #[serde(default)]
    pub journalist_ids: Vec<Uuid>,
    #[serde(default)]
    pub editor_ids: Vec<Uuid>,
}

/// UpdatePublisherRequest
///
/// Editor payload for renaming a publisher and/or replacing its staff sets.
/// Provided id lists replace the corresponding membership set wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdatePublisherRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub journalist_ids: Option<Vec<Uuid>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_ids: Option<Vec<Uuid>>,
}

// --- Reader-facing Output Schemas ---

/// SubscriptionsView
///
/// Output for GET /subscriptions: the reader's current opt-in sets plus the
/// catalog of journalists and publishers available to subscribe to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct SubscriptionsView {
    pub subscribed_journalists: Vec<User>,
    pub subscribed_publishers: Vec<Publisher>,
    pub journalists: Vec<User>,
    pub publishers: Vec<Publisher>,
}
