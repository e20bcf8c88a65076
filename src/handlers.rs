use crate::{
    AppState,
    auth::AuthUser,
    distribution::distribute_article,
    models::{
        self, AffiliationRequestView, Article, CreateArticleRequest, CreateNewsletterRequest,
        CreatePublisherRequest, Newsletter, NewsletterDetail, Publisher, PublisherDetail,
        RegisterUserRequest, Role, SubscriptionsView, UpdateArticleRequest,
        UpdateNewsletterRequest, UpdatePublisherRequest, User,
    },
    policy,
    repository::{AffiliationApproval, ArticleApproval},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

// --- Public Handlers ---

/// register_user
///
/// [Public Route] Creates a user record with a chosen role. Credential handling is
/// the identity provider's concern; this service persists identity and role only.
/// The role is immutable after this point: no endpoint updates it.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Registered", body = User),
        (status = 409, description = "Username taken")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let user = User {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        role: payload.role,
    };
    match state.repo.create_user(user).await {
        Some(created) => Ok((StatusCode::CREATED, Json(created))),
        // The unique username constraint is the usual failure here.
        None => Err(StatusCode::CONFLICT),
    }
}

/// get_articles
///
/// [Public Route] Lists approved articles, newest first.
///
/// *Security*: The repository applies `approved = true` unconditionally, so drafts
/// never leak to anonymous or reader callers.
#[utoipa::path(
    get,
    path = "/articles",
    responses((status = 200, description = "Approved articles", body = [Article]))
)]
pub async fn get_articles(State(state): State<AppState>) -> Json<Vec<models::Article>> {
    Json(state.repo.approved_articles().await)
}

/// get_article_details
///
/// [Public Route] Retrieves a single approved article. Unapproved articles are
/// indistinguishable from missing ones on this path; authors review drafts through
/// /me/articles and editors through /editor/articles.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Found", body = Article),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_article_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Article>, StatusCode> {
    match state.repo.get_approved_article(id).await {
        Some(article) => Ok(Json(article)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// get_newsletters
///
/// [Public Route] Lists newsletters. Newsletters carry no approval flag and are
/// visible as soon as they are created.
#[utoipa::path(
    get,
    path = "/newsletters",
    responses((status = 200, description = "Newsletters", body = [Newsletter]))
)]
pub async fn get_newsletters(State(state): State<AppState>) -> Json<Vec<models::Newsletter>> {
    Json(state.repo.list_newsletters().await)
}

/// get_newsletter_details
///
/// [Public Route] Retrieves a newsletter with its resolved article set.
#[utoipa::path(
    get,
    path = "/newsletters/{id}",
    params(("id" = Uuid, Path, description = "Newsletter ID")),
    responses(
        (status = 200, description = "Found", body = NewsletterDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_newsletter_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::NewsletterDetail>, StatusCode> {
    match state.repo.get_newsletter_detail(id).await {
        Some(detail) => Ok(Json(detail)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// --- Authenticated Handlers ---

/// get_me
///
/// [Authenticated Route] Returns the authenticated user's canonical record.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = User))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<models::User>, StatusCode> {
    state
        .repo
        .get_user(id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// get_my_articles
///
/// [Authenticated Route] Lists the caller's own articles, drafts included. This is
/// how journalists review unapproved work that the public listing hides.
#[utoipa::path(
    get,
    path = "/me/articles",
    responses((status = 200, description = "My Articles", body = [Article]))
)]
pub async fn get_my_articles(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::Article>> {
    Json(state.repo.articles_by_author(id).await)
}

/// get_my_newsletters
///
/// [Authenticated Route] Lists newsletters authored by the caller.
#[utoipa::path(
    get,
    path = "/me/newsletters",
    responses((status = 200, description = "My Newsletters", body = [Newsletter]))
)]
pub async fn get_my_newsletters(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<models::Newsletter>> {
    Json(state.repo.newsletters_by_author(id).await)
}

/// create_article
///
/// [Authenticated Route] Submits a new article. Journalist-only; the article is
/// always created unapproved and the author is taken from the session.
///
/// Publisher attribution is limited to outlets the journalist is affiliated with,
/// mirroring the affiliation handshake in the editor workflow.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Created", body = Article),
        (status = 403, description = "Not a journalist / not affiliated"),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn create_article(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<models::Article>), StatusCode> {
    if !policy::can_create_article(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    if let Some(publisher_id) = payload.publisher_id {
        if state.repo.get_publisher(publisher_id).await.is_none() {
            return Err(StatusCode::NOT_FOUND);
        }
        if !state.repo.is_affiliated(id, publisher_id).await {
            return Err(StatusCode::FORBIDDEN);
        }
    }
    match state.repo.create_article(payload, id).await {
        Some(article) => Ok((StatusCode::CREATED, Json(article))),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// update_article
///
/// [Authenticated Route] Modifies an article. Journalists edit their own work,
/// editors edit anything; the payload cannot touch the approved flag, so an
/// update never reverses an approval.
#[utoipa::path(
    put,
    path = "/articles/{id}",
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Updated", body = Article),
        (status = 403, description = "Not owner or editor"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_article(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<models::Article>, StatusCode> {
    let article = state
        .repo
        .get_article(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    if !policy::can_mutate_article(role, user_id, &article) {
        return Err(StatusCode::FORBIDDEN);
    }
    if let Some(publisher_id) = payload.publisher_id {
        // Journalists stay restricted to their affiliated outlets on re-attribution.
        if role == Role::Journalist && !state.repo.is_affiliated(user_id, publisher_id).await {
            return Err(StatusCode::FORBIDDEN);
        }
    }
    match state.repo.update_article(id, payload).await {
        Some(article) => Ok(Json(article)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_article
///
/// [Authenticated Route] Deletes an article. Owning journalist or any editor.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not owner or editor"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_article(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    let Some(article) = state.repo.get_article(id).await else {
        return StatusCode::NOT_FOUND;
    };
    if !policy::can_mutate_article(role, user_id, &article) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_article(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// create_newsletter
///
/// [Authenticated Route] Creates a newsletter bundling existing articles.
/// Journalists and editors only.
#[utoipa::path(
    post,
    path = "/newsletters",
    request_body = CreateNewsletterRequest,
    responses(
        (status = 201, description = "Created", body = Newsletter),
        (status = 403, description = "Readers cannot author newsletters")
    )
)]
pub async fn create_newsletter(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateNewsletterRequest>,
) -> Result<(StatusCode, Json<models::Newsletter>), StatusCode> {
    if !policy::can_create_newsletter(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.create_newsletter(payload, id).await {
        Some(newsletter) => Ok((StatusCode::CREATED, Json(newsletter))),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// update_newsletter
///
/// [Authenticated Route] Modifies a newsletter; owning author or any editor.
#[utoipa::path(
    put,
    path = "/newsletters/{id}",
    request_body = UpdateNewsletterRequest,
    responses(
        (status = 200, description = "Updated", body = Newsletter),
        (status = 403, description = "Not owner or editor"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_newsletter(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNewsletterRequest>,
) -> Result<Json<models::Newsletter>, StatusCode> {
    let newsletter = state
        .repo
        .get_newsletter(id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    if !policy::can_mutate_newsletter(role, user_id, &newsletter) {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.update_newsletter(id, payload).await {
        Some(newsletter) => Ok(Json(newsletter)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_newsletter
///
/// [Authenticated Route] Deletes a newsletter; owning author or any editor.
#[utoipa::path(
    delete,
    path = "/newsletters/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not owner or editor"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_newsletter(
    AuthUser { id: user_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    let Some(newsletter) = state.repo.get_newsletter(id).await else {
        return StatusCode::NOT_FOUND;
    };
    if !policy::can_mutate_newsletter(role, user_id, &newsletter) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_newsletter(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// --- Subscription Handlers (Reader) ---

/// get_subscriptions
///
/// [Authenticated Route] The reader's subscription management view: current
/// opt-in sets plus the catalog of journalists and publishers.
#[utoipa::path(
    get,
    path = "/subscriptions",
    responses(
        (status = 200, description = "Subscriptions", body = SubscriptionsView),
        (status = 403, description = "Readers only")
    )
)]
pub async fn get_subscriptions(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<models::SubscriptionsView>, StatusCode> {
    if !policy::can_manage_subscriptions(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.subscriptions_view(id).await))
}

/// subscribe_journalist
///
/// [Authenticated Route] Opts the reader into a journalist's articles.
///
/// *Idempotency*: subscribing twice is a no-op success; the composite primary key
/// on the subscription table absorbs the duplicate.
#[utoipa::path(
    put,
    path = "/subscriptions/journalists/{id}",
    params(("id" = Uuid, Path, description = "Journalist ID")),
    responses(
        (status = 200, description = "Subscribed"),
        (status = 403, description = "Readers only"),
        (status = 404, description = "No such journalist")
    )
)]
pub async fn subscribe_journalist(
    AuthUser { id: reader_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_manage_subscriptions(role) {
        return StatusCode::FORBIDDEN;
    }
    // The target must exist AND be a journalist; a reader or editor id is a 404.
    match state.repo.get_user(id).await {
        Some(target) if target.role == Role::Journalist => {}
        _ => return StatusCode::NOT_FOUND,
    }
    if state.repo.subscribe_journalist(reader_id, id).await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// unsubscribe_journalist
///
/// [Authenticated Route] Removes a journalist subscription. No-op success when
/// the subscription did not exist.
#[utoipa::path(
    delete,
    path = "/subscriptions/journalists/{id}",
    params(("id" = Uuid, Path, description = "Journalist ID")),
    responses(
        (status = 200, description = "Unsubscribed"),
        (status = 403, description = "Readers only")
    )
)]
pub async fn unsubscribe_journalist(
    AuthUser { id: reader_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_manage_subscriptions(role) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.unsubscribe_journalist(reader_id, id).await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// subscribe_publisher
///
/// [Authenticated Route] Opts the reader into a publisher's articles. Idempotent.
#[utoipa::path(
    put,
    path = "/subscriptions/publishers/{id}",
    params(("id" = Uuid, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Subscribed"),
        (status = 403, description = "Readers only"),
        (status = 404, description = "No such publisher")
    )
)]
pub async fn subscribe_publisher(
    AuthUser { id: reader_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_manage_subscriptions(role) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.get_publisher(id).await.is_none() {
        return StatusCode::NOT_FOUND;
    }
    if state.repo.subscribe_publisher(reader_id, id).await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// unsubscribe_publisher
///
/// [Authenticated Route] Removes a publisher subscription. No-op success when
/// the subscription did not exist.
#[utoipa::path(
    delete,
    path = "/subscriptions/publishers/{id}",
    params(("id" = Uuid, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Unsubscribed"),
        (status = 403, description = "Readers only")
    )
)]
pub async fn unsubscribe_publisher(
    AuthUser { id: reader_id, role }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_manage_subscriptions(role) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.unsubscribe_publisher(reader_id, id).await {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// get_feed
///
/// [Authenticated Route] The reader's personalized feed: approved articles whose
/// author or publisher the reader has subscribed to, deduplicated.
#[utoipa::path(
    get,
    path = "/feed",
    responses(
        (status = 200, description = "Subscribed articles", body = [Article]),
        (status = 403, description = "Readers only")
    )
)]
pub async fn get_feed(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Article>>, StatusCode> {
    if !policy::can_manage_subscriptions(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.feed(id).await))
}

// --- Affiliation Handlers (Journalist) ---

/// get_available_publishers
///
/// [Authenticated Route] Publishers the journalist is NOT yet affiliated with,
/// i.e. the candidates for a new affiliation request.
#[utoipa::path(
    get,
    path = "/affiliation/publishers",
    responses(
        (status = 200, description = "Available publishers", body = [Publisher]),
        (status = 403, description = "Journalists only")
    )
)]
pub async fn get_available_publishers(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Publisher>>, StatusCode> {
    if !policy::can_request_affiliation(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.publishers_not_affiliated(id).await))
}

/// request_affiliation
///
/// [Authenticated Route] Creates a pending affiliation request for the caller.
///
/// *Idempotency*: the uniqueness constraint on (journalist, publisher) guarantees
/// at most one row per pair; a repeat attempt surfaces 409 so the caller can tell
/// "already requested" from a fresh submission.
#[utoipa::path(
    post,
    path = "/affiliation/requests/{publisher_id}",
    params(("publisher_id" = Uuid, Path, description = "Publisher ID")),
    responses(
        (status = 201, description = "Request created"),
        (status = 403, description = "Journalists only"),
        (status = 404, description = "No such publisher"),
        (status = 409, description = "Already requested")
    )
)]
pub async fn request_affiliation(
    AuthUser { id, role }: AuthUser,
    State(state): State<AppState>,
    Path(publisher_id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_request_affiliation(role) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.get_publisher(publisher_id).await.is_none() {
        return StatusCode::NOT_FOUND;
    }
    if state.repo.create_affiliation_request(id, publisher_id).await {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    }
}

// --- Editor Handlers ---

/// get_all_articles
///
/// [Editor Route] Every article in the system, approved or not.
#[utoipa::path(
    get,
    path = "/editor/articles",
    responses((status = 200, description = "All articles", body = [Article]))
)]
pub async fn get_all_articles(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Article>>, StatusCode> {
    if role != Role::Editor {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.all_articles().await))
}

/// get_pending_articles
///
/// [Editor Route] The approval queue: unapproved articles, newest first.
#[utoipa::path(
    get,
    path = "/editor/articles/pending",
    responses((status = 200, description = "Pending articles", body = [Article]))
)]
pub async fn get_pending_articles(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Article>>, StatusCode> {
    if role != Role::Editor {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.pending_articles().await))
}

/// approve_article
///
/// [Editor Route] The core lifecycle transition: Draft to Approved, one-directional.
///
/// Exactly one caller wins a concurrent approval; only the winner fires the
/// distribution fan-out (subscriber mail + best-effort social post). The fan-out
/// runs after the state change is durable and its failures never surface here:
/// the approval's correctness is the persisted flag, not delivery.
#[utoipa::path(
    post,
    path = "/editor/articles/{id}/approve",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Approved and distributed", body = Article),
        (status = 403, description = "Editors only"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already approved"),
        (status = 500, description = "Storage failure, approval state unknown")
    )
)]
pub async fn approve_article(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Article>, StatusCode> {
    if !policy::can_approve_article(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.approve_article(id).await {
        ArticleApproval::Approved(article) => {
            let recipients = state
                .repo
                .subscriber_emails(article.author_id, article.publisher_id)
                .await;
            distribute_article(&state.notifier, &state.social, &article, &recipients).await;
            Ok(Json(article))
        }
        ArticleApproval::AlreadyApproved => Err(StatusCode::CONFLICT),
        ArticleApproval::NotFound => Err(StatusCode::NOT_FOUND),
        // Conflict means "already done"; a storage failure is neither success
        // nor conflict and must stay distinguishable.
        ArticleApproval::Failed => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// get_pending_requests
///
/// [Editor Route] All unapproved affiliation requests, oldest first, enriched with
/// journalist and publisher names for the review queue.
#[utoipa::path(
    get,
    path = "/editor/requests/pending",
    responses((status = 200, description = "Pending requests", body = [AffiliationRequestView]))
)]
pub async fn get_pending_requests(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::AffiliationRequestView>>, StatusCode> {
    if !policy::can_approve_affiliation(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.pending_affiliation_requests().await))
}

/// approve_affiliation_request
///
/// [Editor Route] Approves a journalist's affiliation request. The repository
/// couples the staff insertion and the approved flip in one transaction, so no
/// partial approval is ever observable. Re-approving is an idempotent success.
#[utoipa::path(
    post,
    path = "/editor/requests/{id}/approve",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Approved"),
        (status = 403, description = "Editors only"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn approve_affiliation_request(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_approve_affiliation(role) {
        return StatusCode::FORBIDDEN;
    }
    match state.repo.approve_affiliation_request(id).await {
        AffiliationApproval::Approved | AffiliationApproval::AlreadyApproved => StatusCode::OK,
        AffiliationApproval::NotFound => StatusCode::NOT_FOUND,
    }
}

/// get_publishers
///
/// [Editor Route] Lists publishers for the management screen.
#[utoipa::path(
    get,
    path = "/editor/publishers",
    responses((status = 200, description = "Publishers", body = [Publisher]))
)]
pub async fn get_publishers(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Publisher>>, StatusCode> {
    if !policy::can_manage_publishers(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(Json(state.repo.list_publishers().await))
}

/// get_publisher_details
///
/// [Editor Route] A publisher with its resolved editor and journalist staff sets.
#[utoipa::path(
    get,
    path = "/editor/publishers/{id}",
    params(("id" = Uuid, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Found", body = PublisherDetail),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_publisher_details(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::PublisherDetail>, StatusCode> {
    if !policy::can_manage_publishers(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.get_publisher_detail(id).await {
        Some(detail) => Ok(Json(detail)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// create_publisher
///
/// [Editor Route] Creates a publisher with its initial staff assignment.
#[utoipa::path(
    post,
    path = "/editor/publishers",
    request_body = CreatePublisherRequest,
    responses(
        (status = 201, description = "Created", body = Publisher),
        (status = 403, description = "Editors only")
    )
)]
pub async fn create_publisher(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePublisherRequest>,
) -> Result<(StatusCode, Json<models::Publisher>), StatusCode> {
    if !policy::can_manage_publishers(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.create_publisher(payload).await {
        Some(publisher) => Ok((StatusCode::CREATED, Json(publisher))),
        None => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// update_publisher
///
/// [Editor Route] Renames a publisher and/or replaces its staff membership sets.
#[utoipa::path(
    put,
    path = "/editor/publishers/{id}",
    request_body = UpdatePublisherRequest,
    responses(
        (status = 200, description = "Updated", body = Publisher),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_publisher(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePublisherRequest>,
) -> Result<Json<models::Publisher>, StatusCode> {
    if !policy::can_manage_publishers(role) {
        return Err(StatusCode::FORBIDDEN);
    }
    match state.repo.update_publisher(id, payload).await {
        Some(publisher) => Ok(Json(publisher)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// delete_publisher
///
/// [Editor Route] Deletes a publisher. Articles that referenced it are detached
/// (publisher_id set NULL by the FK), never deleted with it.
#[utoipa::path(
    delete,
    path = "/editor/publishers/{id}",
    params(("id" = Uuid, Path, description = "Publisher ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_publisher(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if !policy::can_manage_publishers(role) {
        return StatusCode::FORBIDDEN;
    }
    if state.repo.delete_publisher(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
