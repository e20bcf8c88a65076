use crate::models::{
    AffiliationRequestView, Article, CreateArticleRequest, CreateNewsletterRequest,
    CreatePublisherRequest, Newsletter, NewsletterDetail, Publisher, PublisherDetail,
    PublisherRequest, Role, SubscriptionsView, UpdateArticleRequest, UpdateNewsletterRequest,
    UpdatePublisherRequest, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// ArticleApproval
///
/// Outcome of the conditional approval flip. The variants map directly to the
/// handler's 200/409/404/500 responses. `Approved` carries the fresh row because
/// the distribution fan-out needs the title, content, author, and publisher.
/// `Failed` is a storage/transport error: the article's state is unknown and the
/// caller must not report it as a conflict.
#[derive(Debug, Clone)]
pub enum ArticleApproval {
    Approved(Article),
    AlreadyApproved,
    NotFound,
    Failed,
}

/// AffiliationApproval
///
/// Outcome of approving a publisher affiliation request. `AlreadyApproved` is an
/// idempotent no-op for the caller, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffiliationApproval {
    Approved,
    AlreadyApproved,
    NotFound,
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn create_user(&self, user: User) -> Option<User>;
    // Catalog listing for the subscription management view.
    async fn list_users_by_role(&self, role: Role) -> Vec<User>;

    // --- Article Retrieval ---
    // Public listing. Must enforce approved=true.
    async fn approved_articles(&self) -> Vec<Article>;
    // Editor access: every article regardless of approval state.
    async fn all_articles(&self) -> Vec<Article>;
    // Editor approval queue: unapproved articles, newest first.
    async fn pending_articles(&self) -> Vec<Article>;
    // Journalist's own articles, drafts included.
    async fn articles_by_author(&self, author_id: Uuid) -> Vec<Article>;
    // Unrestricted fetch; callers decide visibility via policy.
    async fn get_article(&self, id: Uuid) -> Option<Article>;
    // Public detail fetch: approved articles only.
    async fn get_approved_article(&self, id: Uuid) -> Option<Article>;

    // --- Article Mutation ---
    async fn create_article(&self, req: CreateArticleRequest, author_id: Uuid) -> Option<Article>;
    // Partial update; never touches the approved flag. Authorization happens in the handler.
    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> Option<Article>;
    async fn delete_article(&self, id: Uuid) -> bool;
    // Conditional one-way flip. Concurrent approvals serialize on the WHERE clause:
    // exactly one caller observes `Approved`.
    async fn approve_article(&self, id: Uuid) -> ArticleApproval;

    // --- Distribution ---
    // Recipient set for an approval: union of readers subscribed to the author and
    // readers subscribed to the publisher, distinct, blank addresses dropped.
    async fn subscriber_emails(&self, author_id: Uuid, publisher_id: Option<Uuid>) -> Vec<String>;

    // --- Newsletters ---
    async fn list_newsletters(&self) -> Vec<Newsletter>;
    async fn get_newsletter(&self, id: Uuid) -> Option<Newsletter>;
    async fn get_newsletter_detail(&self, id: Uuid) -> Option<NewsletterDetail>;
    async fn newsletters_by_author(&self, author_id: Uuid) -> Vec<Newsletter>;
    async fn create_newsletter(
        &self,
        req: CreateNewsletterRequest,
        author_id: Uuid,
    ) -> Option<Newsletter>;
    async fn update_newsletter(&self, id: Uuid, req: UpdateNewsletterRequest)
    -> Option<Newsletter>;
    async fn delete_newsletter(&self, id: Uuid) -> bool;

    // --- Publishers ---
    async fn list_publishers(&self) -> Vec<Publisher>;
    async fn get_publisher(&self, id: Uuid) -> Option<Publisher>;
    async fn get_publisher_detail(&self, id: Uuid) -> Option<PublisherDetail>;
    async fn create_publisher(&self, req: CreatePublisherRequest) -> Option<Publisher>;
    async fn update_publisher(&self, id: Uuid, req: UpdatePublisherRequest) -> Option<Publisher>;
    // Articles referencing the publisher are detached (FK SET NULL), not deleted.
    async fn delete_publisher(&self, id: Uuid) -> bool;
    // Whether the journalist is on the publisher's staff. Gates article attribution.
    async fn is_affiliated(&self, journalist_id: Uuid, publisher_id: Uuid) -> bool;

    // --- Affiliation Workflow ---
    // Publishers the journalist is NOT yet affiliated with (exclusion filter).
    async fn publishers_not_affiliated(&self, journalist_id: Uuid) -> Vec<Publisher>;
    // Idempotent insert: returns true only if a new request row was created.
    // A duplicate (journalist, publisher) pair is absorbed by the uniqueness constraint.
    async fn create_affiliation_request(&self, journalist_id: Uuid, publisher_id: Uuid) -> bool;
    async fn pending_affiliation_requests(&self) -> Vec<AffiliationRequestView>;
    // Transactionally adds the journalist to the publisher's staff AND flips the
    // request's approved flag. Both happen or neither.
    async fn approve_affiliation_request(&self, id: Uuid) -> AffiliationApproval;

    // --- Subscriptions ---
    // All four are idempotent: repeat calls leave the set unchanged.
    async fn subscribe_journalist(&self, reader_id: Uuid, journalist_id: Uuid) -> bool;
    async fn unsubscribe_journalist(&self, reader_id: Uuid, journalist_id: Uuid) -> bool;
    async fn subscribe_publisher(&self, reader_id: Uuid, publisher_id: Uuid) -> bool;
    async fn unsubscribe_publisher(&self, reader_id: Uuid, publisher_id: Uuid) -> bool;
    async fn subscriptions_view(&self, reader_id: Uuid) -> SubscriptionsView;
    // Approved articles from subscribed journalists or publishers, deduplicated.
    async fn feed(&self, reader_id: Uuid) -> Vec<Article>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const ARTICLE_COLS: &str = "id, title, content, author_id, publisher_id, approved, created_at";
const NEWSLETTER_COLS: &str = "id, title, description, author_id, created_at";
const USER_COLS: &str = "id, username, email, role";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Queries use the runtime-checked sqlx API with explicit binds; fallible paths
/// log and degrade to empty/None results the way the handlers expect.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_articles(&self, sql: &str, bind: Option<Uuid>) -> Vec<Article> {
        let mut query = sqlx::query_as::<_, Article>(sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        match query.fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("article query error: {:?}", e);
                vec![]
            }
        }
    }

    async fn try_create_newsletter(
        &self,
        req: CreateNewsletterRequest,
        author_id: Uuid,
    ) -> sqlx::Result<Newsletter> {
        let mut tx = self.pool.begin().await?;
        let newsletter = sqlx::query_as::<_, Newsletter>(
            "INSERT INTO newsletters (id, title, description, author_id, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING id, title, description, author_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&req.title)
        .bind(&req.description)
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await?;

        for article_id in &req.article_ids {
            sqlx::query(
                "INSERT INTO newsletter_articles (newsletter_id, article_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(newsletter.id)
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(newsletter)
    }

    async fn try_update_newsletter(
        &self,
        id: Uuid,
        req: UpdateNewsletterRequest,
    ) -> sqlx::Result<Option<Newsletter>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Newsletter>(
            "UPDATE newsletters \
             SET title = COALESCE($2, title), description = COALESCE($3, description) \
             WHERE id = $1 \
             RETURNING id, title, description, author_id, created_at",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(newsletter) = updated else {
            return Ok(None);
        };

        // A provided id list replaces the article set wholesale.
        if let Some(article_ids) = req.article_ids {
            sqlx::query("DELETE FROM newsletter_articles WHERE newsletter_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for article_id in article_ids {
                sqlx::query(
                    "INSERT INTO newsletter_articles (newsletter_id, article_id) \
                     VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(article_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(newsletter))
    }

    async fn try_create_publisher(&self, req: CreatePublisherRequest) -> sqlx::Result<Publisher> {
        let mut tx = self.pool.begin().await?;
        let publisher = sqlx::query_as::<_, Publisher>(
            "INSERT INTO publishers (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .fetch_one(&mut *tx)
        .await?;

        for journalist_id in &req.journalist_ids {
            sqlx::query(
                "INSERT INTO publisher_journalists (publisher_id, journalist_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(publisher.id)
            .bind(journalist_id)
            .execute(&mut *tx)
            .await?;
        }
        for editor_id in &req.editor_ids {
            sqlx::query(
                "INSERT INTO publisher_editors (publisher_id, editor_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(publisher.id)
            .bind(editor_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(publisher)
    }

    async fn try_update_publisher(
        &self,
        id: Uuid,
        req: UpdatePublisherRequest,
    ) -> sqlx::Result<Option<Publisher>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Publisher>(
            "UPDATE publishers SET name = COALESCE($2, name) WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(req.name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(publisher) = updated else {
            return Ok(None);
        };

        if let Some(journalist_ids) = req.journalist_ids {
            sqlx::query("DELETE FROM publisher_journalists WHERE publisher_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for journalist_id in journalist_ids {
                sqlx::query(
                    "INSERT INTO publisher_journalists (publisher_id, journalist_id) \
                     VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(journalist_id)
                .execute(&mut *tx)
                .await?;
            }
        }
        if let Some(editor_ids) = req.editor_ids {
            sqlx::query("DELETE FROM publisher_editors WHERE publisher_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for editor_id in editor_ids {
                sqlx::query(
                    "INSERT INTO publisher_editors (publisher_id, editor_id) \
                     VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(editor_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(publisher))
    }

    async fn try_approve_affiliation(&self, id: Uuid) -> sqlx::Result<AffiliationApproval> {
        let mut tx = self.pool.begin().await?;
        // Row lock serializes concurrent approvals of the same request.
        let request = sqlx::query_as::<_, PublisherRequest>(
            "SELECT id, journalist_id, publisher_id, approved, created_at \
             FROM publisher_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            return Ok(AffiliationApproval::NotFound);
        };
        if request.approved {
            // Idempotent: no duplicate side effects on re-approval.
            return Ok(AffiliationApproval::AlreadyApproved);
        }

        sqlx::query(
            "INSERT INTO publisher_journalists (publisher_id, journalist_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(request.publisher_id)
        .bind(request.journalist_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE publisher_requests SET approved = true WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Both mutations commit together; a failure rolls back both.
        tx.commit().await?;
        Ok(AffiliationApproval::Approved)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    async fn create_user(&self, user: User) -> Option<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, email, role",
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.email)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            // Covers duplicate usernames as well as transport failures.
            tracing::error!("create_user error: {:?}", e);
            None
        })
    }

    async fn list_users_by_role(&self, role: Role) -> Vec<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLS} FROM users WHERE role = $1 ORDER BY username"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_users_by_role error: {:?}", e);
            vec![]
        })
    }

    // --- Article Retrieval ---

    async fn approved_articles(&self) -> Vec<Article> {
        self.fetch_articles(
            &format!(
                "SELECT {ARTICLE_COLS} FROM articles WHERE approved = true ORDER BY created_at DESC"
            ),
            None,
        )
        .await
    }

    async fn all_articles(&self) -> Vec<Article> {
        self.fetch_articles(
            &format!("SELECT {ARTICLE_COLS} FROM articles ORDER BY created_at DESC"),
            None,
        )
        .await
    }

    async fn pending_articles(&self) -> Vec<Article> {
        self.fetch_articles(
            &format!(
                "SELECT {ARTICLE_COLS} FROM articles WHERE approved = false ORDER BY created_at DESC"
            ),
            None,
        )
        .await
    }

    async fn articles_by_author(&self, author_id: Uuid) -> Vec<Article> {
        self.fetch_articles(
            &format!(
                "SELECT {ARTICLE_COLS} FROM articles WHERE author_id = $1 ORDER BY created_at DESC"
            ),
            Some(author_id),
        )
        .await
    }

    async fn get_article(&self, id: Uuid) -> Option<Article> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLS} FROM articles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_article error: {:?}", e);
            None
        })
    }

    async fn get_approved_article(&self, id: Uuid) -> Option<Article> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLS} FROM articles WHERE id = $1 AND approved = true"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_approved_article error: {:?}", e);
            None
        })
    }

    // --- Article Mutation ---

    async fn create_article(&self, req: CreateArticleRequest, author_id: Uuid) -> Option<Article> {
        sqlx::query_as::<_, Article>(
            "INSERT INTO articles (id, title, content, author_id, publisher_id, approved, created_at) \
             VALUES ($1, $2, $3, $4, $5, false, NOW()) \
             RETURNING id, title, content, author_id, publisher_id, approved, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.content)
        .bind(author_id)
        .bind(req.publisher_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_article error: {:?}", e);
            None
        })
    }

    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> Option<Article> {
        // COALESCE keeps unspecified fields; the approved column is never listed here.
        sqlx::query_as::<_, Article>(
            "UPDATE articles \
             SET title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 publisher_id = COALESCE($4, publisher_id) \
             WHERE id = $1 \
             RETURNING id, title, content, author_id, publisher_id, approved, created_at",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.publisher_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_article error: {:?}", e);
            None
        })
    }

    async fn delete_article(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_article error: {:?}", e);
                false
            }
        }
    }

    async fn approve_article(&self, id: Uuid) -> ArticleApproval {
        // One-way flip. The `approved = false` guard means a double-approval race
        // resolves to exactly one winner; the loser falls into the probe below.
        // A query error short-circuits to Failed: the article may still be
        // unapproved, so it must not be reported as a conflict.
        let flipped = match sqlx::query_as::<_, Article>(
            "UPDATE articles SET approved = true \
             WHERE id = $1 AND approved = false \
             RETURNING id, title, content, author_id, publisher_id, approved, created_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("approve_article error: {:?}", e);
                return ArticleApproval::Failed;
            }
        };

        if let Some(article) = flipped {
            return ArticleApproval::Approved(article);
        }

        match self.get_article(id).await {
            Some(_) => ArticleApproval::AlreadyApproved,
            None => ArticleApproval::NotFound,
        }
    }

    // --- Distribution ---

    async fn subscriber_emails(&self, author_id: Uuid, publisher_id: Option<Uuid>) -> Vec<String> {
        // Canonical recipient rule: union of journalist-subscribers and
        // publisher-subscribers, matching the feed filter.
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT u.email FROM users u \
             WHERE u.email <> '' AND ( \
                 EXISTS (SELECT 1 FROM subscriptions_journalists sj \
                         WHERE sj.reader_id = u.id AND sj.journalist_id = $1) \
                 OR ($2::uuid IS NOT NULL AND EXISTS ( \
                         SELECT 1 FROM subscriptions_publishers sp \
                         WHERE sp.reader_id = u.id AND sp.publisher_id = $2)) \
             )",
        )
        .bind(author_id)
        .bind(publisher_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("subscriber_emails error: {:?}", e);
            vec![]
        })
    }

    // --- Newsletters ---

    async fn list_newsletters(&self) -> Vec<Newsletter> {
        sqlx::query_as::<_, Newsletter>(&format!(
            "SELECT {NEWSLETTER_COLS} FROM newsletters ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_newsletters error: {:?}", e);
            vec![]
        })
    }

    async fn get_newsletter(&self, id: Uuid) -> Option<Newsletter> {
        sqlx::query_as::<_, Newsletter>(&format!(
            "SELECT {NEWSLETTER_COLS} FROM newsletters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_newsletter error: {:?}", e);
            None
        })
    }

    async fn get_newsletter_detail(&self, id: Uuid) -> Option<NewsletterDetail> {
        let newsletter = self.get_newsletter(id).await?;
        let articles = self
            .fetch_articles(
                "SELECT a.id, a.title, a.content, a.author_id, a.publisher_id, a.approved, a.created_at \
                 FROM articles a \
                 JOIN newsletter_articles na ON na.article_id = a.id \
                 WHERE na.newsletter_id = $1 \
                 ORDER BY a.created_at DESC",
                Some(id),
            )
            .await;
        Some(NewsletterDetail {
            id: newsletter.id,
            title: newsletter.title,
            description: newsletter.description,
            author_id: newsletter.author_id,
            created_at: newsletter.created_at,
            articles,
        })
    }

    async fn newsletters_by_author(&self, author_id: Uuid) -> Vec<Newsletter> {
        sqlx::query_as::<_, Newsletter>(&format!(
            "SELECT {NEWSLETTER_COLS} FROM newsletters WHERE author_id = $1 ORDER BY created_at DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("newsletters_by_author error: {:?}", e);
            vec![]
        })
    }

    async fn create_newsletter(
        &self,
        req: CreateNewsletterRequest,
        author_id: Uuid,
    ) -> Option<Newsletter> {
        match self.try_create_newsletter(req, author_id).await {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::error!("create_newsletter error: {:?}", e);
                None
            }
        }
    }

    async fn update_newsletter(
        &self,
        id: Uuid,
        req: UpdateNewsletterRequest,
    ) -> Option<Newsletter> {
        match self.try_update_newsletter(id, req).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("update_newsletter error: {:?}", e);
                None
            }
        }
    }

    async fn delete_newsletter(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM newsletters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_newsletter error: {:?}", e);
                false
            }
        }
    }

    // --- Publishers ---

    async fn list_publishers(&self) -> Vec<Publisher> {
        sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_publishers error: {:?}", e);
                vec![]
            })
    }

    async fn get_publisher(&self, id: Uuid) -> Option<Publisher> {
        sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_publisher error: {:?}", e);
                None
            })
    }

    async fn get_publisher_detail(&self, id: Uuid) -> Option<PublisherDetail> {
        let publisher = self.get_publisher(id).await?;
        let editors = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.role FROM users u \
             JOIN publisher_editors pe ON pe.editor_id = u.id \
             WHERE pe.publisher_id = $1 ORDER BY u.username",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        let journalists = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.role FROM users u \
             JOIN publisher_journalists pj ON pj.journalist_id = u.id \
             WHERE pj.publisher_id = $1 ORDER BY u.username",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        Some(PublisherDetail {
            id: publisher.id,
            name: publisher.name,
            editors,
            journalists,
        })
    }

    async fn create_publisher(&self, req: CreatePublisherRequest) -> Option<Publisher> {
        match self.try_create_publisher(req).await {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::error!("create_publisher error: {:?}", e);
                None
            }
        }
    }

    async fn update_publisher(&self, id: Uuid, req: UpdatePublisherRequest) -> Option<Publisher> {
        match self.try_update_publisher(id, req).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("update_publisher error: {:?}", e);
                None
            }
        }
    }

    async fn delete_publisher(&self, id: Uuid) -> bool {
        // articles.publisher_id carries ON DELETE SET NULL, so articles survive.
        match sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_publisher error: {:?}", e);
                false
            }
        }
    }

    async fn is_affiliated(&self, journalist_id: Uuid, publisher_id: Uuid) -> bool {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM publisher_journalists \
             WHERE journalist_id = $1 AND publisher_id = $2)",
        )
        .bind(journalist_id)
        .bind(publisher_id)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("is_affiliated error: {:?}", e);
            false
        })
    }

    // --- Affiliation Workflow ---

    async fn publishers_not_affiliated(&self, journalist_id: Uuid) -> Vec<Publisher> {
        sqlx::query_as::<_, Publisher>(
            "SELECT p.id, p.name FROM publishers p \
             WHERE NOT EXISTS (SELECT 1 FROM publisher_journalists pj \
                               WHERE pj.publisher_id = p.id AND pj.journalist_id = $1) \
             ORDER BY p.name",
        )
        .bind(journalist_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("publishers_not_affiliated error: {:?}", e);
            vec![]
        })
    }

    async fn create_affiliation_request(&self, journalist_id: Uuid, publisher_id: Uuid) -> bool {
        // The UNIQUE (journalist_id, publisher_id) constraint absorbs duplicates;
        // rows_affected distinguishes "created" from "already requested".
        let result = sqlx::query(
            "INSERT INTO publisher_requests (id, journalist_id, publisher_id, approved, created_at) \
             VALUES ($1, $2, $3, false, NOW()) \
             ON CONFLICT (journalist_id, publisher_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(journalist_id)
        .bind(publisher_id)
        .execute(&self.pool)
        .await;
        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("create_affiliation_request error: {:?}", e);
                false
            }
        }
    }

    async fn pending_affiliation_requests(&self) -> Vec<AffiliationRequestView> {
        sqlx::query_as::<_, AffiliationRequestView>(
            "SELECT r.id, r.journalist_id, u.username AS journalist_username, \
                    r.publisher_id, p.name AS publisher_name, r.created_at \
             FROM publisher_requests r \
             JOIN users u ON r.journalist_id = u.id \
             JOIN publishers p ON r.publisher_id = p.id \
             WHERE r.approved = false \
             ORDER BY r.created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("pending_affiliation_requests error: {:?}", e);
            vec![]
        })
    }

    async fn approve_affiliation_request(&self, id: Uuid) -> AffiliationApproval {
        match self.try_approve_affiliation(id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("approve_affiliation_request error: {:?}", e);
                AffiliationApproval::NotFound
            }
        }
    }

    // --- Subscriptions ---

    async fn subscribe_journalist(&self, reader_id: Uuid, journalist_id: Uuid) -> bool {
        let result = sqlx::query(
            "INSERT INTO subscriptions_journalists (reader_id, journalist_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(reader_id)
        .bind(journalist_id)
        .execute(&self.pool)
        .await;
        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("subscribe_journalist error: {:?}", e);
                false
            }
        }
    }

    async fn unsubscribe_journalist(&self, reader_id: Uuid, journalist_id: Uuid) -> bool {
        match sqlx::query(
            "DELETE FROM subscriptions_journalists WHERE reader_id = $1 AND journalist_id = $2",
        )
        .bind(reader_id)
        .bind(journalist_id)
        .execute(&self.pool)
        .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("unsubscribe_journalist error: {:?}", e);
                false
            }
        }
    }

    async fn subscribe_publisher(&self, reader_id: Uuid, publisher_id: Uuid) -> bool {
        let result = sqlx::query(
            "INSERT INTO subscriptions_publishers (reader_id, publisher_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(reader_id)
        .bind(publisher_id)
        .execute(&self.pool)
        .await;
        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("subscribe_publisher error: {:?}", e);
                false
            }
        }
    }

    async fn unsubscribe_publisher(&self, reader_id: Uuid, publisher_id: Uuid) -> bool {
        match sqlx::query(
            "DELETE FROM subscriptions_publishers WHERE reader_id = $1 AND publisher_id = $2",
        )
        .bind(reader_id)
        .bind(publisher_id)
        .execute(&self.pool)
        .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("unsubscribe_publisher error: {:?}", e);
                false
            }
        }
    }

    async fn subscriptions_view(&self, reader_id: Uuid) -> SubscriptionsView {
        let subscribed_journalists = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.role FROM users u \
             JOIN subscriptions_journalists sj ON sj.journalist_id = u.id \
             WHERE sj.reader_id = $1 ORDER BY u.username",
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        let subscribed_publishers = sqlx::query_as::<_, Publisher>(
            "SELECT p.id, p.name FROM publishers p \
             JOIN subscriptions_publishers sp ON sp.publisher_id = p.id \
             WHERE sp.reader_id = $1 ORDER BY p.name",
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        SubscriptionsView {
            subscribed_journalists,
            subscribed_publishers,
            journalists: self.list_users_by_role(Role::Journalist).await,
            publishers: self.list_publishers().await,
        }
    }

    async fn feed(&self, reader_id: Uuid) -> Vec<Article> {
        // DISTINCT deduplicates articles matching both subscription relations.
        sqlx::query_as::<_, Article>(
            "SELECT DISTINCT a.id, a.title, a.content, a.author_id, a.publisher_id, \
                    a.approved, a.created_at \
             FROM articles a \
             WHERE a.approved = true AND ( \
                 a.author_id IN (SELECT journalist_id FROM subscriptions_journalists \
                                 WHERE reader_id = $1) \
                 OR a.publisher_id IN (SELECT publisher_id FROM subscriptions_publishers \
                                       WHERE reader_id = $1)) \
             ORDER BY a.created_at DESC",
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("feed error: {:?}", e);
            vec![]
        })
    }
}
