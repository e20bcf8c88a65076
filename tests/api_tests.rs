use async_trait::async_trait;
use newsroom::{
    AppConfig, AppState, create_router,
    distribution::{MockNotifier, MockSocialPoster},
    models::{
        AffiliationRequestView, Article, CreateArticleRequest, CreateNewsletterRequest,
        CreatePublisherRequest, Newsletter, NewsletterDetail, Publisher, PublisherDetail, Role,
        SubscriptionsView, UpdateArticleRequest, UpdateNewsletterRequest, UpdatePublisherRequest,
        User,
    },
    repository::{AffiliationApproval, ArticleApproval, Repository},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use uuid::Uuid;

// --- IN-MEMORY REPOSITORY ---

// A small stateful repository so the routing tests exercise the full HTTP stack
// (router, auth middleware, extractor, handler) without a live Postgres.
// Only the behavior the tests touch is modeled.
#[derive(Default)]
struct InMemoryRepo {
    users: Mutex<HashMap<Uuid, User>>,
    articles: Mutex<HashMap<Uuid, Article>>,
}

impl InMemoryRepo {
    fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
            articles: Mutex::new(HashMap::new()),
        }
    }

    fn insert_article(&self, article: Article) {
        self.articles.lock().unwrap().insert(article.id, article);
    }
}

#[async_trait]
impl Repository for InMemoryRepo {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
    async fn create_user(&self, user: User) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return None;
        }
        users.insert(user.id, user.clone());
        Some(user)
    }
    async fn list_users_by_role(&self, role: Role) -> Vec<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect()
    }

    async fn approved_articles(&self) -> Vec<Article> {
        self.articles
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.approved)
            .cloned()
            .collect()
    }
    async fn all_articles(&self) -> Vec<Article> {
        self.articles.lock().unwrap().values().cloned().collect()
    }
    async fn pending_articles(&self) -> Vec<Article> {
        self.articles
            .lock()
            .unwrap()
            .values()
            .filter(|a| !a.approved)
            .cloned()
            .collect()
    }
    async fn articles_by_author(&self, author_id: Uuid) -> Vec<Article> {
        self.articles
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.author_id == author_id)
            .cloned()
            .collect()
    }
    async fn get_article(&self, id: Uuid) -> Option<Article> {
        self.articles.lock().unwrap().get(&id).cloned()
    }
    async fn get_approved_article(&self, id: Uuid) -> Option<Article> {
        self.get_article(id).await.filter(|a| a.approved)
    }

    async fn create_article(&self, req: CreateArticleRequest, author_id: Uuid) -> Option<Article> {
        let article = Article {
            id: Uuid::new_v4(),
            title: req.title,
            content: req.content,
            author_id,
            publisher_id: req.publisher_id,
            approved: false,
            ..Article::default()
        };
        self.insert_article(article.clone());
        Some(article)
    }
    async fn update_article(&self, id: Uuid, req: UpdateArticleRequest) -> Option<Article> {
        let mut articles = self.articles.lock().unwrap();
        let article = articles.get_mut(&id)?;
        if let Some(title) = req.title {
            article.title = title;
        }
        if let Some(content) = req.content {
            article.content = content;
        }
        Some(article.clone())
    }
    async fn delete_article(&self, id: Uuid) -> bool {
        self.articles.lock().unwrap().remove(&id).is_some()
    }
    async fn approve_article(&self, id: Uuid) -> ArticleApproval {
        let mut articles = self.articles.lock().unwrap();
        match articles.get_mut(&id) {
            Some(article) if article.approved => ArticleApproval::AlreadyApproved,
            Some(article) => {
                article.approved = true;
                ArticleApproval::Approved(article.clone())
            }
            None => ArticleApproval::NotFound,
        }
    }

    async fn subscriber_emails(
        &self,
        _author_id: Uuid,
        _publisher_id: Option<Uuid>,
    ) -> Vec<String> {
        vec!["reader@example.com".to_string()]
    }

    async fn list_newsletters(&self) -> Vec<Newsletter> {
        vec![]
    }
    async fn get_newsletter(&self, _id: Uuid) -> Option<Newsletter> {
        None
    }
    async fn get_newsletter_detail(&self, _id: Uuid) -> Option<NewsletterDetail> {
        None
    }
    async fn newsletters_by_author(&self, _author_id: Uuid) -> Vec<Newsletter> {
        vec![]
    }
    async fn create_newsletter(
        &self,
        _req: CreateNewsletterRequest,
        _author_id: Uuid,
    ) -> Option<Newsletter> {
        None
    }
    async fn update_newsletter(
        &self,
        _id: Uuid,
        _req: UpdateNewsletterRequest,
    ) -> Option<Newsletter> {
        None
    }
    async fn delete_newsletter(&self, _id: Uuid) -> bool {
        false
    }

    async fn list_publishers(&self) -> Vec<Publisher> {
        vec![]
    }
    async fn get_publisher(&self, _id: Uuid) -> Option<Publisher> {
        None
    }
    async fn get_publisher_detail(&self, _id: Uuid) -> Option<PublisherDetail> {
        None
    }
    async fn create_publisher(&self, _req: CreatePublisherRequest) -> Option<Publisher> {
        None
    }
    async fn update_publisher(&self, _id: Uuid, _req: UpdatePublisherRequest) -> Option<Publisher> {
        None
    }
    async fn delete_publisher(&self, _id: Uuid) -> bool {
        false
    }
    async fn is_affiliated(&self, _journalist_id: Uuid, _publisher_id: Uuid) -> bool {
        false
    }

    async fn publishers_not_affiliated(&self, _journalist_id: Uuid) -> Vec<Publisher> {
        vec![]
    }
    async fn create_affiliation_request(&self, _journalist_id: Uuid, _publisher_id: Uuid) -> bool {
        false
    }
    async fn pending_affiliation_requests(&self) -> Vec<AffiliationRequestView> {
        vec![]
    }
    async fn approve_affiliation_request(&self, _id: Uuid) -> AffiliationApproval {
        AffiliationApproval::NotFound
    }

    async fn subscribe_journalist(&self, _reader_id: Uuid, _journalist_id: Uuid) -> bool {
        true
    }
    async fn unsubscribe_journalist(&self, _reader_id: Uuid, _journalist_id: Uuid) -> bool {
        true
    }
    async fn subscribe_publisher(&self, _reader_id: Uuid, _publisher_id: Uuid) -> bool {
        true
    }
    async fn unsubscribe_publisher(&self, _reader_id: Uuid, _publisher_id: Uuid) -> bool {
        true
    }
    async fn subscriptions_view(&self, _reader_id: Uuid) -> SubscriptionsView {
        SubscriptionsView::default()
    }
    async fn feed(&self, _reader_id: Uuid) -> Vec<Article> {
        self.approved_articles().await
    }
}

// --- TEST HARNESS ---

struct TestApp {
    address: String,
    notifier: Arc<MockNotifier>,
    social: Arc<MockSocialPoster>,
}

fn seed_user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        username: format!("{}-{}", role, Uuid::new_v4()),
        email: format!("{}@example.com", role),
        role,
    }
}

// Spawns the full router on an ephemeral port. AppConfig::default() runs in
// Env::Local, so requests authenticate through the x-user-id header bypass.
async fn spawn_app(repo: Arc<InMemoryRepo>) -> TestApp {
    let notifier = Arc::new(MockNotifier::new());
    let social = Arc::new(MockSocialPoster::new());

    let state = AppState {
        repo: repo.clone(),
        notifier: notifier.clone(),
        social: social.clone(),
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        notifier,
        social,
    }
}

// --- TESTS ---

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(Arc::new(InMemoryRepo::default())).await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_register_then_fetch_profile() {
    let app = spawn_app(Arc::new(InMemoryRepo::default())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register", app.address))
        .json(&serde_json::json!({
            "username": "casey", "email": "casey@example.com", "role": "reader"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let user: User = response.json().await.unwrap();
    assert_eq!(user.role, Role::Reader);

    // The registered id authenticates through the local bypass header.
    let response = client
        .get(format!("{}/me", app.address))
        .header("x-user-id", user.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let me: User = response.json().await.unwrap();
    assert_eq!(me.id, user.id);
}

#[tokio::test]
async fn test_register_duplicate_username_conflict() {
    let app = spawn_app(Arc::new(InMemoryRepo::default())).await;
    let client = reqwest::Client::new();

    let payload = serde_json::json!({
        "username": "dup", "email": "dup@example.com", "role": "journalist"
    });
    let first = client
        .post(format!("{}/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/register", app.address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 409);
}

#[tokio::test]
async fn test_authenticated_route_rejects_anonymous() {
    let app = spawn_app(Arc::new(InMemoryRepo::default())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/me", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_editor_route_forbidden_for_journalist() {
    let journalist = seed_user(Role::Journalist);
    let repo = Arc::new(InMemoryRepo::with_users(vec![journalist.clone()]));
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/editor/articles/pending", app.address))
        .header("x-user-id", journalist.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_article_lifecycle_submit_approve_distribute() {
    let journalist = seed_user(Role::Journalist);
    let editor = seed_user(Role::Editor);
    let repo = Arc::new(InMemoryRepo::with_users(vec![
        journalist.clone(),
        editor.clone(),
    ]));
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();

    // 1. Journalist submits a draft.
    let response = client
        .post(format!("{}/articles", app.address))
        .header("x-user-id", journalist.id.to_string())
        .json(&serde_json::json!({ "title": "Scoop", "content": "Details inside" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let article: Article = response.json().await.unwrap();
    assert!(!article.approved);

    // 2. The draft is invisible on the public surface.
    let response = client
        .get(format!("{}/articles/{}", app.address, article.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    // 3. Editor approves it.
    let response = client
        .post(format!(
            "{}/editor/articles/{}/approve",
            app.address, article.id
        ))
        .header("x-user-id", editor.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // 4. Distribution fired exactly once.
    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "New Article: Scoop");
    assert_eq!(app.social.posts(), vec!["Scoop".to_string()]);

    // 5. Now public.
    let response = client
        .get(format!("{}/articles/{}", app.address, article.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // 6. A second approval is rejected and does not re-notify.
    let response = client
        .post(format!(
            "{}/editor/articles/{}/approve",
            app.address, article.id
        ))
        .header("x-user-id", editor.id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    assert_eq!(app.notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_reader_cannot_submit_articles() {
    let reader = seed_user(Role::Reader);
    let repo = Arc::new(InMemoryRepo::with_users(vec![reader.clone()]));
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/articles", app.address))
        .header("x-user-id", reader.id.to_string())
        .json(&serde_json::json!({ "title": "Nope", "content": "Nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_public_listing_only_shows_approved() {
    let journalist = seed_user(Role::Journalist);
    let repo = Arc::new(InMemoryRepo::with_users(vec![journalist.clone()]));
    repo.insert_article(Article {
        id: Uuid::new_v4(),
        title: "Published".to_string(),
        content: "x".to_string(),
        author_id: journalist.id,
        approved: true,
        ..Article::default()
    });
    repo.insert_article(Article {
        id: Uuid::new_v4(),
        title: "Draft".to_string(),
        content: "x".to_string(),
        author_id: journalist.id,
        approved: false,
        ..Article::default()
    });
    let app = spawn_app(repo).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/articles", app.address))
        .send()
        .await
        .unwrap();
    let list: Vec<Article> = response.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "Published");
}
