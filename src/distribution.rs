use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::Article;

// 1. Notifier Contract
/// Notifier
///
/// Defines the abstract contract for subscriber notification dispatch. This trait
/// allows us to swap the concrete implementation (the real HTTP mail relay in
/// production, the in-memory MockNotifier during testing) without affecting the
/// calling handlers.
///
/// Failure reporting matters here: callers on the approval path log the error and
/// move on, never letting a delivery failure roll back the approval itself.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatches one message to the given recipient addresses.
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<(), String>;
}

/// NotifierState
///
/// The concrete type used to share the notifier across the application state.
pub type NotifierState = Arc<dyn Notifier>;

// 2. SocialPoster Contract
/// SocialPoster
///
/// Contract for the best-effort external announcement on article approval.
/// Constructed once at startup and injected through AppState, replacing any notion
/// of a process-wide singleton client; tests substitute MockSocialPoster.
#[async_trait]
pub trait SocialPoster: Send + Sync {
    /// Publishes a short text update. Any error is the caller's to ignore.
    async fn post_update(&self, text: &str) -> Result<(), String>;
}

/// SocialState
///
/// The concrete type used to share the social client across the application state.
pub type SocialState = Arc<dyn SocialPoster>;

// --- Real Implementations ---

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

/// MailRelay
///
/// The concrete `Notifier` backed by an HTTP transactional-mail relay
/// (Mailpit in local Docker, a hosted relay in production). One JSON POST per
/// dispatch carries the full recipient list.
#[derive(Clone)]
pub struct MailRelay {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl MailRelay {
    /// Constructs the relay client from AppConfig values.
    pub fn new(endpoint: &str, api_key: &str, from: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for MailRelay {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<(), String> {
        let payload = MailPayload {
            from: &self.from,
            to: recipients,
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("mail relay returned {}", response.status()));
        }
        Ok(())
    }
}

/// Maximum announcement length accepted by the posting endpoint.
const MAX_POST_CHARS: usize = 280;

#[derive(Serialize)]
struct CreatePostRequest {
    text: String,
}

/// XClient
///
/// The concrete `SocialPoster` targeting the X API v2 post-creation endpoint.
/// The base URL is configurable so tests and local runs can point at a stub.
/// An empty access token leaves the client disabled; calls then fail fast and the
/// approval path treats that like any other swallowed downstream failure.
#[derive(Clone)]
pub struct XClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl XClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.to_string(),
            access_token: access_token.to_string(),
        }
    }
}

#[async_trait]
impl SocialPoster for XClient {
    async fn post_update(&self, text: &str) -> Result<(), String> {
        if self.access_token.is_empty() {
            return Err("social client disabled (no access token)".to_string());
        }

        // Truncate on a char boundary rather than reject: the announcement is
        // best-effort and a clipped title still links the story.
        let text: String = text.chars().take(MAX_POST_CHARS).collect();

        let url = format!("{}/2/tweets", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&CreatePostRequest { text })
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("post endpoint returned {}", response.status()));
        }
        Ok(())
    }
}

/// distribute_article
///
/// The fan-out fired exactly once, at the moment an article transitions to approved.
/// Both downstream calls are best-effort: failures are logged and discarded so the
/// persisted approval is never affected and the editor never sees an error.
pub async fn distribute_article(
    notifier: &NotifierState,
    social: &SocialState,
    article: &Article,
    recipients: &[String],
) {
    if !recipients.is_empty() {
        let subject = format!("New Article: {}", article.title);
        if let Err(e) = notifier.send(&subject, &article.content, recipients).await {
            tracing::warn!(article_id = %article.id, "notification dispatch failed: {}", e);
        }
    }

    if let Err(e) = social.post_update(&article.title).await {
        tracing::warn!(article_id = %article.id, "social post failed: {}", e);
    }
}

// 3. Mock Implementations (For Tests)

/// MockNotifier
///
/// Records every dispatch so tests can assert exactly-once semantics and the
/// recipient set. `should_fail` simulates a relay outage.
#[derive(Default)]
pub struct MockNotifier {
    pub should_fail: bool,
    sent: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            sent: Mutex::new(vec![]),
        }
    }

    /// All (subject, body, recipients) dispatches recorded so far.
    pub fn sent(&self) -> Vec<(String, String, Vec<String>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) -> Result<(), String> {
        self.sent.lock().unwrap().push((
            subject.to_string(),
            body.to_string(),
            recipients.to_vec(),
        ));
        if self.should_fail {
            return Err("Mock Notifier Error: Simulation requested".to_string());
        }
        Ok(())
    }
}

/// MockSocialPoster
///
/// Records posted texts for assertions; `should_fail` simulates endpoint errors
/// (auth failure, rate limit) the approval path must swallow.
#[derive(Default)]
pub struct MockSocialPoster {
    pub should_fail: bool,
    posts: Mutex<Vec<String>>,
}

impl MockSocialPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            posts: Mutex::new(vec![]),
        }
    }

    /// All texts handed to the poster so far, including failed attempts.
    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialPoster for MockSocialPoster {
    async fn post_update(&self, text: &str) -> Result<(), String> {
        self.posts.lock().unwrap().push(text.to_string());
        if self.should_fail {
            return Err("Mock Social Error: Simulation requested".to_string());
        }
        Ok(())
    }
}
