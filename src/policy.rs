//! One authorization-decision function per operation.
//!
//! Handlers call these instead of comparing roles inline, so the rules live in
//! a single place and extending the role set touches one module. Every gate is
//! evaluated before any mutation; a `false` maps to 403 FORBIDDEN.

use crate::models::{Article, Newsletter, Role};
use uuid::Uuid;

/// Only journalists author articles.
pub fn can_create_article(role: Role) -> bool {
    role == Role::Journalist
}

/// Editors mutate any article; journalists only their own. Readers never.
pub fn can_mutate_article(role: Role, actor_id: Uuid, article: &Article) -> bool {
    match role {
        Role::Editor => true,
        Role::Journalist => article.author_id == actor_id,
        Role::Reader => false,
    }
}

/// Approval is the editor's transition.
pub fn can_approve_article(role: Role) -> bool {
    role == Role::Editor
}

/// Publisher CRUD and staff membership edits are editor-only.
pub fn can_manage_publishers(role: Role) -> bool {
    role == Role::Editor
}

/// Affiliation requests originate from journalists.
pub fn can_request_affiliation(role: Role) -> bool {
    role == Role::Journalist
}

/// Affiliation approval is editor-only.
pub fn can_approve_affiliation(role: Role) -> bool {
    role == Role::Editor
}

/// Newsletters come from journalists or editors.
pub fn can_create_newsletter(role: Role) -> bool {
    matches!(role, Role::Journalist | Role::Editor)
}

/// Editors mutate any newsletter; journalists only their own.
pub fn can_mutate_newsletter(role: Role, actor_id: Uuid, newsletter: &Newsletter) -> bool {
    match role {
        Role::Editor => true,
        Role::Journalist => newsletter.author_id == actor_id,
        Role::Reader => false,
    }
}

/// Subscriptions and the personalized feed belong to readers.
pub fn can_manage_subscriptions(role: Role) -> bool {
    role == Role::Reader
}
