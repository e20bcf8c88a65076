/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// so access control is applied explicitly at the module level (via Axum layers)
/// rather than scattered through individual handlers.
///
/// The three modules map directly to the platform's access tiers.

/// Routes accessible to all users (anonymous, read-only).
/// Handlers must enforce visibility (`approved=true`) at the Repository level.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated user session.
pub mod authenticated;

/// Routes restricted exclusively to users with the 'editor' role.
/// Implements mandatory authorization checks.
pub mod editor;
