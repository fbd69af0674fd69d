/// Router Module Index
///
/// Organizes the application's routing into access-segregated modules so the
/// authentication layer is applied explicitly at the module level (via Axum
/// layers) rather than per-handler, preventing accidental exposure of
/// protected endpoints.

/// Routes accessible to all users (anonymous, read-only, plus the
/// register/login gateway).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated user session.
pub mod authenticated;
