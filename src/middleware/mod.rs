//! Middleware modules for request processing.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::AuthUser`] validates the JWT and extracts claims
//! 3. [`role::require_roles`] checks the claims role against the roles
//!    the route declares (exact match, no hierarchy)
//! 4. Handler executes if all checks pass
//!
//! Both steps run before any store access, so authentication and
//! authorization failures cost no workflow work.

pub mod auth;
pub mod role;
