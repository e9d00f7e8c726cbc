//! The credential store: persistence seam for user records.
//!
//! All role-changing writes go through this trait, and every
//! implementation must make the two ordering guarantees hold at the store
//! level rather than in application code:
//!
//! 1. **Single-Admin invariant** — a write committing `role = Admin` only
//!    succeeds if no other Admin row exists at commit time. Two concurrent
//!    "become Admin" attempts must never both succeed.
//! 2. **Per-record transition serialization** — editor-request transitions
//!    are conditional on the current state, so two concurrent reviews of
//!    the same pending request resolve to exactly one winner; the loser
//!    surfaces [`AppError::InvalidTransition`].
//!
//! [`PgUserStore`] uses conditional writes backstopped by a unique partial
//! index; [`MemoryUserStore`] serializes writes behind a single lock.
//!
//! The store also owns password handling: plaintext goes in through
//! [`NewUser`] and [`UserStore::verify_credentials`], and hashes never
//! come out.

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::users::model::{ReviewDecision, Role, User};
use crate::utils::errors::AppError;

/// Validated input for creating a user. Construct via [`NewUser::new`],
/// which applies the same normalization regardless of the calling path
/// (HTTP registration or the `create-admin` CLI).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, AppError> {
        let username = username.trim().to_string();
        let email = email.trim().to_lowercase();

        let username_chars = username.chars().count();
        if username_chars < 3 || username_chars > 30 {
            return Err(AppError::Validation(
                "Username must be between 3 and 30 characters".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }
        if password.len() < 6 {
            return Err(AppError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        Ok(Self {
            username,
            email,
            password: password.to_string(),
            role,
        })
    }
}

#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Persist a new user with a freshly hashed password. Fails with
    /// [`AppError::DuplicateKey`] on username/email collision and
    /// [`AppError::AdminAlreadyExists`] if `role` is Admin and another
    /// Admin row already exists.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// All users whose editor request is currently pending, oldest first.
    async fn list_pending_requests(&self) -> Result<Vec<User>, AppError>;

    /// Change a user's role. A change to Admin is guarded by the
    /// single-Admin invariant; re-saving the existing Admin's own role is
    /// not self-rejected.
    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, AppError>;

    /// Transition the user's editor request to `pending`. Conditional on
    /// the user currently being a Viewer without a pending request.
    async fn begin_editor_request(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError>;

    /// Close a pending editor request. On approval the role change to
    /// Editor and the request state are committed as one write; a failure
    /// leaves both untouched.
    async fn review_editor_request(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        reviewed_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError>;

    /// Check an email/password pair. Returns `None` for unknown email or
    /// wrong password; the two cases are indistinguishable to the caller.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError>;
}
