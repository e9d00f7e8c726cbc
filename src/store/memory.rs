//! In-memory [`UserStore`] used by the test suite and for running the
//! server without a database.
//!
//! A single `RwLock` over the user map serializes all writes, so the
//! check-and-set for the single-Admin invariant and the editor-request
//! transitions are atomic by construction. Transitions are applied with
//! the same pure [`EditorRequest`] methods the workflow is specified by,
//! keeping this implementation and the SQL guards in
//! [`super::postgres`] equivalent.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::users::model::{ReviewDecision, Role, User};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

use super::{NewUser, UserStore};

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, StoredUser>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        // Hash before taking the lock; bcrypt is deliberately slow.
        let password_hash = hash_password(&new_user.password)?;

        let mut users = self.users.write().await;

        if users
            .values()
            .any(|stored| stored.user.username == new_user.username)
        {
            return Err(AppError::DuplicateKey("Username".to_string()));
        }
        if users
            .values()
            .any(|stored| stored.user.email == new_user.email)
        {
            return Err(AppError::DuplicateKey("Email".to_string()));
        }
        if new_user.role == Role::Admin
            && users.values().any(|stored| stored.user.role == Role::Admin)
        {
            return Err(AppError::AdminAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            role: new_user.role,
            editor_request: Default::default(),
            created_at: now,
            updated_at: now,
        };

        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|stored| stored.user.email == email)
            .map(|stored| stored.user.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().map(|stored| stored.user.clone()).collect();
        all.sort_by_key(|user| user.created_at);
        Ok(all)
    }

    async fn list_pending_requests(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        let mut pending: Vec<User> = users
            .values()
            .filter(|stored| stored.user.editor_request.is_pending())
            .map(|stored| stored.user.clone())
            .collect();
        pending.sort_by_key(|user| match user.editor_request {
            crate::modules::users::model::EditorRequest::Pending { requested_at } => requested_at,
            _ => user.created_at,
        });
        Ok(pending)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if role == Role::Admin
            && users
                .values()
                .any(|stored| stored.user.role == Role::Admin && stored.user.id != id)
        {
            return Err(AppError::AdminAlreadyExists);
        }

        let stored = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        stored.user.role = role;
        stored.user.updated_at = Utc::now();
        Ok(stored.user.clone())
    }

    async fn begin_editor_request(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if stored.user.role != Role::Viewer {
            return Err(AppError::Forbidden(
                "Only viewers may request editor access".to_string(),
            ));
        }

        stored.user.editor_request = stored.user.editor_request.request(now)?;
        stored.user.updated_at = now;
        Ok(stored.user.clone())
    }

    async fn review_editor_request(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        reviewed_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        // The transition is validated before anything is written, so a
        // failed review leaves both role and request state untouched.
        let next = stored.user.editor_request.review(decision, reviewed_by, now)?;

        if decision == ReviewDecision::Approve {
            stored.user.role = Role::Editor;
        }
        stored.user.editor_request = next;
        stored.user.updated_at = now;
        Ok(stored.user.clone())
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let (user, password_hash) = {
            let users = self.users.read().await;
            match users.values().find(|stored| stored.user.email == email) {
                Some(stored) => (stored.user.clone(), stored.password_hash.clone()),
                None => return Ok(None),
            }
        };

        if verify_password(password, &password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
