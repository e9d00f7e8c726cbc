//! Business logic for user listing and the editor-access review workflow.
//!
//! The services only orchestrate: every state transition and the Admin
//! invariant itself are enforced by the store's conditional writes, so a
//! caller losing a concurrent race gets the typed error computed against
//! fresh state, never a silent success.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::users::model::{ReviewDecision, User, UserSummary};
use crate::store::UserStore;
use crate::utils::errors::AppError;

pub struct UserService;

impl UserService {
    #[instrument(skip(store))]
    pub async fn get_users(store: &dyn UserStore) -> Result<Vec<UserSummary>, AppError> {
        let users = store.list_users().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}

/// Orchestrates Viewer-initiated editor requests and Admin reviews.
pub struct ReviewService;

impl ReviewService {
    /// A Viewer asks to be promoted to Editor. Only the caller's own
    /// record is touched.
    #[instrument(skip(store))]
    pub async fn request_editor_access(
        store: &dyn UserStore,
        caller_id: Uuid,
    ) -> Result<User, AppError> {
        store.begin_editor_request(caller_id, Utc::now()).await
    }

    /// Pending requests, oldest first, restricted projection.
    #[instrument(skip(store))]
    pub async fn list_pending_requests(
        store: &dyn UserStore,
    ) -> Result<Vec<UserSummary>, AppError> {
        let users = store.list_pending_requests().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    /// Approve a pending request: promotes to Editor and stamps the
    /// review in one store write.
    #[instrument(skip(store))]
    pub async fn approve_request(
        store: &dyn UserStore,
        target_id: Uuid,
        admin_id: Uuid,
    ) -> Result<User, AppError> {
        store
            .review_editor_request(target_id, ReviewDecision::Approve, admin_id, Utc::now())
            .await
    }

    /// Reject a pending request. The target's role is unchanged.
    #[instrument(skip(store))]
    pub async fn reject_request(
        store: &dyn UserStore,
        target_id: Uuid,
        admin_id: Uuid,
    ) -> Result<User, AppError> {
        store
            .review_editor_request(target_id, ReviewDecision::Reject, admin_id, Utc::now())
            .await
    }
}
