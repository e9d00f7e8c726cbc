//! User data models and the editor-request state machine.
//!
//! # Core Types
//!
//! - [`User`] - User entity as exposed by the API (never carries a password)
//! - [`Role`] - The closed three-tier role set
//! - [`EditorRequest`] - Promotion-request state machine, one per user
//!
//! # The editor-request lifecycle
//!
//! ```text
//! none ──request──▶ pending ──approve──▶ approved ─┐
//!                      │                           │
//!                      └────reject────▶ rejected ──┤
//!                                                  │
//!              pending ◀──────request──────────────┘
//! ```
//!
//! `approved` and `rejected` close the current request, but a user may
//! re-apply: both transition back to `pending` on a new request. A request
//! from `pending` is rejected (no self-transition).
//!
//! The variants carry their timestamps so that an approved request without
//! a reviewer, or a pending request without `requested_at`, cannot be
//! constructed at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// System role. The set is fixed and closed; there are no custom roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Editor => write!(f, "Editor"),
            Role::Viewer => write!(f, "Viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Editor" => Ok(Role::Editor),
            "Viewer" => Ok(Role::Viewer),
            other => Err(AppError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Outcome requested by a reviewing Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Promotion-request state, embedded in every [`User`].
///
/// Serialized with a `status` tag so API consumers see the same shape the
/// legacy clients expect:
/// `{"status":"approved","requested_at":...,"reviewed_at":...,"reviewed_by":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EditorRequest {
    #[default]
    None,
    Pending {
        requested_at: DateTime<Utc>,
    },
    Approved {
        requested_at: DateTime<Utc>,
        reviewed_at: DateTime<Utc>,
        reviewed_by: Uuid,
    },
    Rejected {
        requested_at: DateTime<Utc>,
        reviewed_at: DateTime<Utc>,
        reviewed_by: Uuid,
    },
}

impl EditorRequest {
    pub fn is_pending(&self) -> bool {
        matches!(self, EditorRequest::Pending { .. })
    }

    /// Wire name of the current state.
    pub fn status(&self) -> &'static str {
        match self {
            EditorRequest::None => "none",
            EditorRequest::Pending { .. } => "pending",
            EditorRequest::Approved { .. } => "approved",
            EditorRequest::Rejected { .. } => "rejected",
        }
    }

    /// Transition into `pending`. Allowed from every state except
    /// `pending` itself; re-application after a closed request is fine.
    pub fn request(&self, now: DateTime<Utc>) -> Result<EditorRequest, AppError> {
        match self {
            EditorRequest::Pending { .. } => Err(AppError::InvalidTransition(
                "Editor request already pending".to_string(),
            )),
            _ => Ok(EditorRequest::Pending { requested_at: now }),
        }
    }

    /// Close a `pending` request. Any other state fails and leaves the
    /// request untouched.
    pub fn review(
        &self,
        decision: ReviewDecision,
        reviewed_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<EditorRequest, AppError> {
        match self {
            EditorRequest::Pending { requested_at } => Ok(match decision {
                ReviewDecision::Approve => EditorRequest::Approved {
                    requested_at: *requested_at,
                    reviewed_at: now,
                    reviewed_by,
                },
                ReviewDecision::Reject => EditorRequest::Rejected {
                    requested_at: *requested_at,
                    reviewed_at: now,
                    reviewed_by,
                },
            }),
            _ => Err(AppError::InvalidTransition(
                "No pending request for this user".to_string(),
            )),
        }
    }
}

/// A user as stored and exposed by the system.
///
/// The password hash deliberately has no field here; it lives only in the
/// store's internal row types, so no serialization of a `User` can ever
/// leak it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub editor_request: EditorRequest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restricted projection used by the Admin list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub editor_request: EditorRequest,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role: user.role,
            editor_request: user.editor_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewer() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn test_request_from_none() {
        let now = Utc::now();
        let next = EditorRequest::None.request(now).unwrap();
        assert_eq!(next, EditorRequest::Pending { requested_at: now });
    }

    #[test]
    fn test_request_while_pending_fails() {
        let state = EditorRequest::Pending {
            requested_at: Utc::now(),
        };
        let err = state.request(Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn test_re_request_after_rejection() {
        let state = EditorRequest::Rejected {
            requested_at: Utc::now(),
            reviewed_at: Utc::now(),
            reviewed_by: reviewer(),
        };
        let next = state.request(Utc::now()).unwrap();
        assert!(next.is_pending());
    }

    #[test]
    fn test_re_request_after_approval() {
        let state = EditorRequest::Approved {
            requested_at: Utc::now(),
            reviewed_at: Utc::now(),
            reviewed_by: reviewer(),
        };
        assert!(state.request(Utc::now()).unwrap().is_pending());
    }

    #[test]
    fn test_approve_pending() {
        let requested_at = Utc::now();
        let admin = reviewer();
        let now = Utc::now();
        let state = EditorRequest::Pending { requested_at };

        let next = state.review(ReviewDecision::Approve, admin, now).unwrap();
        assert_eq!(
            next,
            EditorRequest::Approved {
                requested_at,
                reviewed_at: now,
                reviewed_by: admin,
            }
        );
    }

    #[test]
    fn test_reject_pending() {
        let requested_at = Utc::now();
        let admin = reviewer();
        let now = Utc::now();
        let state = EditorRequest::Pending { requested_at };

        let next = state.review(ReviewDecision::Reject, admin, now).unwrap();
        assert_eq!(next.status(), "rejected");
        assert!(matches!(
            next,
            EditorRequest::Rejected { reviewed_by, .. } if reviewed_by == admin
        ));
    }

    #[test]
    fn test_review_closure() {
        // approve/reject only succeed from pending; every other state
        // fails with InvalidTransition and stays unchanged.
        let closed_states = [
            EditorRequest::None,
            EditorRequest::Approved {
                requested_at: Utc::now(),
                reviewed_at: Utc::now(),
                reviewed_by: reviewer(),
            },
            EditorRequest::Rejected {
                requested_at: Utc::now(),
                reviewed_at: Utc::now(),
                reviewed_by: reviewer(),
            },
        ];

        for state in closed_states {
            for decision in [ReviewDecision::Approve, ReviewDecision::Reject] {
                let before = state.clone();
                let err = state.review(decision, reviewer(), Utc::now()).unwrap_err();
                assert!(matches!(err, AppError::InvalidTransition(_)));
                assert_eq!(state, before);
            }
        }
    }

    #[test]
    fn test_editor_request_serde_shape() {
        let json = serde_json::to_value(&EditorRequest::None).unwrap();
        assert_eq!(json, serde_json::json!({"status": "none"}));

        let admin = reviewer();
        let state = EditorRequest::Approved {
            requested_at: Utc::now(),
            reviewed_at: Utc::now(),
            reviewed_by: admin,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "approved");
        assert_eq!(json["reviewed_by"], serde_json::json!(admin));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Editor, Role::Viewer] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_serialization_has_no_password_field() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Viewer,
            editor_request: EditorRequest::None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|k| !k.contains("password")));
        assert_eq!(json["username"], "alice");
    }
}
