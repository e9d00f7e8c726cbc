//! PostgreSQL [`UserStore`] backed by sqlx.
//!
//! Invariant enforcement lives in the SQL, not in application reads:
//!
//! - Creating or promoting an Admin is a conditional write (`WHERE NOT
//!   EXISTS` over other Admin rows), backstopped by the
//!   `users_single_admin_idx` unique partial index so even a write path
//!   that bypassed the condition could not commit a second Admin.
//! - Editor-request transitions are conditional `UPDATE`s on the current
//!   `request_status`, so concurrent reviews of the same request resolve
//!   to exactly one winner.
//!
//! When a conditional write matches no row the store re-reads the record
//! once against fresh state to surface the precise typed error instead of
//! guessing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::users::model::{EditorRequest, ReviewDecision, Role, User};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

use super::{NewUser, UserStore};

const USER_COLUMNS: &str = "id, username, email, role, request_status, \
     requested_at, reviewed_at, reviewed_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape; the editor request is stored as a status column plus
/// three nullable review columns.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    role: String,
    request_status: String,
    requested_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    reviewed_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let editor_request = match row.request_status.as_str() {
            "none" => EditorRequest::None,
            "pending" => EditorRequest::Pending {
                requested_at: row.requested_at.ok_or_else(|| {
                    corrupt_row(row.id, "pending request without requested_at")
                })?,
            },
            "approved" | "rejected" => {
                let requested_at = row
                    .requested_at
                    .ok_or_else(|| corrupt_row(row.id, "reviewed request without requested_at"))?;
                let reviewed_at = row
                    .reviewed_at
                    .ok_or_else(|| corrupt_row(row.id, "reviewed request without reviewed_at"))?;
                let reviewed_by = row
                    .reviewed_by
                    .ok_or_else(|| corrupt_row(row.id, "reviewed request without reviewed_by"))?;
                if row.request_status == "approved" {
                    EditorRequest::Approved {
                        requested_at,
                        reviewed_at,
                        reviewed_by,
                    }
                } else {
                    EditorRequest::Rejected {
                        requested_at,
                        reviewed_at,
                        reviewed_by,
                    }
                }
            }
            other => return Err(corrupt_row(row.id, &format!("unknown status {}", other))),
        };

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role.parse()?,
            editor_request,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn corrupt_row(id: Uuid, detail: &str) -> AppError {
    AppError::internal(anyhow::anyhow!("Corrupt user row {}: {}", id, detail))
}

/// Map unique-constraint violations to the typed errors callers expect.
fn map_db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.constraint() {
            Some("users_username_key") => return AppError::DuplicateKey("Username".to_string()),
            Some("users_email_key") => return AppError::DuplicateKey("Email".to_string()),
            Some("users_single_admin_idx") => return AppError::AdminAlreadyExists,
            _ => {}
        }
    }
    AppError::from(err)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let password_hash = hash_password(&new_user.password)?;

        // The WHERE clause makes the insert a no-op when the candidate is
        // an Admin and another Admin row exists; the partial unique index
        // closes the remaining commit-time race.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password, role) \
             SELECT $1, $2, $3, $4 \
             WHERE $4 <> 'Admin' OR NOT EXISTS (SELECT 1 FROM users WHERE role = 'Admin') \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.role.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::AdminAlreadyExists),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn list_pending_requests(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE request_status = 'pending' ORDER BY requested_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role = $2, updated_at = now() \
             WHERE id = $1 \
               AND ($2 <> 'Admin' OR NOT EXISTS \
                    (SELECT 1 FROM users WHERE role = 'Admin' AND id <> $1)) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => row.try_into(),
            // No row matched: either the user is unknown or the Admin
            // guard fired. One fresh read disambiguates.
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::AdminAlreadyExists),
                None => Err(AppError::NotFound("User not found".to_string())),
            },
        }
    }

    async fn begin_editor_request(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET request_status = 'pending', requested_at = $2, \
                    reviewed_at = NULL, reviewed_by = NULL, updated_at = now() \
             WHERE id = $1 AND role = 'Viewer' AND request_status <> 'pending' \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => match self.find_by_id(id).await? {
                Some(user) if user.role != Role::Viewer => Err(AppError::Forbidden(
                    "Only viewers may request editor access".to_string(),
                )),
                Some(_) => Err(AppError::InvalidTransition(
                    "Editor request already pending".to_string(),
                )),
                None => Err(AppError::NotFound("User not found".to_string())),
            },
        }
    }

    async fn review_editor_request(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        reviewed_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let status = match decision {
            ReviewDecision::Approve => "approved",
            ReviewDecision::Reject => "rejected",
        };

        // Role promotion and request closure commit in the same UPDATE so
        // no observer ever sees one without the other.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
                    role = CASE WHEN $2 = 'approved' THEN 'Editor' ELSE role END, \
                    request_status = $2, reviewed_by = $3, reviewed_at = $4, \
                    updated_at = now() \
             WHERE id = $1 AND request_status = 'pending' \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::InvalidTransition(
                    "No pending request for this user".to_string(),
                )),
                None => Err(AppError::NotFound("User not found".to_string())),
            },
        }
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        #[derive(sqlx::FromRow)]
        struct CredentialRow {
            password: String,
        }

        let credential = sqlx::query_as::<_, CredentialRow>(
            "SELECT password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(credential) = credential else {
            return Ok(None);
        };

        if !verify_password(password, &credential.password)? {
            return Ok(None);
        }

        self.find_by_email(email).await
    }
}
