use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::User;
use crate::store::{NewUser, UserStore};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;

use super::model::{LoginRequest, LoginResponse, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    /// Register a new account. A requested Admin role goes through the
    /// store's invariant guard like any other Admin-producing write.
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn register_user(
        store: &dyn UserStore,
        dto: RegisterRequestDto,
    ) -> Result<User, AppError> {
        let role = dto.role.unwrap_or_default();
        let new_user = NewUser::new(&dto.username, &dto.email, &dto.password, role)?;
        store.create_user(new_user).await
    }

    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn login_user(
        store: &dyn UserStore,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        let user = store
            .verify_credentials(&email, &dto.password)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

        let access_token = create_access_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(LoginResponse { access_token, user })
    }
}
