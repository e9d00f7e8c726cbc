use crate::modules::users::model::{Role, User};
use crate::store::{NewUser, UserStore};
use crate::utils::errors::AppError;

/// Bootstrap the single Admin account. Goes through the same guarded
/// store path as every other Admin-producing write, so running it twice
/// (or racing it against an API registration) cannot yield two Admins.
pub async fn create_admin(
    store: &dyn UserStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let new_user = NewUser::new(username, email, password, Role::Admin)?;
    store.create_user(new_user).await
}
