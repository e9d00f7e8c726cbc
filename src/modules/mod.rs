pub mod auth;
pub mod users;

pub use self::users::model::{Role, User};
