use rolegate::config::jwt::JwtConfig;
use rolegate::modules::users::model::Role;
use rolegate::utils::errors::AppError;
use rolegate::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let result = create_access_token(user_id, "test@example.com", Role::Viewer, &jwt_config);

    assert!(result.is_ok());
    assert!(!result.unwrap().is_empty());
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for role in [Role::Admin, Role::Editor, Role::Viewer] {
        let result = create_access_token(user_id, "test@example.com", role, &jwt_config);
        assert!(result.is_ok());
    }
}

#[test]
fn test_verify_token_round_trip() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();
    let email = "test@example.com";

    let token = create_access_token(user_id, email, Role::Editor, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, email);
    assert_eq!(claims.role, Role::Editor);
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("invalid.token.here", &jwt_config);

    assert!(matches!(result, Err(AppError::Unauthenticated(_))));
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "test@example.com", Role::Viewer, &jwt_config).unwrap();

    let other_config = JwtConfig {
        secret: "a_different_secret".to_string(),
        access_token_expiry: 3600,
    };
    let result = verify_token(&token, &other_config);

    assert!(matches!(result, Err(AppError::Unauthenticated(_))));
}

#[test]
fn test_verify_token_expired() {
    let jwt_config = JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        // Expired well outside jsonwebtoken's default leeway.
        access_token_expiry: -600,
    };
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "test@example.com", Role::Viewer, &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(matches!(result, Err(AppError::Unauthenticated(_))));
}
