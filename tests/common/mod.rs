use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use rolegate::config::cors::CorsConfig;
use rolegate::config::jwt::JwtConfig;
use rolegate::modules::users::model::{Role, User};
use rolegate::router::init_router;
use rolegate::state::AppState;
use rolegate::store::{MemoryUserStore, NewUser, UserStore};
use rolegate::utils::jwt::create_access_token;

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryUserStore>,
    pub jwt_config: JwtConfig,
}

/// Router wired to a fresh in-memory store, so tests exercise the full
/// HTTP stack without a database.
pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryUserStore::new());
    let jwt_config = JwtConfig {
        secret: "test-secret".to_string(),
        access_token_expiry: 3600,
    };
    let state = AppState {
        store: store.clone(),
        jwt_config: jwt_config.clone(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    };

    TestApp {
        app: init_router(state),
        store,
        jwt_config,
    }
}

impl TestApp {
    /// Seed a user directly in the store and mint a matching token.
    pub async fn seed_user(&self, username: &str, role: Role) -> (User, String) {
        let email = format!("{}@example.com", username);
        let user = self
            .store
            .create_user(NewUser::new(username, &email, "secret1", role).unwrap())
            .await
            .unwrap();
        let token =
            create_access_token(user.id, &user.email, user.role, &self.jwt_config).unwrap();
        (user, token)
    }

    /// Token for an identity that does not exist in the store.
    pub fn token_for(&self, id: Uuid, email: &str, role: Role) -> String {
        create_access_token(id, email, role, &self.jwt_config).unwrap()
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
