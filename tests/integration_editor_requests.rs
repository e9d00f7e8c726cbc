mod common;

use axum::http::StatusCode;
use uuid::Uuid;

use common::spawn_app;
use rolegate::modules::users::model::Role;
use rolegate::store::UserStore;

#[tokio::test]
async fn test_full_promotion_flow() {
    let app = spawn_app();
    let (_bob, admin_token) = app.seed_user("bob", Role::Admin).await;
    let (alice, alice_token) = app.seed_user("alice", Role::Viewer).await;

    // Alice requests editor access.
    let (status, body) = app
        .request("POST", "/api/users/request-editor", Some(&alice_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Editor access requested");

    // Bob sees the pending request.
    let (status, body) = app
        .request("GET", "/api/users/editor-requests", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let pending = body.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["username"], "alice");
    assert_eq!(pending[0]["editor_request"]["status"], "pending");

    // Bob approves. Role and request state update together.
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/users/editor-requests/{}/approve", alice.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], serde_json::json!(alice.id));
    assert_eq!(body["user"]["role"], "Editor");

    let stored = app.store.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Editor);
    assert_eq!(stored.editor_request.status(), "approved");
}

#[tokio::test]
async fn test_double_request_is_bad_request() {
    let app = spawn_app();
    let (_alice, token) = app.seed_user("alice", Role::Viewer).await;

    let (status, _) = app
        .request("POST", "/api/users/request-editor", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request("POST", "/api/users/request-editor", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Editor request already pending");
}

#[tokio::test]
async fn test_reject_then_re_request() {
    let app = spawn_app();
    let (_bob, admin_token) = app.seed_user("bob", Role::Admin).await;
    let (alice, alice_token) = app.seed_user("alice", Role::Viewer).await;

    app.request("POST", "/api/users/request-editor", Some(&alice_token), None)
        .await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/users/editor-requests/{}/reject", alice.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "Viewer");

    // A rejected viewer may apply again.
    let (status, _) = app
        .request("POST", "/api/users/request-editor", Some(&alice_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let stored = app.store.find_by_id(alice.id).await.unwrap().unwrap();
    assert!(stored.editor_request.is_pending());
}

#[tokio::test]
async fn test_review_without_pending_request_is_bad_request() {
    let app = spawn_app();
    let (_bob, admin_token) = app.seed_user("bob", Role::Admin).await;
    let (alice, _) = app.seed_user("alice", Role::Viewer).await;

    for action in ["approve", "reject"] {
        let (status, body) = app
            .request(
                "POST",
                &format!("/api/users/editor-requests/{}/{}", alice.id, action),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No pending request for this user");
    }
}

#[tokio::test]
async fn test_review_unknown_user_is_not_found() {
    let app = spawn_app();
    let (_bob, admin_token) = app.seed_user("bob", Role::Admin).await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/users/editor-requests/{}/approve", Uuid::new_v4()),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_with_stale_identity_is_not_found() {
    // Valid token, but the subject no longer exists in the store.
    let app = spawn_app();
    let token = app.token_for(Uuid::new_v4(), "ghost@example.com", Role::Viewer);

    let (status, _) = app
        .request("POST", "/api/users/request-editor", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editor_cannot_request_again() {
    let app = spawn_app();
    let (_editor, token) = app.seed_user("eddy", Role::Editor).await;

    let (status, _) = app
        .request("POST", "/api/users/request-editor", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_admin_cannot_list_requests() {
    let app = spawn_app();
    let (_alice, viewer_token) = app.seed_user("alice", Role::Viewer).await;
    let (_eddy, editor_token) = app.seed_user("eddy", Role::Editor).await;

    for token in [&viewer_token, &editor_token] {
        let (status, _) = app
            .request("GET", "/api/users/editor-requests", Some(token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_admin_cannot_use_viewer_request_route() {
    // Exact-match authorization: Admin holds no implicit Viewer powers.
    let app = spawn_app();
    let (_bob, admin_token) = app.seed_user("bob", Role::Admin).await;

    let (status, _) = app
        .request("POST", "/api/users/request-editor", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unauthenticated_requests_rejected() {
    let app = spawn_app();

    let (status, _) = app.request("GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("POST", "/api/users/request-editor", Some("garbage-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_lists_users_with_restricted_projection() {
    let app = spawn_app();
    let (_bob, admin_token) = app.seed_user("bob", Role::Admin).await;
    app.seed_user("alice", Role::Viewer).await;

    let (status, body) = app.request("GET", "/api/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        let keys: Vec<&String> = user.as_object().unwrap().keys().collect();
        for key in keys {
            assert!(
                ["username", "email", "role", "editor_request"].contains(&key.as_str()),
                "unexpected field {key} in /api/users projection"
            );
        }
    }
}
