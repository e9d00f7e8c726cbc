use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse, MessageResponse, RegisterRequestDto};
use crate::modules::users::controller::{ReviewResponse, ReviewedUser};
use crate::modules::users::model::{EditorRequest, Role, User, UserSummary};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::request_editor,
        crate::modules::users::controller::list_editor_requests,
        crate::modules::users::controller::approve_editor_request,
        crate::modules::users::controller::reject_editor_request,
        crate::router::health,
    ),
    components(
        schemas(
            User,
            UserSummary,
            Role,
            EditorRequest,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ReviewResponse,
            ReviewedUser,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "User management (Admin)"),
        (name = "Editor requests", description = "Viewer promotion workflow"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
