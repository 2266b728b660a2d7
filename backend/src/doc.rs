//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the `/user` CRUD paths, the health probes, the
//! request and response schemas, and the `access_token` header scheme. The
//! document backs Swagger UI in debug builds and is printed by
//! `cargo run --bin openapi-dump`.

use crate::domain::{Error, ErrorCode, UserProfile};
use crate::inbound::http::api_key::API_KEY_HEADER;
use crate::inbound::http::users::CreatedUser;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Security scheme name referenced by the document-level requirement.
pub const API_KEY_SCHEME: &str = "ApiKeyHeader";

/// Enrich the generated document with the API key header scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            API_KEY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                API_KEY_HEADER,
                "Shared secret configured via USER_SERVICE_API_KEY.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "User registry API",
        description = "Create, read, update, and delete users identified by a unique email address."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ApiKeyHeader" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(UserProfile, CreatedUser, Error, ErrorCode)),
    tags(
        (name = "users", description = "User CRUD behind the API key gate"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
