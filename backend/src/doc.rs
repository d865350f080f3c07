//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: all HTTP paths from the inbound layer, the shared error
//! schema, and the session-cookie security scheme. The generated document
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Quillpost backend API",
        description = "HTTP interface for the multi-user blog: accounts, \
                       sessions, the article lifecycle, comments, and likes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::author_shelf,
        crate::inbound::http::articles::create_draft,
        crate::inbound::http::articles::edit_article,
        crate::inbound::http::articles::publish_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::engagement::add_comment,
        crate::inbound::http::engagement::like_article,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Sanity checks on the generated document.
    use super::*;

    #[test]
    fn document_contains_all_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/logout",
            "/api/v1/me",
            "/api/v1/articles",
            "/api/v1/articles/{id}",
            "/api/v1/author/articles",
            "/api/v1/author/articles/{id}",
            "/api/v1/author/articles/{id}/publish",
            "/api/v1/articles/{id}/comments",
            "/api/v1/articles/{id}/likes",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing path {expected}"
            );
        }
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
