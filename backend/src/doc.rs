//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint (users, jokes, health), the
//! request and response DTOs, the error wrappers from
//! [`crate::inbound::http::schemas`], and the session cookie security scheme.
//!
//! The generated document backs Swagger UI in debug builds and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::jokes::{CreateJokeRequest, JokeResponse, JokeSummaryResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ValidationDetailsSchema};
use crate::inbound::http::session::SESSION_COOKIE_NAME;
use crate::inbound::http::users::{CredentialsRequest, UserResponse};
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
                SESSION_COOKIE_NAME,
                "Signed session cookie issued by POST /api/v1/login or /api/v1/register.",
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
        title = "Jokes API",
        description = "Accounts, cookie sessions, and a shared collection of jokes that only their authors may delete."
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
        crate::inbound::http::jokes::list_jokes,
        crate::inbound::http::jokes::random_joke,
        crate::inbound::http::jokes::get_joke,
        crate::inbound::http::jokes::create_joke,
        crate::inbound::http::jokes::delete_joke,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ValidationDetailsSchema,
        CredentialsRequest,
        UserResponse,
        JokeSummaryResponse,
        JokeResponse,
        CreateJokeRequest,
    )),
    tags(
        (name = "users", description = "Registration, login, and the current session"),
        (name = "jokes", description = "Reading, creating, and deleting jokes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI paths, schemas, and security wiring.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case("JokeResponse", "isOwner")]
    #[case("JokeResponse", "ownerId")]
    #[case("CredentialsRequest", "redirectTo")]
    #[case("UserResponse", "createdAt")]
    #[case("JokeSummaryResponse", "name")]
    fn schemas_use_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas
            .get(schema)
            .unwrap_or_else(|| panic!("{schema} registered"));
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/login")]
    #[case("/api/v1/logout")]
    #[case("/api/v1/users/me")]
    #[case("/api/v1/jokes")]
    #[case("/api/v1/jokes/random")]
    #[case("/api/v1/jokes/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }

    #[rstest]
    #[case("/api/v1/jokes/{id}", "get", "404")]
    #[case("/api/v1/jokes/{id}", "delete", "403")]
    #[case("/api/v1/jokes", "post", "400")]
    #[case("/api/v1/jokes", "get", "503")]
    #[case("/api/v1/login", "post", "401")]
    #[case("/api/v1/register", "post", "409")]
    #[case("/api/v1/users/me", "get", "401")]
    fn error_responses_reference_the_error_schema(
        #[case] path: &str,
        #[case] method: &str,
        #[case] status: &str,
    ) {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("document serialises");
        let schema =
            &json["paths"][path][method]["responses"][status]["content"]["application/json"]["schema"];
        assert_eq!(
            schema["$ref"],
            format!("#/components/schemas/{ERROR_SCHEMA_NAME}"),
            "{method} {path} {status}"
        );
    }

    #[rstest]
    fn session_cookie_scheme_names_the_cookie() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("document serialises");
        assert_eq!(
            json["components"]["securitySchemes"]["SessionCookie"]["name"],
            SESSION_COOKIE_NAME
        );
        assert_eq!(
            json["components"]["securitySchemes"]["SessionCookie"]["in"],
            "cookie"
        );
    }
}
