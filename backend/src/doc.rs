//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler under `/api/v1` plus the health probes,
//! the DTO schemas and the session cookie security scheme. Swagger UI serves
//! it in debug builds and `openapi-dump` prints it for external tooling.

use crate::domain::{Difficulty, Error, ErrorCode};
use crate::inbound::http::auth::{CredentialsRequest, UserResponse};
use crate::inbound::http::questions::{
    CreateQuestionRequest, QuestionResponse, UpdateQuestionRequest,
};
use crate::inbound::http::topics::{ProgressResponse, TopicResponse, TopicStatsResponse};
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
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Revision tracker API",
        description = "Track interview questions per topic, pick questions to revise and follow progress."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::sample_default,
        crate::inbound::http::questions::sample_count,
        crate::inbound::http::questions::update_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::topics::list_topics,
        crate::inbound::http::topics::topic_stats,
        crate::inbound::http::topics::overall_progress,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Difficulty,
        CredentialsRequest,
        UserResponse,
        QuestionResponse,
        CreateQuestionRequest,
        UpdateQuestionRequest,
        TopicResponse,
        TopicStatsResponse,
        ProgressResponse,
    )),
    tags(
        (name = "auth", description = "Registration and session handling"),
        (name = "questions", description = "The caller's question store"),
        (name = "topics", description = "Topics and per-topic statistics"),
        (name = "progress", description = "Overall revision progress"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

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
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("QuestionResponse", "lastRevisedDate")]
    #[case("QuestionResponse", "isRevised")]
    #[case("TopicStatsResponse", "revised")]
    #[case("ProgressResponse", "totalCount")]
    fn schemas_expose_wire_fields(#[case] schema_name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(schema_name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/questions")]
    #[case("/api/v1/questions/random/{count}")]
    #[case("/api/v1/questions/{id}")]
    #[case("/api/v1/topics/stats")]
    #[case("/api/v1/progress")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
