//! Topic and progress API handlers.
//!
//! ```text
//! GET /api/v1/topics
//! GET /api/v1/topics/stats
//! GET /api/v1/progress
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, OverallProgress, Topic, TopicStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id.to_string(),
            name: topic.name.into(),
            created_at: topic.created_at.to_rfc3339(),
        }
    }
}

/// Question counts for one topic.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopicStatsResponse {
    pub topic: String,
    pub total: u64,
    pub revised: u64,
}

impl From<(String, TopicStats)> for TopicStatsResponse {
    fn from((topic, stats): (String, TopicStats)) -> Self {
        Self {
            topic,
            total: stats.total,
            revised: stats.revised,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub revised_count: u64,
    pub total_count: u64,
}

impl From<OverallProgress> for ProgressResponse {
    fn from(progress: OverallProgress) -> Self {
        Self {
            revised_count: progress.revised_count,
            total_count: progress.total_count,
        }
    }
}

/// List the caller's registered topics, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/topics",
    responses(
        (status = 200, description = "Topics", body = [TopicResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["topics"],
    operation_id = "listTopics"
)]
#[get("/topics")]
pub async fn list_topics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TopicResponse>>> {
    let user_id = session.require_user_id()?;
    let topics = state.topics.list_topics(&user_id).await?;
    Ok(web::Json(topics.into_iter().map(TopicResponse::from).collect()))
}

/// Per-topic totals, sorted by topic name.
///
/// Topics are grouped by the exact string stored on each question, so a
/// registered topic with no questions is absent.
#[utoipa::path(
    get,
    path = "/api/v1/topics/stats",
    responses(
        (status = 200, description = "Per-topic counts", body = [TopicStatsResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["topics"],
    operation_id = "topicStats"
)]
#[get("/topics/stats")]
pub async fn topic_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TopicStatsResponse>>> {
    let user_id = session.require_user_id()?;
    let stats = state.progress.per_topic_stats(&user_id).await?;
    Ok(web::Json(
        stats.into_iter().map(TopicStatsResponse::from).collect(),
    ))
}

/// Revised versus total questions.
#[utoipa::path(
    get,
    path = "/api/v1/progress",
    responses(
        (status = 200, description = "Overall progress", body = ProgressResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["progress"],
    operation_id = "overallProgress"
)]
#[get("/progress")]
pub async fn overall_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProgressResponse>> {
    let user_id = session.require_user_id()?;
    let progress = state.progress.overall_progress(&user_id).await?;
    Ok(web::Json(ProgressResponse::from(progress)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::TopicName;
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, sign_in, test_app};
    use crate::test_support::fixture_timestamp;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    #[actix_web::test]
    async fn stats_are_sorted_by_topic() {
        let mut ports = MockPorts::default();
        ports.progress.expect_per_topic_stats().returning(|_| {
            Ok(BTreeMap::from([
                ("Trees".to_owned(), TopicStats { total: 1, revised: 1 }),
                ("Arrays".to_owned(), TopicStats { total: 2, revised: 1 }),
            ]))
        });
        let app = test::init_service(test_app(ports.into_state())).await;
        let cookie = session_cookie(&test::call_service(&app, sign_in().to_request()).await);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/topics/stats")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            json!([
                {"topic": "Arrays", "total": 2, "revised": 1},
                {"topic": "Trees", "total": 1, "revised": 1}
            ])
        );
    }

    #[actix_web::test]
    async fn topics_are_listed_by_name() {
        let mut ports = MockPorts::default();
        ports.topics.expect_list_topics().returning(|user_id| {
            Ok(vec![Topic::new(
                *user_id,
                TopicName::new("Graphs").expect("topic"),
                fixture_timestamp(),
            )])
        });
        let app = test::init_service(test_app(ports.into_state())).await;
        let cookie = session_cookie(&test::call_service(&app, sign_in().to_request()).await);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/topics")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["name"], "Graphs");
    }

    #[actix_web::test]
    async fn progress_uses_camel_case_counts() {
        let mut ports = MockPorts::default();
        ports.progress.expect_overall_progress().returning(|_| {
            Ok(OverallProgress {
                revised_count: 2,
                total_count: 3,
            })
        });
        let app = test::init_service(test_app(ports.into_state())).await;
        let cookie = session_cookie(&test::call_service(&app, sign_in().to_request()).await);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/progress")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({"revisedCount": 2, "totalCount": 3}));
    }

    #[actix_web::test]
    async fn storage_outage_maps_to_503() {
        let mut ports = MockPorts::default();
        ports
            .progress
            .expect_overall_progress()
            .returning(|_| Err(Error::service_unavailable("question store unavailable")));
        let app = test::init_service(test_app(ports.into_state())).await;
        let cookie = session_cookie(&test::call_service(&app, sign_in().to_request()).await);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/progress")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
