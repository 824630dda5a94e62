//! Question API handlers.
//!
//! ```text
//! GET /api/v1/questions?topic=arrays&status=stale&staleDays=14
//! POST /api/v1/questions {"name":"Two Sum","topic":"Arrays","difficulty":"Easy"}
//! PUT /api/v1/questions/{id} {"isRevised":true}
//! DELETE /api/v1/questions/{id}
//! GET /api/v1/questions/random/3
//! ```
//!
//! `/questions/random` must be registered ahead of `/questions/{id}` so the
//! literal segment wins.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Difficulty, Error, NewQuestion, Question, QuestionFilter, QuestionId,
    QuestionName, QuestionPatch, RevisionStatus, SampleSize, TopicName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, double_option, field_error, parse_rfc3339_timestamp,
    question_field_error, require,
};

const NAME: FieldName = FieldName::new("name");
const TOPIC: FieldName = FieldName::new("topic");
const DIFFICULTY: FieldName = FieldName::new("difficulty");
const LAST_REVISED_DATE: FieldName = FieldName::new("lastRevisedDate");
const STATUS: FieldName = FieldName::new("status");
const STALE_DAYS: FieldName = FieldName::new("staleDays");
const ID: FieldName = FieldName::new("id");
const COUNT: FieldName = FieldName::new("count");

/// Question as returned by every question endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub code: String,
    pub notes: String,
    pub link: String,
    pub is_revised: bool,
    #[schema(format = "date-time")]
    pub last_revised_date: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.to_string(),
            name: question.name.into(),
            topic: question.topic.into(),
            difficulty: question.difficulty,
            code: question.code,
            notes: question.notes,
            link: question.link,
            is_revised: question.is_revised,
            last_revised_date: question.last_revised_date.map(|date| date.to_rfc3339()),
            created_at: question.created_at.to_rfc3339(),
        }
    }
}

fn respond_with(questions: Vec<Question>) -> web::Json<Vec<QuestionResponse>> {
    web::Json(questions.into_iter().map(QuestionResponse::from).collect())
}

/// Filters accepted by `GET /api/v1/questions`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuestionsQuery {
    /// Case-insensitive substring of the question name.
    pub search: Option<String>,
    /// Exact topic, compared case-insensitively.
    pub topic: Option<String>,
    /// `Easy`, `Medium` or `Hard`.
    pub difficulty: Option<String>,
    /// `all`, `revised`, `not_revised` or `stale`.
    pub status: Option<String>,
    /// Age in days past which a revision counts as stale (default 7).
    pub stale_days: Option<String>,
}

impl TryFrom<ListQuestionsQuery> for QuestionFilter {
    type Error = Error;

    fn try_from(query: ListQuestionsQuery) -> Result<Self, Self::Error> {
        let mut filter = QuestionFilter::default();
        if let Some(search) = query.search {
            filter = filter.with_search(search);
        }
        if let Some(topic) = query.topic {
            filter = filter.with_topic(topic);
        }
        if let Some(raw) = query.difficulty.filter(|raw| !raw.trim().is_empty()) {
            let difficulty = raw
                .trim()
                .parse::<Difficulty>()
                .map_err(|err| question_field_error(DIFFICULTY, err))?;
            filter = filter.with_difficulty(difficulty);
        }
        if let Some(raw) = query.status.filter(|raw| !raw.trim().is_empty()) {
            let status = raw
                .trim()
                .parse::<RevisionStatus>()
                .map_err(|err| field_error(STATUS, ErrorCode::InvalidStatus, err.to_string()))?;
            filter = filter.with_status(status);
        }
        if let Some(raw) = query.stale_days {
            let days = raw.trim().parse::<u32>().map_err(|_| {
                field_error(
                    STALE_DAYS,
                    ErrorCode::InvalidCount,
                    "staleDays must be a non-negative integer",
                )
            })?;
            filter = filter.with_stale_days(days);
        }
        Ok(filter)
    }
}

/// Body for `POST /api/v1/questions`.
///
/// Example JSON:
/// `{"name":"Two Sum","topic":"Arrays","difficulty":"Easy","link":"https://leetcode.com/problems/two-sum"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub name: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub code: Option<String>,
    pub notes: Option<String>,
    pub link: Option<String>,
    pub is_revised: Option<bool>,
    #[schema(format = "date-time")]
    pub last_revised_date: Option<String>,
}

impl TryFrom<CreateQuestionRequest> for NewQuestion {
    type Error = Error;

    fn try_from(request: CreateQuestionRequest) -> Result<Self, Self::Error> {
        let name = QuestionName::new(require(request.name, NAME)?)
            .map_err(|err| question_field_error(NAME, err))?;
        let topic = TopicName::new(require(request.topic, TOPIC)?)
            .map_err(|err| question_field_error(TOPIC, err))?;
        let difficulty = parse_difficulty(&require(request.difficulty, DIFFICULTY)?)?;
        let last_revised_date = request
            .last_revised_date
            .as_deref()
            .map(|raw| parse_rfc3339_timestamp(raw, LAST_REVISED_DATE))
            .transpose()?;

        let mut draft = NewQuestion::new(name, topic, difficulty)
            .with_revision(request.is_revised.unwrap_or(false), last_revised_date);
        if let Some(code) = request.code {
            draft = draft.with_code(code);
        }
        if let Some(notes) = request.notes {
            draft = draft.with_notes(notes);
        }
        if let Some(link) = request.link {
            draft = draft.with_link(link);
        }
        Ok(draft)
    }
}

/// Body for `PUT /api/v1/questions/{id}`; every field is optional.
///
/// `lastRevisedDate: null` is an explicit clear and differs from omitting the
/// field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub name: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub code: Option<String>,
    pub notes: Option<String>,
    pub link: Option<String>,
    pub is_revised: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_revised_date: Option<Option<String>>,
}

impl TryFrom<UpdateQuestionRequest> for QuestionPatch {
    type Error = Error;

    fn try_from(request: UpdateQuestionRequest) -> Result<Self, Self::Error> {
        let name = request
            .name
            .map(|raw| QuestionName::new(raw).map_err(|err| question_field_error(NAME, err)))
            .transpose()?;
        let topic = request
            .topic
            .map(|raw| TopicName::new(raw).map_err(|err| question_field_error(TOPIC, err)))
            .transpose()?;
        let difficulty = request
            .difficulty
            .as_deref()
            .map(parse_difficulty)
            .transpose()?;
        let last_revised_date = match request.last_revised_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(parse_rfc3339_timestamp(&raw, LAST_REVISED_DATE)?)),
        };

        Ok(QuestionPatch {
            name,
            topic,
            difficulty,
            code: request.code,
            notes: request.notes,
            link: request.link,
            is_revised: request.is_revised,
            last_revised_date,
        })
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, Error> {
    raw.trim()
        .parse::<Difficulty>()
        .map_err(|err| question_field_error(DIFFICULTY, err))
}

fn parse_question_id(raw: &str) -> Result<QuestionId, Error> {
    QuestionId::new(raw).map_err(|_| {
        field_error(
            ID,
            ErrorCode::InvalidUuid,
            format!("question id must be a UUID, got '{raw}'"),
        )
    })
}

fn parse_sample_size(raw: &str) -> Result<SampleSize, Error> {
    let invalid = || {
        field_error(
            COUNT,
            ErrorCode::InvalidCount,
            "count must be a positive integer",
        )
    };
    let count = raw.trim().parse::<usize>().map_err(|_| invalid())?;
    SampleSize::new(count).map_err(|_| invalid())
}

/// List the caller's questions, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/v1/questions",
    params(ListQuestionsQuery),
    responses(
        (status = 200, description = "Questions", body = [QuestionResponse]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["questions"],
    operation_id = "listQuestions"
)]
#[get("/questions")]
pub async fn list_questions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuestionsQuery>,
) -> ApiResult<web::Json<Vec<QuestionResponse>>> {
    let user_id = session.require_user_id()?;
    let filter = QuestionFilter::try_from(query.into_inner())?;
    let questions = state
        .questions_query
        .list_questions(&user_id, &filter)
        .await?;
    Ok(respond_with(questions))
}

/// Create a question; unknown topics are registered on the way.
#[utoipa::path(
    post,
    path = "/api/v1/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["questions"],
    operation_id = "createQuestion"
)]
#[post("/questions")]
pub async fn create_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = NewQuestion::try_from(payload.into_inner())?;
    let question = state.questions.create(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(QuestionResponse::from(question)))
}

/// Draw a random sample of five questions.
#[utoipa::path(
    get,
    path = "/api/v1/questions/random",
    responses(
        (status = 200, description = "Sampled questions", body = [QuestionResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["questions"],
    operation_id = "sampleQuestions"
)]
#[get("/questions/random")]
pub async fn sample_default(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<QuestionResponse>>> {
    let user_id = session.require_user_id()?;
    let questions = state
        .revision
        .sample(&user_id, SampleSize::default())
        .await?;
    Ok(respond_with(questions))
}

/// Draw a random sample of `count` questions, or all of them if fewer exist.
#[utoipa::path(
    get,
    path = "/api/v1/questions/random/{count}",
    params(("count" = u32, Path, description = "Sample size, 1 or more")),
    responses(
        (status = 200, description = "Sampled questions", body = [QuestionResponse]),
        (status = 400, description = "Invalid count", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["questions"],
    operation_id = "sampleQuestionsWithCount"
)]
#[get("/questions/random/{count}")]
pub async fn sample_count(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<QuestionResponse>>> {
    let user_id = session.require_user_id()?;
    let size = parse_sample_size(&path.into_inner())?;
    let questions = state.revision.sample(&user_id, size).await?;
    Ok(respond_with(questions))
}

/// Apply a partial update to one of the caller's questions.
#[utoipa::path(
    put,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question id")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Updated question", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["questions"],
    operation_id = "updateQuestion"
)]
#[put("/questions/{id}")]
pub async fn update_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateQuestionRequest>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_question_id(&path.into_inner())?;
    let patch = QuestionPatch::try_from(payload.into_inner())?;
    let question = state.questions.update(&user_id, &id, patch).await?;
    Ok(web::Json(QuestionResponse::from(question)))
}

/// Delete one of the caller's questions. Its topic stays registered.
#[utoipa::path(
    delete,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion"
)]
#[delete("/questions/{id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_question_id(&path.into_inner())?;
    state.questions.delete(&user_id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "questions_tests.rs"]
mod tests;
