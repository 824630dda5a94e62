//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod questions;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod topics;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller supplies the `/api/v1` scope and its session middleware. The
/// random-sample routes precede `/questions/{id}` so `random` is never read
/// as an id.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(questions::list_questions)
        .service(questions::create_question)
        .service(questions::sample_default)
        .service(questions::sample_count)
        .service(questions::update_question)
        .service(questions::delete_question)
        .service(topics::list_topics)
        .service(topics::topic_stats)
        .service(topics::overall_progress);
}
