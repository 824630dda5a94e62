//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockLoginService, MockProgressQuery, MockQuestionCommand, MockQuestionQuery,
    MockRegistrationService, MockRevisionSelector, MockTopicRegistry, MockUserProfileQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const FIXTURE_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port; set expectations, then call [`Self::into_state`].
///
/// Ports without expectations panic when called, so a test only configures
/// what its handler touches.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationService,
    pub profile: MockUserProfileQuery,
    pub questions: MockQuestionCommand,
    pub questions_query: MockQuestionQuery,
    pub topics: MockTopicRegistry,
    pub revision: MockRevisionSelector,
    pub progress: MockProgressQuery,
}

impl MockPorts {
    /// Wrap the mocks in an `HttpState`.
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            registration: Arc::new(self.registration),
            profile: Arc::new(self.profile),
            questions: Arc::new(self.questions),
            questions_query: Arc::new(self.questions_query),
            topics: Arc::new(self.topics),
            revision: Arc::new(self.revision),
            progress: Arc::new(self.progress),
        }
    }
}

/// Id of the user signed in by the test helpers.
pub fn fixture_user_id() -> UserId {
    UserId::new(FIXTURE_USER_ID).expect("fixture user id")
}

/// App with the full `/api/v1` surface plus `/test/session`, which signs
/// in [`FIXTURE_USER_ID`] without touching the login port.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(
            "/test/session",
            web::post().to(|session: SessionContext| async move {
                session.persist_user(&fixture_user_id())?;
                Ok::<_, Error>(HttpResponse::NoContent().finish())
            }),
        )
        .service(web::scope("/api/v1").configure(crate::inbound::http::configure_api))
}

/// Request that signs in [`FIXTURE_USER_ID`] when sent to [`test_app`].
pub fn sign_in() -> test::TestRequest {
    test::TestRequest::post().uri("/test/session")
}

/// Extract the `session` cookie set on `res`.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
