//! Cookie session access for handlers.
//!
//! The cookie carries a single entry, the signed-in [`UserId`]. Every
//! tracker endpoint other than register and login resolves it through
//! [`SessionContext::require_user_id`] and scopes its work to that user.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::{debug, warn};

use crate::domain::{Error, UserId};

const SESSION_USER_KEY: &str = "uid";

/// The caller's session, seen as "who is signed in".
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Sign `user_id` in, rotating the session key first.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(SESSION_USER_KEY, user_id.as_uuid())
            .map_err(|err| Error::internal(format!("session write failed: {err}")))?;
        debug!(%user_id, "session started");
        Ok(())
    }

    /// Sign out; the response drops the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in user, if the cookie names a well-formed one.
    ///
    /// A cookie holding something other than a UUID is treated as signed out
    /// rather than as a server fault.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        match self.0.get::<uuid::Uuid>(SESSION_USER_KEY) {
            Ok(id) => Ok(id.map(UserId::from_uuid)),
            Err(err) => {
                warn!(error = %err, "discarding unreadable session user");
                Ok(None)
            }
        }
    }

    /// The signed-in user, or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("sign in to access your questions"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self::new(req.get_session())))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::inbound::http::test_utils::{
        FIXTURE_USER_ID, session_cookie, sign_in, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = session.require_user_id()?;
        Ok(HttpResponse::Ok().body(id.to_string()))
    }

    async fn sign_out(session: SessionContext) -> HttpResponse {
        session.clear();
        HttpResponse::NoContent().finish()
    }

    async fn fixture_sign_in(session: SessionContext) -> Result<HttpResponse, Error> {
        let id = UserId::new(FIXTURE_USER_ID).map_err(|err| Error::internal(err.to_string()))?;
        session.persist_user(&id)?;
        Ok(HttpResponse::NoContent().finish())
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .route("/test/session", web::post().to(fixture_sign_in))
                    .route("/whoami", web::get().to(whoami))
                    .route("/sign-out", web::post().to(sign_out))
                    .route(
                        "/corrupt",
                        web::post().to(|session: Session| async move {
                            session
                                .insert(SESSION_USER_KEY, "not-a-uuid")
                                .expect("insert raw value");
                            HttpResponse::NoContent().finish()
                        }),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn signed_in_user_is_resolved() {
        let app = session_app!();
        let signed_in = test::call_service(&app, sign_in().to_request()).await;
        let cookie = session_cookie(&signed_in);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, FIXTURE_USER_ID);
    }

    #[actix_web::test]
    async fn anonymous_caller_is_unauthorised() {
        let app = session_app!();
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn non_uuid_session_value_counts_as_signed_out() {
        let app = session_app!();
        let corrupted = test::call_service(
            &app,
            test::TestRequest::post().uri("/corrupt").to_request(),
        )
        .await;
        let cookie = session_cookie(&corrupted);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn sign_out_removes_the_cookie() {
        let app = session_app!();
        let signed_in = test::call_service(&app, sign_in().to_request()).await;
        let cookie = session_cookie(&signed_in);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sign-out")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let removal = session_cookie(&res);
        assert!(removal.value().is_empty());
    }
}
