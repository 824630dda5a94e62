//! Per-request correlation and access logging.
//!
//! A request keeps the `trace-id` it arrived with when that is a bare UUID;
//! otherwise it gets a fresh one. Handlers run inside [`TraceId::scope`], the
//! identifier is echoed on the response, and one `request completed` line is
//! logged with the status and latency.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// `App::new().wrap(Trace)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, inner: S) -> Self::Future {
        ready(Ok(TraceService { inner }))
    }
}

pub struct TraceService<S> {
    inner: S,
}

fn incoming_trace_id(req: &ServiceRequest) -> TraceId {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_client)
        .unwrap_or_else(TraceId::generate)
}

impl<S, B> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = incoming_trace_id(&req);
        let span = info_span!(
            "http",
            %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let started = Instant::now();
        let pending = self.inner.call(req);

        let traced = async move {
            let mut res = pending.await?;
            info!(
                status = res.status().as_u16(),
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "request completed"
            );
            match HeaderValue::try_from(trace_id.to_string()) {
                Ok(value) => {
                    res.headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(err) => warn!(error = %err, "trace id is not a valid header value"),
            }
            Ok(res)
        };
        Box::pin(trace_id.scope(traced.instrument(span)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::inbound::http::ApiResult;
    use actix_web::{App, HttpResponse, test, web};

    async fn echo_scope() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn missing_question() -> ApiResult<HttpResponse> {
        Err(crate::domain::Error::not_found("question not found"))
    }

    macro_rules! traced_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(Trace)
                    .route("/scope", web::get().to(echo_scope))
                    .route("/missing", web::get().to(missing_question)),
            )
            .await
        };
    }

    fn header_value<B>(res: &ServiceResponse<B>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("trace id header")
            .to_owned()
    }

    #[actix_web::test]
    async fn handler_scope_matches_response_header() {
        let app = traced_app!();
        let res = test::call_service(&app, test::TestRequest::get().uri("/scope").to_request()).await;
        let header = header_value(&res);
        assert_eq!(test::read_body(res).await, header);
    }

    #[actix_web::test]
    async fn client_supplied_uuid_is_kept() {
        let app = traced_app!();
        let supplied = "6f1c0a52-9a0e-4a43-8c3c-3b2c5c1d7e90";
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/scope")
                .insert_header((TRACE_ID_HEADER, supplied))
                .to_request(),
        )
        .await;
        assert_eq!(header_value(&res), supplied);
    }

    #[actix_web::test]
    async fn malformed_client_value_is_replaced() {
        let app = traced_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/scope")
                .insert_header((TRACE_ID_HEADER, "abc"))
                .to_request(),
        )
        .await;
        assert!(header_value(&res).parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn error_body_quotes_the_trace_id() {
        let app = traced_app!();
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
        let header = header_value(&res);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["traceId"], serde_json::json!(header));
    }
}
