use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

/// Per-request identifier, shared by the request and its response.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Logs every response: successes at debug, 4xx at warn, 5xx at error with
/// the attached `ErrorReport` when a handler left one.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.to_string())
        .unwrap_or_default();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    let path = uri.path();
    let query = uri.query().unwrap_or("");

    match Severity::of(status) {
        Severity::Ok => {
            debug!(
                target: "postbox::http::response",
                status = status.as_u16(),
                %method,
                path,
                elapsed_ms,
                request_id,
                "request completed",
            );
        }
        severity => {
            let report = response.extensions_mut().remove::<ErrorReport>();
            let (source, chain) = report
                .map(|report| (report.source, report.messages))
                .unwrap_or(("unknown", Vec::new()));
            let detail = chain.first().map_or("no diagnostic available", String::as_str);

            if severity == Severity::Server {
                error!(
                    target: "postbox::http::response",
                    status = status.as_u16(),
                    %method,
                    path,
                    query,
                    elapsed_ms,
                    source,
                    detail,
                    ?chain,
                    request_id,
                    "request failed",
                );
            } else {
                warn!(
                    target: "postbox::http::response",
                    status = status.as_u16(),
                    %method,
                    path,
                    query,
                    elapsed_ms,
                    source,
                    detail,
                    ?chain,
                    request_id,
                    "client request error",
                );
            }
        }
    }

    response
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Ok,
    Client,
    Server,
}

impl Severity {
    fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::Server
        } else if status.is_client_error() {
            Self::Client
        } else {
            Self::Ok
        }
    }
}
