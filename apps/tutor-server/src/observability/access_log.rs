//! Access log middleware - one event per completed request.

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::time::{Duration, Instant};

use crate::middleware::ClientId;

/// Logs status, latency and client for every request.
///
/// Level follows the status: INFO below 400, WARN for 4xx, ERROR for 5xx.
/// Requests slower than `slow_threshold` get an extra WARN event.
pub struct AccessLog {
    slow_threshold: Duration,
}

impl AccessLog {
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AccessLogService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogService {
            service,
            slow_threshold: self.slow_threshold,
        }))
    }
}

pub struct AccessLogService<S> {
    service: S,
    slow_threshold: Duration,
}

impl<S, B> Service<ServiceRequest> for AccessLogService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let slow_threshold = self.slow_threshold;

        let method = req.method().to_string();
        let path = req.path().to_string();
        let query = req.query_string().to_string();
        let client = req
            .request()
            .extensions()
            .get::<ClientId>()
            .map(|id| id.0.clone())
            .unwrap_or_default();
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let latency = start.elapsed();
            let status = res.status().as_u16();
            let latency_ms = latency.as_millis() as u64;

            if let Some(err) = res.response().error() {
                tracing::debug!(error = %err, path = %path, "Handler returned error");
            }

            if status >= 500 {
                tracing::error!(status, method = %method, path = %path, query = %query, client = %client, user_agent = %user_agent, latency_ms, "Server error");
            } else if status >= 400 {
                tracing::warn!(status, method = %method, path = %path, query = %query, client = %client, user_agent = %user_agent, latency_ms, "Client error");
            } else {
                tracing::info!(status, method = %method, path = %path, query = %query, client = %client, user_agent = %user_agent, latency_ms, "Request completed");
            }

            if latency > slow_threshold {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    client = %client,
                    latency_ms,
                    threshold_ms = slow_threshold.as_millis() as u64,
                    "Slow request detected"
                );
            }

            Ok(res)
        })
    }
}
