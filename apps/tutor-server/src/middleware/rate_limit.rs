//! Rate limiting middleware.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use tutor_core::domain::{Denial, LimiterScope};
use tutor_core::ports::ClientRateLimiter;

use super::client_id::ClientId;
use super::error::AppError;

/// Rate limiting middleware factory.
///
/// Wrap the whole app with a [`LimiterScope::Global`] instance and the API
/// scope with a [`LimiterScope::Api`] one; each consults its own registry.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn ClientRateLimiter>,
    scope: LimiterScope,
    trust_proxy_headers: bool,
}

impl RateLimitMiddleware {
    pub fn new(
        limiter: Arc<dyn ClientRateLimiter>,
        scope: LimiterScope,
        trust_proxy_headers: bool,
    ) -> Self {
        Self {
            limiter,
            scope,
            trust_proxy_headers,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
            scope: self.scope,
            trust_proxy_headers: self.trust_proxy_headers,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<dyn ClientRateLimiter>,
    scope: LimiterScope,
    trust_proxy_headers: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = ClientId::get_or_resolve(req.request(), self.trust_proxy_headers);

        // Synchronous, in-memory check - no await before the decision
        if !self.limiter.allow(client.as_str()) {
            tracing::warn!(
                client = %client,
                scope = %self.scope,
                path = %req.path(),
                "Rate limit exceeded"
            );

            let mut response = AppError::Denied(Denial::RateLimited(self.scope)).error_response();
            response.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-scope"),
                HeaderValue::from_static(self.scope.as_str()),
            );

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);

            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
