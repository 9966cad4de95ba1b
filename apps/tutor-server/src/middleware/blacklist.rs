//! IP blacklist middleware.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use tutor_core::domain::Denial;
use tutor_core::ports::IpBlacklist;

use super::client_id::ClientId;
use super::error::AppError;

/// Blacklist middleware factory.
///
/// Outermost admission check: resolves the client identifier, stores it for
/// the rest of the pipeline and answers 403 for blocked clients.
pub struct BlacklistMiddleware {
    blacklist: Arc<dyn IpBlacklist>,
    trust_proxy_headers: bool,
}

impl BlacklistMiddleware {
    pub fn new(blacklist: Arc<dyn IpBlacklist>, trust_proxy_headers: bool) -> Self {
        Self {
            blacklist,
            trust_proxy_headers,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BlacklistMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = BlacklistMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BlacklistMiddlewareService {
            service,
            blacklist: self.blacklist.clone(),
            trust_proxy_headers: self.trust_proxy_headers,
        }))
    }
}

pub struct BlacklistMiddlewareService<S> {
    service: S,
    blacklist: Arc<dyn IpBlacklist>,
    trust_proxy_headers: bool,
}

impl<S, B> Service<ServiceRequest> for BlacklistMiddlewareService<S>
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

        if self.blacklist.is_blocked(client.as_str()) {
            tracing::warn!(client = %client, path = %req.path(), "Blocked request from blacklisted client");

            let response = AppError::Denied(Denial::Blacklisted).error_response();
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
