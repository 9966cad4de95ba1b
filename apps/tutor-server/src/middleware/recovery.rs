//! Panic recovery middleware.

use actix_web::{
    Error, web,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::FutureExt;
use std::any::Any;
use std::future::{Future, Ready, ready};
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;

use super::client_id::ClientId;
use super::error::AppError;
use crate::state::AppState;

/// Turns a panic inside request handling into a logged 500 response.
///
/// Wrap it outermost so it also covers the other middlewares. The panic
/// surfaces as [`AppError::Internal`], which renders the JSON error body.
pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RecoveryService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryService { service }))
    }
}

pub struct RecoveryService<S> {
    service: S,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl<S, B> Service<ServiceRequest> for RecoveryService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Owned copies only: the router needs the request to be uniquely held
        let trust = req
            .app_data::<web::Data<AppState>>()
            .is_some_and(|state| state.trust_proxy_headers);
        let client = ClientId::get_or_resolve(req.request(), trust);
        let method = req.method().clone();
        let path = req.path().to_string();

        let called = panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req)));

        Box::pin(async move {
            let outcome = match called {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };

            outcome.unwrap_or_else(|payload| {
                tracing::error!(
                    error = %panic_message(payload.as_ref()),
                    method = %method,
                    path = %path,
                    client = %client,
                    "Panic recovered"
                );
                Err(AppError::Internal(format!("panic while serving {method} {path}")).into())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_from_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(payload.as_ref()), "owned boom");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
