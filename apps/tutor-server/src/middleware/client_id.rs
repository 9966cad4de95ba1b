//! Client identifier resolution.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use std::fmt;
use std::future::{Ready, ready};

use tutor_core::domain::client_id;

/// Key the admission registries use for the requesting client.
///
/// Resolved once by the outermost admission middleware and stored in the
/// request extensions; later middlewares and handlers read it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    /// Resolve from proxy headers (when trusted) or the socket peer.
    pub fn resolve(req: &HttpRequest, trust_proxy_headers: bool) -> Self {
        let info = req.connection_info();
        let raw = if trust_proxy_headers {
            info.realip_remote_addr()
        } else {
            info.peer_addr()
        };
        Self(client_id(raw))
    }

    /// The stored identifier, resolving and caching it if absent.
    pub fn get_or_resolve(req: &HttpRequest, trust_proxy_headers: bool) -> Self {
        if let Some(id) = req.extensions().get::<ClientId>() {
            return id.clone();
        }
        let id = Self::resolve(req, trust_proxy_headers);
        req.extensions_mut().insert(id.clone());
        id
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extractor to get the client identifier in handlers.
impl FromRequest for ClientId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let trust = req
            .app_data::<actix_web::web::Data<crate::state::AppState>>()
            .map(|state| state.trust_proxy_headers)
            .unwrap_or(false);

        ready(Ok(Self::get_or_resolve(req, trust)))
    }
}
