//! Per-request view used by access requirements.
//!
//! An [`AccessContext`] wraps the in-flight [`HttpRequest`]. The principal
//! lives in the request extensions, where [`SecurityTransform`] puts it after
//! authentication; requirements only read it.
//!
//! [`SecurityTransform`]: crate::http::security::middleware::SecurityTransform

use actix_web::dev::ServiceRequest;
use actix_web::http::header::HeaderMap;
use actix_web::{HttpMessage, HttpRequest};

use crate::http::security::User;

const REAL_IP_HEADER: &str = "x-real-ip";
const USER_AGENT_HEADER: &str = "user-agent";

/// Read-only view of a single request for access decisions.
#[derive(Clone)]
pub struct AccessContext {
    req: HttpRequest,
}

impl AccessContext {
    pub fn new(req: HttpRequest) -> Self {
        AccessContext { req }
    }

    pub fn from_service_request(req: &ServiceRequest) -> Self {
        Self::new(req.request().clone())
    }

    pub fn request(&self) -> &HttpRequest {
        &self.req
    }

    /// Returns a clone of the authenticated principal, if any.
    pub fn principal(&self) -> Option<User> {
        self.req.extensions().get::<User>().cloned()
    }

    /// Runs `f` against the principal without cloning it.
    pub fn with_principal<R>(&self, f: impl FnOnce(Option<&User>) -> R) -> R {
        f(self.req.extensions().get::<User>())
    }

    pub fn is_authenticated(&self) -> bool {
        self.with_principal(|user| user.is_some())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.with_principal(|user| user.is_some_and(|u| u.has_role(role)))
    }

    pub fn headers(&self) -> &HeaderMap {
        self.req.headers()
    }

    /// Returns a header value if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.req.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Client address as forwarded by the fronting proxy.
    pub fn client_ip(&self) -> Option<&str> {
        self.header(REAL_IP_HEADER)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header(USER_AGENT_HEADER)
    }

    /// Makes `user` the principal of this request.
    ///
    /// Only authentication collaborators call this, after they have
    /// established a session for the user.
    pub fn establish(&self, user: User) {
        self.req.extensions_mut().insert(user);
    }
}
