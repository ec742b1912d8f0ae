//! Security middleware for Actix Web.
//!
//! [`SecurityTransform`] resolves the principal once per request.
//! [`Has`] guards a scope or resource with a [`Requirement`].
//!
//! # Example
//! ```ignore
//! App::new()
//!     .wrap(SecurityTransform::new().authenticator(authenticator))
//!     .service(
//!         web::resource("/api/user/me")
//!             .wrap(has(profiles.has_access()))
//!             .route(web::get().to(me)),
//!     )
//! ```

use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::error::{AccessError, ErrorResponse, Rejection};
use crate::http::security::combinator::{requires_all, requires_any, Combinator};
use crate::http::security::config::Authenticator;
use crate::http::security::context::AccessContext;
use crate::http::security::requirement::{Outcome, Requirement, SharedRequirement};

// =============================================================================
// gate
// =============================================================================

/// Evaluates `requirement` and continues with `on_grant` or `on_deny`.
///
/// `state` is handed to whichever continuation runs. The context is dropped
/// before either continuation starts, so `state` may own the request.
/// An `AccessError` skips both continuations.
pub async fn gate<R, S, T, G, GF, D, DF>(
    requirement: &R,
    ctx: AccessContext,
    state: S,
    on_grant: G,
    on_deny: D,
) -> Result<T, AccessError>
where
    R: Requirement + ?Sized,
    G: FnOnce(S) -> GF,
    GF: Future<Output = T>,
    D: FnOnce(S, Rejection) -> DF,
    DF: Future<Output = T>,
{
    let outcome = requirement.check(&ctx).await?;
    drop(ctx);

    match outcome {
        Outcome::Granted => Ok(on_grant(state).await),
        Outcome::Denied(rejection) => {
            tracing::debug!(
                requirement = requirement.name(),
                status = rejection.status().as_u16(),
                kind = rejection.kind(),
                "request denied"
            );
            Ok(on_deny(state, rejection).await)
        }
    }
}

// =============================================================================
// Has
// =============================================================================

/// Middleware factory guarding a service with a requirement.
///
/// Denied requests get a JSON `{status, type, message}` response and never
/// reach the wrapped service.
pub struct Has<R> {
    requirement: Arc<R>,
    expose_server_errors: bool,
}

impl<R> Clone for Has<R> {
    fn clone(&self) -> Self {
        Has {
            requirement: Arc::clone(&self.requirement),
            expose_server_errors: self.expose_server_errors,
        }
    }
}

impl<R> Has<R> {
    /// Shows the underlying message when the requirement itself fails.
    pub fn expose_server_errors(mut self, expose: bool) -> Self {
        self.expose_server_errors = expose;
        self
    }
}

pub fn has<R: Requirement + 'static>(requirement: R) -> Has<R> {
    Has {
        requirement: Arc::new(requirement),
        expose_server_errors: false,
    }
}

pub fn has_all(requirements: Vec<SharedRequirement>) -> Has<Combinator> {
    has(requires_all(requirements))
}

pub fn has_any(requirements: Vec<SharedRequirement>) -> Has<Combinator> {
    has(requires_any(requirements))
}

impl<S, B, R> Transform<S, ServiceRequest> for Has<R>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    R: Requirement + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = HasService<R, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(HasService {
            requirement: Arc::clone(&self.requirement),
            expose_server_errors: self.expose_server_errors,
            service: Rc::new(service),
        })
    }
}

pub struct HasService<R, S> {
    requirement: Arc<R>,
    expose_server_errors: bool,
    service: Rc<S>,
}

impl<R, S, B> Service<ServiceRequest> for HasService<R, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    R: Requirement + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let requirement = Arc::clone(&self.requirement);
        let expose_server_errors = self.expose_server_errors;

        Box::pin(async move {
            let ctx = AccessContext::from_service_request(&req);

            gate(
                requirement.as_ref(),
                ctx,
                req,
                |req| async move {
                    let res = service.call(req).await?;
                    Ok::<_, Error>(res.map_into_left_body())
                },
                |req, rejection| async move {
                    let response = HttpResponse::build(rejection.status())
                        .json(ErrorResponse::from(&rejection));
                    Ok::<_, Error>(req.into_response(response).map_into_right_body())
                },
            )
            .await
            .map_err(|e| e.into_actix_error(expose_server_errors))?
        })
    }
}

// =============================================================================
// SecurityTransform
// =============================================================================

/// Middleware that authenticates each request and stores the principal in
/// the request extensions.
///
/// Without an authenticator every request is anonymous.
#[derive(Clone, Default)]
pub struct SecurityTransform {
    authenticator: Option<Arc<dyn Authenticator>>,
    expose_server_errors: bool,
}

impl SecurityTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn expose_server_errors(mut self, expose: bool) -> Self {
        self.expose_server_errors = expose;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityTransform
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SecurityService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            authenticator: self.authenticator.clone(),
            expose_server_errors: self.expose_server_errors,
            service: Rc::new(service),
        })
    }
}

pub struct SecurityService<S> {
    authenticator: Option<Arc<dyn Authenticator>>,
    expose_server_errors: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = self.authenticator.clone();
        let expose_server_errors = self.expose_server_errors;

        Box::pin(async move {
            if let Some(authenticator) = authenticator {
                let user = authenticator
                    .authenticate(req.request())
                    .await
                    .map_err(|e| e.into_actix_error(expose_server_errors))?;
                if let Some(user) = user {
                    req.extensions_mut().insert(user);
                }
            }
            service.call(req).await
        })
    }
}
