//! The `Requirement` abstraction.
//!
//! A requirement is an asynchronous predicate over an [`AccessContext`]. It
//! resolves to [`Outcome::Granted`] or [`Outcome::Denied`]; denial is a value,
//! not an error. `Err(AccessError)` is reserved for failures of the
//! collaborators a requirement depends on.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::http::error::{AccessError, Rejection};
use crate::http::security::context::AccessContext;

/// Result of evaluating a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Granted,
    Denied(Rejection),
}

impl Outcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Outcome::Granted)
    }

    /// Grants when `condition` holds, otherwise denies with `rejection`.
    pub fn grant_if(condition: bool, rejection: impl FnOnce() -> Rejection) -> Self {
        if condition {
            Outcome::Granted
        } else {
            Outcome::Denied(rejection())
        }
    }

    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Outcome::Granted => Ok(()),
            Outcome::Denied(rejection) => Err(rejection),
        }
    }
}

impl From<Rejection> for Outcome {
    fn from(rejection: Rejection) -> Self {
        Outcome::Denied(rejection)
    }
}

/// An access check evaluated against a request.
///
/// Requirements are built once and shared across routes and workers, so they
/// must be `Send + Sync`; the futures they return are `?Send` because they
/// borrow the request.
#[async_trait(?Send)]
pub trait Requirement: Send + Sync {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError>;

    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A shareable, type-erased requirement.
pub type SharedRequirement = Arc<dyn Requirement>;

#[async_trait(?Send)]
impl<R: Requirement + ?Sized> Requirement for Arc<R> {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        (**self).check(ctx).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Requirement backed by a closure. See [`requirement_fn`].
pub struct FnRequirement<F> {
    name: &'static str,
    f: F,
}

/// Builds a requirement from an async closure.
///
/// The closure receives its own handle on the context, so the returned
/// future does not borrow from the caller.
///
/// # Example
/// ```ignore
/// let requires_eua = requirement_fn("requires_eua", |ctx| async move {
///     Ok(Outcome::grant_if(ctx.header("x-eua").is_some(), || {
///         Rejection::new(StatusCode::FORBIDDEN, "eua", "User must accept end user agreement.")
///     }))
/// });
/// ```
pub fn requirement_fn<F, Fut>(name: &'static str, f: F) -> FnRequirement<F>
where
    F: Fn(AccessContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Outcome, AccessError>> + 'static,
{
    FnRequirement { name, f }
}

#[async_trait(?Send)]
impl<F, Fut> Requirement for FnRequirement<F>
where
    F: Fn(AccessContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Outcome, AccessError>> + 'static,
{
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        (self.f)(ctx.clone()).await
    }

    fn name(&self) -> &str {
        self.name
    }
}
