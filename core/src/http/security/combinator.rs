//! AND / OR composition of requirements.
//!
//! Both combinators evaluate their requirements one at a time, in order.
//! Requirements may have side effects (auto-login) and later ones may rely
//! on what earlier ones established, so nothing is evaluated concurrently.

use std::fmt;

use async_trait::async_trait;

use crate::http::error::AccessError;
use crate::http::security::context::AccessContext;
use crate::http::security::requirement::{Outcome, Requirement, SharedRequirement};

/// How a [`Combinator`] folds the outcomes of its requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every requirement must grant; the first denial is returned.
    All,
    /// One requirement must grant; if none does, the last denial is returned.
    Any,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::All => write!(f, "ALL"),
            Mode::Any => write!(f, "ANY"),
        }
    }
}

/// A requirement built from an ordered list of requirements.
#[derive(Clone)]
pub struct Combinator {
    mode: Mode,
    requirements: Vec<SharedRequirement>,
}

/// AND composition. An empty list grants.
pub fn requires_all(requirements: Vec<SharedRequirement>) -> Combinator {
    Combinator::new(Mode::All, requirements)
}

/// OR composition. An empty list grants.
pub fn requires_any(requirements: Vec<SharedRequirement>) -> Combinator {
    Combinator::new(Mode::Any, requirements)
}

impl Combinator {
    pub fn new(mode: Mode, requirements: Vec<SharedRequirement>) -> Self {
        Combinator { mode, requirements }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn requirements(&self) -> &[SharedRequirement] {
        &self.requirements
    }

    async fn check_all(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        for requirement in &self.requirements {
            if let Outcome::Denied(rejection) = requirement.check(ctx).await? {
                tracing::debug!(
                    requirement = requirement.name(),
                    kind = rejection.kind(),
                    "requirement denied"
                );
                return Ok(Outcome::Denied(rejection));
            }
        }
        Ok(Outcome::Granted)
    }

    async fn check_any(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        let mut last_denial = None;

        for requirement in &self.requirements {
            match requirement.check(ctx).await? {
                Outcome::Granted => return Ok(Outcome::Granted),
                Outcome::Denied(rejection) => last_denial = Some(rejection),
            }
        }

        // Last denial wins, not the first.
        Ok(last_denial.map_or(Outcome::Granted, Outcome::Denied))
    }
}

#[async_trait(?Send)]
impl Requirement for Combinator {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        match self.mode {
            Mode::All => self.check_all(ctx).await,
            Mode::Any => self.check_any(ctx).await,
        }
    }

    fn name(&self) -> &str {
        match self.mode {
            Mode::All => "requires_all",
            Mode::Any => "requires_any",
        }
    }
}
