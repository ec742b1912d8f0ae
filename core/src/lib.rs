//! # Actix Access Core
//!
//! Composable, asynchronous authorization requirements for Actix Web,
//! together with the account services that sit behind them.
//!
//! - [`http::security`] - Requirements, combinators, access profiles and middleware
//! - [`http::error`] - Rejections, server errors and error responses
//! - [`account`] - Paging, preferences, messages and user notifications

pub mod account;
pub mod http;
