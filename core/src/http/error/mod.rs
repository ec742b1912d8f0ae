//! Error types shared by the security layer and the account services.
//!
//! A [`Rejection`] is an expected access decision and is rendered with its
//! own status. An [`AccessError`] is a system failure and always ends up as a
//! generic server error.

mod access_error;
mod rejection;
mod response;

pub use access_error::AccessError;
pub use rejection::Rejection;
pub use response::{handle_error_response, ErrorResponse, ErrorResult};
