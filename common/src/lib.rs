mod domain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// User-facing validation messages

pub const REQUIRED_FIELD_MESSAGE: &str = "Required field";
pub const SELECT_AUTHOR_MESSAGE: &str = "Select an author";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

// expose domain module

pub use domain::*;
