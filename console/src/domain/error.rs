use editorial_common::{EditorialStatus, FieldErrors, PublicationId};

// User-facing messages

pub const PUBLICATIONS_UNREACHABLE: &str = "Could not connect to the publications service";
pub const PUBLICATION_NOT_FOUND: &str = "Publication not found";
pub const PUBLICATION_NOT_LOADED: &str = "Publication is not loaded, refresh the list first";
pub const TRANSITION_FAILED: &str = "Could not change the editorial status";
pub const AUTHORS_UNREACHABLE: &str = "Could not connect to the authors service";
pub const AUTHOR_NOT_FOUND: &str = "Could not load the author's details";
pub const SERVER_UNREACHABLE: &str = "Could not connect to the server";
pub const UNEXPECTED_ERROR: &str = "Unexpected error";
pub const REVIEW_FIELDS: &str = "Please review the highlighted fields";

/// Outcome of a failed call to one of the remote services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("resource not found")]
    NotFound,
    #[error("request rejected: {} invalid field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("service error: {0}")]
    Service(String),
    #[error("service unreachable: {0}")]
    Transport(String),
}

/// Why a creation form was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// Per-field messages, from local validation or from the service
    Fields(FieldErrors),
    /// A single message for the whole form
    General(String),
    Unreachable,
}

impl SubmitFailure {
    pub fn message(&self) -> &str {
        match self {
            SubmitFailure::Fields(_) => REVIEW_FIELDS,
            SubmitFailure::General(message) => message,
            SubmitFailure::Unreachable => SERVER_UNREACHABLE,
        }
    }
}

impl From<RemoteError> for SubmitFailure {
    fn from(value: RemoteError) -> Self {
        match value {
            RemoteError::Validation(fields) => SubmitFailure::Fields(fields),
            RemoteError::Service(message) => SubmitFailure::General(message),
            RemoteError::NotFound => SubmitFailure::General(UNEXPECTED_ERROR.to_string()),
            RemoteError::Transport(_) => SubmitFailure::Unreachable,
        }
    }
}

/// Conditions raised by the controllers. Each one is scoped to the operation
/// that failed and leaves previously loaded state in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    FetchFailed(String),
    #[error("{0}")]
    LookupFailed(String),
    #[error("{0}")]
    TransitionFailed(String),
    #[error("a status change for publication {0} is already in progress")]
    TransitionPending(PublicationId),
    #[error("a publication cannot move from {from} to {to}")]
    TransitionNotAllowed {
        from: EditorialStatus,
        to: EditorialStatus,
    },
    #[error("{}", .0.message())]
    ValidationFailed(SubmitFailure),
}

impl WorkflowError {
    pub(crate) fn transition_failed(cause: &RemoteError) -> Self {
        match cause {
            RemoteError::Service(message) => {
                WorkflowError::TransitionFailed(format!("{TRANSITION_FAILED}: {message}"))
            }
            _ => WorkflowError::TransitionFailed(TRANSITION_FAILED.to_string()),
        }
    }
}
