//! Error types for authorizer policy assembly

use thiserror::Error;

/// Errors raised while building or rendering an authorizer policy.
///
/// Allow/deny operations on an already constructed document never fail; every
/// variant here is raised either at construction (context, principal), while
/// parsing external input (method ARNs, verbs, conditions), or while rendering.
#[derive(Debug, Error)]
pub enum AuthPolicyError {
    /// A resource context field was empty at construction time.
    #[error("Invalid resource context: {field} must not be empty")]
    InvalidContext { field: &'static str },

    /// The principal identifier was empty.
    #[error("Invalid principal: principal identifier must not be empty")]
    InvalidPrincipal,

    /// A method ARN did not match the execute-api layout.
    #[error("Invalid method ARN: {0}")]
    InvalidMethodArn(String),

    /// A verb token was not one of the supported HTTP verbs.
    #[error("Unknown HTTP verb: {0}")]
    UnknownHttpVerb(String),

    /// An effect token was neither `Allow` nor `Deny`.
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    /// A condition block did not hold exactly one key per operator.
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Rendering the document as JSON failed.
    #[error("Failed to serialize policy document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthPolicyError {
    pub(crate) fn method_arn(message: impl Into<String>) -> Self {
        Self::InvalidMethodArn(message.into())
    }

    pub(crate) fn condition(message: impl Into<String>) -> Self {
        Self::InvalidCondition(message.into())
    }
}

pub type AuthPolicyResult<T> = Result<T, AuthPolicyError>;
