//! This crate builds the policy documents an API Gateway custom authorizer
//! returns:
//! - execute-api ARN construction from a deployment context and verb/path pairs
//! - Allow/Deny statement accumulation with typed conditions
//! - Wire-exact rendering of the policy document and authorizer envelope
//! - Parsing of the incoming method ARN
//!

mod arn;
mod authorizer;
mod error;
mod parsing;
mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use arn::{ResourceContext, EXECUTE_API_ARN_PREFIX};
pub use authorizer::{AuthorizerResponse, DecisionScope};
pub use error::{AuthPolicyError, AuthPolicyResult};
pub use parsing::MethodArn;
pub use synthesis::{
    ConditionEntry, Conditions, PolicyDocument, Statement, DEFAULT_POLICY_VERSION,
    EXECUTE_API_INVOKE,
};
pub use types::{Effect, HttpVerb, Principal};
