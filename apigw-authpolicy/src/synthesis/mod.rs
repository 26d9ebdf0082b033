//! Policy synthesis (deterministic JSON generation)

pub mod condition;
pub mod policy_document;
pub mod statement;

pub use condition::{ConditionEntry, Conditions};
pub use policy_document::{PolicyDocument, DEFAULT_POLICY_VERSION};
pub use statement::{Statement, EXECUTE_API_INVOKE};
