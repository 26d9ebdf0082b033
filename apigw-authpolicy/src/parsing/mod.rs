//! Parsing of authorizer request inputs

pub mod method_arn;

pub use method_arn::MethodArn;
