//! Authorizer responses
//!
//! API Gateway expects a Lambda authorizer to answer with the caller's
//! principal id next to the policy document. The envelope keys are camelCase
//! while the document inside keeps its capitalized IAM field names.

use log::debug;
use serde::Serialize;

use crate::error::AuthPolicyResult;
use crate::parsing::MethodArn;
use crate::synthesis::PolicyDocument;
use crate::types::{Effect, Principal};

/// How much of the API a decision derived from a method ARN covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionScope {
    /// Every verb and resource of the invoked stage
    #[default]
    Stage,
    /// Only the invoked verb and resource
    Method,
}

/// `{ "principalId": ..., "policyDocument": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    principal_id: Principal,
    policy_document: PolicyDocument,
}

impl AuthorizerResponse {
    pub fn new(principal_id: Principal, policy_document: PolicyDocument) -> Self {
        Self {
            principal_id,
            policy_document,
        }
    }

    /// Build a single-effect decision for the method being invoked.
    pub fn for_method_arn(
        principal_id: Principal,
        method_arn: &MethodArn,
        effect: Effect,
        scope: DecisionScope,
    ) -> Self {
        let context = method_arn.context().clone();
        let policy_document = match (effect, scope) {
            (Effect::Allow, DecisionScope::Stage) => PolicyDocument::allow_all(context),
            (Effect::Deny, DecisionScope::Stage) => PolicyDocument::deny_all(context),
            (Effect::Allow, DecisionScope::Method) => {
                PolicyDocument::allow_one(context, method_arn.verb(), method_arn.resource_path())
            }
            (Effect::Deny, DecisionScope::Method) => {
                PolicyDocument::deny_one(context, method_arn.verb(), method_arn.resource_path())
            }
        };
        debug!("{effect} decision ({scope:?}) for principal {principal_id} on {method_arn}");
        Self::new(principal_id, policy_document)
    }

    pub fn principal_id(&self) -> &Principal {
        &self.principal_id
    }

    pub fn policy_document(&self) -> &PolicyDocument {
        &self.policy_document
    }

    pub fn policy_document_mut(&mut self) -> &mut PolicyDocument {
        &mut self.policy_document
    }

    pub fn to_value(&self) -> AuthPolicyResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> AuthPolicyResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> AuthPolicyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arn::ResourceContext;
    use crate::types::HttpVerb;
    use serde_json::json;

    const METHOD_ARN: &str = "arn:aws:execute-api:us-east-1:*:123/test/POST/gallery";

    fn principal() -> Principal {
        Principal::new("test@test.com").unwrap()
    }

    #[test]
    fn test_envelope_keys_are_camel_case() {
        let context = ResourceContext::new("us-east-1", "123456789012", "abcdef123", "prod").unwrap();
        let response = AuthorizerResponse::new(principal(), PolicyDocument::deny_all(context));
        let value = response.to_value().unwrap();

        assert_eq!(value["principalId"], "test@test.com");
        assert_eq!(value["policyDocument"]["Version"], "2012-10-17");
        assert_eq!(value["policyDocument"]["Statement"][1]["Effect"], "Deny");
    }

    #[test]
    fn test_stage_scope_allows_everything_in_stage() {
        let method_arn = MethodArn::parse(METHOD_ARN).unwrap();
        let response =
            AuthorizerResponse::for_method_arn(principal(), &method_arn, Effect::Allow, DecisionScope::Stage);

        let expected = AuthorizerResponse::new(
            principal(),
            PolicyDocument::allow_all(ResourceContext::new("us-east-1", "*", "123", "test").unwrap()),
        );
        assert_eq!(response, expected);
        assert_eq!(
            response.to_value().unwrap()["policyDocument"]["Statement"][0]["Resource"][0],
            "arn:aws:execute-api:us-east-1:*:123/test/*/*"
        );
    }

    #[test]
    fn test_method_scope_targets_invoked_method() {
        let method_arn = MethodArn::parse(METHOD_ARN).unwrap();
        let response =
            AuthorizerResponse::for_method_arn(principal(), &method_arn, Effect::Deny, DecisionScope::Method);

        let document = response.policy_document();
        assert!(document.allow_statement().resources().is_empty());
        assert_eq!(document.deny_statement().resources(), [METHOD_ARN]);
    }

    #[test]
    fn test_document_can_be_extended_after_construction() {
        let method_arn = MethodArn::parse(METHOD_ARN).unwrap();
        let mut response = AuthorizerResponse::for_method_arn(
            principal(),
            &method_arn,
            Effect::Allow,
            DecisionScope::Method,
        );
        response
            .policy_document_mut()
            .deny_method(HttpVerb::Delete, "/gallery");

        assert_eq!(
            response.to_value().unwrap()["policyDocument"]["Statement"][1]["Resource"],
            json!(["arn:aws:execute-api:us-east-1:*:123/test/DELETE/gallery"])
        );
    }
}
