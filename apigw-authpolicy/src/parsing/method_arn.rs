//! Parsing of the `methodArn` API Gateway passes to an authorizer

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::arn::ResourceContext;
use crate::error::{AuthPolicyError, AuthPolicyResult};
use crate::types::HttpVerb;

/// The invoked method, split into its deployment scope, verb and path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArn {
    context: ResourceContext,
    verb: HttpVerb,
    resource_path: String,
}

impl MethodArn {
    /// Parse `arn:aws:execute-api:<region>:<account>:<api>/<stage>/<verb>[/<path>]`.
    ///
    /// The resource path keeps every segment after the verb and is returned
    /// with a leading slash; a missing path is the root resource `""`.
    pub fn parse(arn: &str) -> AuthPolicyResult<Self> {
        let parts: Vec<&str> = arn.splitn(6, ':').collect();
        if parts.len() < 6 {
            return Err(AuthPolicyError::method_arn(format!(
                "expected 6 colon-separated fields in '{arn}'"
            )));
        }
        if parts[0] != "arn" || parts[1] != "aws" || parts[2] != "execute-api" {
            return Err(AuthPolicyError::method_arn(format!(
                "'{arn}' is not an aws execute-api ARN"
            )));
        }

        let region = parts[3];
        let account_id = parts[4];

        let api_parts: Vec<&str> = parts[5].splitn(4, '/').collect();
        if api_parts.len() < 3 {
            return Err(AuthPolicyError::method_arn(format!(
                "expected <api>/<stage>/<verb> in '{}'",
                parts[5]
            )));
        }

        let context = ResourceContext::new(region, account_id, api_parts[0], api_parts[1])
            .map_err(|e| AuthPolicyError::method_arn(format!("{arn}: {e}")))?;
        let verb = api_parts[2].parse::<HttpVerb>()?;
        let resource_path = match api_parts.get(3).copied().unwrap_or_default() {
            "" => String::new(),
            rest => format!("/{rest}"),
        };

        debug!(
            "Parsed method ARN: api={} stage={} verb={} path={:?}",
            context.api_id(),
            context.stage(),
            verb,
            resource_path
        );

        Ok(Self {
            context,
            verb,
            resource_path,
        })
    }

    pub fn context(&self) -> &ResourceContext {
        &self.context
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn into_context(self) -> ResourceContext {
        self.context
    }
}

impl FromStr for MethodArn {
    type Err = AuthPolicyError;

    fn from_str(s: &str) -> AuthPolicyResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MethodArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.context.method_arn(self.verb, &self.resource_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_arn_with_resource() {
        let arn = MethodArn::parse("arn:aws:execute-api:us-east-1:123456789012:abcdef123/prod/POST/gallery")
            .expect("should parse");
        assert_eq!(arn.context().region(), "us-east-1");
        assert_eq!(arn.context().account_id(), "123456789012");
        assert_eq!(arn.context().api_id(), "abcdef123");
        assert_eq!(arn.context().stage(), "prod");
        assert_eq!(arn.verb(), HttpVerb::Post);
        assert_eq!(arn.resource_path(), "/gallery");
    }

    #[test]
    fn test_parse_method_arn_keeps_nested_path() {
        let arn = MethodArn::parse(
            "arn:aws:execute-api:eu-west-1:123456789012:api/v1/GET/orders/42/items",
        )
        .unwrap();
        assert_eq!(arn.resource_path(), "/orders/42/items");
    }

    #[test]
    fn test_parse_method_arn_root_resource() {
        let with_slash =
            MethodArn::parse("arn:aws:execute-api:us-east-1:123456789012:api/prod/GET/").unwrap();
        let without_slash =
            MethodArn::parse("arn:aws:execute-api:us-east-1:123456789012:api/prod/GET").unwrap();
        assert_eq!(with_slash.resource_path(), "");
        assert_eq!(with_slash, without_slash);
        assert_eq!(
            with_slash.to_string(),
            "arn:aws:execute-api:us-east-1:123456789012:api/prod/GET/"
        );
    }

    #[test]
    fn test_parse_method_arn_wildcards() {
        let arn = MethodArn::parse("arn:aws:execute-api:us-east-1:*:123/test/*/*").unwrap();
        assert_eq!(arn.context().account_id(), "*");
        assert_eq!(arn.verb(), HttpVerb::Any);
        assert_eq!(arn.resource_path(), "/*");
    }

    #[test]
    fn test_display_round_trips_canonical_arns() {
        for raw in [
            "arn:aws:execute-api:us-east-1:123456789012:abcdef123/prod/POST/gallery",
            "arn:aws:execute-api:us-east-1:123456789012:abcdef123/prod/GET/",
            "arn:aws:execute-api:us-east-1:123456789012:abcdef123/prod/*/*",
        ] {
            assert_eq!(raw.parse::<MethodArn>().unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_parse_method_arn_invalid() {
        for raw in [
            "not-an-arn",
            "arn:aws:execute-api",
            "arn:aws:s3:::bucket/key",
            "arn:aws-cn:execute-api:cn-north-1:123456789012:api/prod/GET/",
            "arn:aws:execute-api:us-east-1:123456789012:api/prod",
            "arn:aws:execute-api::123456789012:api/prod/GET/",
        ] {
            assert!(
                matches!(MethodArn::parse(raw), Err(AuthPolicyError::InvalidMethodArn(_))),
                "expected InvalidMethodArn for {raw}"
            );
        }
    }

    #[test]
    fn test_parse_method_arn_unknown_verb() {
        let result = MethodArn::parse("arn:aws:execute-api:us-east-1:123456789012:api/prod/TRACE/x");
        assert!(matches!(result, Err(AuthPolicyError::UnknownHttpVerb(v)) if v == "TRACE"));
    }
}
