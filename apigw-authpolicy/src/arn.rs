//! execute-api ARN construction
//!
//! Every statement built through the allow/deny convenience path scopes itself
//! to a single deployment: the region, account, REST API and stage captured in
//! a [`ResourceContext`]. The context is validated once, when it is built, so
//! ARN formatting itself can never fail.

use log::trace;

use crate::error::{AuthPolicyError, AuthPolicyResult};
use crate::types::HttpVerb;

pub const EXECUTE_API_ARN_PREFIX: &str = "arn:aws:execute-api";

/// Deployment scope used to build execute-api resource ARNs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceContext {
    region: String,
    account_id: String,
    api_id: String,
    stage: String,
}

impl ResourceContext {
    /// Create a context, rejecting any empty field.
    pub fn new(
        region: impl Into<String>,
        account_id: impl Into<String>,
        api_id: impl Into<String>,
        stage: impl Into<String>,
    ) -> AuthPolicyResult<Self> {
        let context = Self {
            region: region.into(),
            account_id: account_id.into(),
            api_id: api_id.into(),
            stage: stage.into(),
        };

        for (field, value) in [
            ("region", &context.region),
            ("account_id", &context.account_id),
            ("api_id", &context.api_id),
            ("stage", &context.stage),
        ] {
            if value.is_empty() {
                return Err(AuthPolicyError::InvalidContext { field });
            }
        }

        Ok(context)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Build the ARN for `verb` on `resource_path` within this context.
    ///
    /// `"/"` and `""` both address the root resource. A single leading slash is
    /// stripped; any other path is used verbatim.
    pub fn method_arn(&self, verb: HttpVerb, resource_path: &str) -> String {
        let resource = normalize_resource_path(resource_path);
        let arn = format!(
            "{}:{}:{}:{}/{}/{}/{}",
            EXECUTE_API_ARN_PREFIX,
            self.region,
            self.account_id,
            self.api_id,
            self.stage,
            verb.arn_token(),
            resource
        );
        trace!("Built execute-api ARN {arn} for {verb} {resource_path:?}");
        arn
    }
}

fn normalize_resource_path(path: &str) -> &str {
    if path == "/" {
        return "";
    }
    path.strip_prefix('/').unwrap_or(path)
}
