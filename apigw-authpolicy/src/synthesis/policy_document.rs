//! Policy document assembly
//!
//! A [`PolicyDocument`] always carries one Allow and one Deny `execute-api:Invoke`
//! statement, even when they hold no resources, followed by any statements the
//! caller added directly. Rendering never touches stored state, so a document
//! serializes to the same output however many times it is rendered.

use log::{debug, trace};
use serde::{Serialize, Serializer};

use super::statement::Statement;
use crate::arn::ResourceContext;
use crate::error::AuthPolicyResult;
use crate::types::{Effect, HttpVerb};

pub const DEFAULT_POLICY_VERSION: &str = "2012-10-17";

/// Allow/deny rules for one API deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    version: String,
    context: ResourceContext,
    allow_statement: Statement,
    deny_statement: Statement,
    statements: Vec<Statement>,
}

/// Wire layout of a policy document
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireDocument<'a> {
    version: &'a str,
    statement: Vec<&'a Statement>,
}

impl PolicyDocument {
    pub fn new(context: ResourceContext) -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            context,
            allow_statement: Statement::empty_invoke(Effect::Allow),
            deny_statement: Statement::empty_invoke(Effect::Deny),
            statements: Vec::new(),
        }
    }

    /// Document allowing every verb on every resource of the stage
    pub fn allow_all(context: ResourceContext) -> Self {
        Self::allow_one(context, HttpVerb::Any, "*")
    }

    /// Document denying every verb on every resource of the stage
    pub fn deny_all(context: ResourceContext) -> Self {
        Self::deny_one(context, HttpVerb::Any, "*")
    }

    /// Document allowing a single verb/path pair
    pub fn allow_one(context: ResourceContext, verb: HttpVerb, resource_path: &str) -> Self {
        let mut document = Self::new(context);
        document.allow_method(verb, resource_path);
        document
    }

    /// Document denying a single verb/path pair
    pub fn deny_one(context: ResourceContext, verb: HttpVerb, resource_path: &str) -> Self {
        let mut document = Self::new(context);
        document.deny_method(verb, resource_path);
        document
    }

    pub fn allow_method(&mut self, verb: HttpVerb, resource_path: &str) {
        let arn = self.context.method_arn(verb, resource_path);
        debug!("Allowing {verb} {resource_path:?} as {arn}");
        self.allow_statement.add_resource(arn);
    }

    pub fn deny_method(&mut self, verb: HttpVerb, resource_path: &str) {
        let arn = self.context.method_arn(verb, resource_path);
        debug!("Denying {verb} {resource_path:?} as {arn}");
        self.deny_statement.add_resource(arn);
    }

    /// Append a caller-built statement after the Allow and Deny statements
    pub fn add_statement(&mut self, statement: Statement) {
        debug!(
            "Adding {} statement for {} with {} resource(s)",
            statement.effect(),
            statement.action(),
            statement.resources().len()
        );
        self.statements.push(statement);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.set_version(version);
        self
    }

    pub fn context(&self) -> &ResourceContext {
        &self.context
    }

    pub fn allow_statement(&self) -> &Statement {
        &self.allow_statement
    }

    /// Mutable access for attaching conditions to the Allow statement
    pub fn allow_statement_mut(&mut self) -> &mut Statement {
        &mut self.allow_statement
    }

    pub fn deny_statement(&self) -> &Statement {
        &self.deny_statement
    }

    pub fn deny_statement_mut(&mut self) -> &mut Statement {
        &mut self.deny_statement
    }

    pub fn extra_statements(&self) -> &[Statement] {
        &self.statements
    }

    /// All statements in wire order: Allow, Deny, then the added statements
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        [&self.allow_statement, &self.deny_statement]
            .into_iter()
            .chain(self.statements.iter())
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

    fn wire(&self) -> WireDocument<'_> {
        WireDocument {
            version: &self.version,
            statement: self.statements().collect(),
        }
    }
}

impl Serialize for PolicyDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        trace!(
            "Rendering policy document with {} statement(s)",
            self.statements.len() + 2
        );
        self.wire().serialize(serializer)
    }
}
