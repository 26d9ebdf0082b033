//! Core value types shared by the statement and document builders

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AuthPolicyError, AuthPolicyResult};

/// HTTP verbs an execute-api resource can be scoped to.
///
/// `Any` matches every verb and renders as the `*` wildcard inside an ARN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Any,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 8] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
        Self::Any,
    ];

    /// Upper-case verb name (`ANY` for the wildcard variant)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Any => "ANY",
        }
    }

    /// Token used in the method segment of an execute-api ARN
    pub fn arn_token(&self) -> &'static str {
        match self {
            Self::Any => "*",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = AuthPolicyError;

    fn from_str(s: &str) -> AuthPolicyResult<Self> {
        if s == "*" {
            return Ok(Self::Any);
        }
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AuthPolicyError::UnknownHttpVerb(s.to_string()))
    }
}

/// Statement effect. Only the two IAM effects are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = AuthPolicyError;

    fn from_str(s: &str) -> AuthPolicyResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(AuthPolicyError::UnknownEffect(s.to_string())),
        }
    }
}

/// Identity the authorizer decision is rendered for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> AuthPolicyResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthPolicyError::InvalidPrincipal);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
