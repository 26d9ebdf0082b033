//! Value parsers for rule and condition flags

use apigw_authpolicy::HttpVerb;
use serde_json::Value;

/// `VERB:PATH`, e.g. `GET:/pets/{id}` or `ANY:*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRule {
    pub verb: HttpVerb,
    pub path: String,
}

/// `OPERATOR:KEY=VALUE`, e.g. `StringEquals:aws:Referer=abc`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionArg {
    pub operator: String,
    pub key: String,
    pub value: Value,
}

pub fn parse_method_rule(raw: &str) -> Result<MethodRule, String> {
    let (verb, path) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected VERB:PATH, got '{raw}'"))?;
    let verb = verb.parse::<HttpVerb>().map_err(|e| e.to_string())?;
    Ok(MethodRule {
        verb,
        path: path.to_string(),
    })
}

/// The value is read as JSON when it parses as JSON, otherwise as a plain string.
pub fn parse_condition(raw: &str) -> Result<ConditionArg, String> {
    let (operator, rest) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected OPERATOR:KEY=VALUE, got '{raw}'"))?;
    let (key, value) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected OPERATOR:KEY=VALUE, got '{raw}'"))?;
    if operator.is_empty() || key.is_empty() {
        return Err(format!("operator and key must not be empty in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok(ConditionArg {
        operator: operator.to_string(),
        key: key.to_string(),
        value,
    })
}
