//! Command-line renderer for API Gateway authorizer policies

mod args;

use std::io::Read;

use anyhow::{Context, Result};
use apigw_authpolicy::{
    AuthorizerResponse, DecisionScope, Effect, HttpVerb, MethodArn, PolicyDocument, Principal,
    ResourceContext, Statement,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};

use crate::args::{parse_condition, parse_method_rule, ConditionArg, MethodRule};

#[derive(Parser, Debug)]
#[command(
    name = "apigw-authpolicy",
    version,
    about = "Render API Gateway custom authorizer responses as JSON"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a response from explicit allow/deny rules
    Render(RenderArgs),
    /// Build a response for the method an authorizer request was made for
    FromMethodArn(FromMethodArnArgs),
}

#[derive(Args, Debug)]
struct ContextArgs {
    /// Region hosting the REST API
    #[arg(long, env = "AUTHPOLICY_REGION")]
    region: String,

    /// Account owning the REST API
    #[arg(long, env = "AUTHPOLICY_ACCOUNT_ID")]
    account_id: String,

    /// REST API identifier
    #[arg(long, env = "AUTHPOLICY_API_ID")]
    api_id: String,

    /// Deployment stage
    #[arg(long, env = "AUTHPOLICY_STAGE")]
    stage: String,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// Principal the decision is rendered for
    #[arg(long, env = "AUTHPOLICY_PRINCIPAL")]
    principal: String,

    /// Allow a method, as VERB:PATH (repeatable)
    #[arg(long = "allow", value_name = "VERB:PATH", value_parser = parse_method_rule)]
    allow: Vec<MethodRule>,

    /// Deny a method, as VERB:PATH (repeatable)
    #[arg(long = "deny", value_name = "VERB:PATH", value_parser = parse_method_rule)]
    deny: Vec<MethodRule>,

    /// Allow every verb on every resource of the stage
    #[arg(long)]
    allow_all: bool,

    /// Deny every verb on every resource of the stage
    #[arg(long)]
    deny_all: bool,

    /// Condition on the Allow statement, as OPERATOR:KEY=VALUE (repeatable)
    #[arg(long = "condition", value_name = "OPERATOR:KEY=VALUE", value_parser = parse_condition)]
    conditions: Vec<ConditionArg>,

    /// Extra statement as a JSON object (repeatable)
    #[arg(long = "statement", value_name = "JSON")]
    statements: Vec<String>,

    /// Override the policy language version
    #[arg(long)]
    policy_version: Option<String>,
}

#[derive(Args, Debug)]
struct FromMethodArnArgs {
    /// Method ARN from the authorizer request; read from stdin when omitted
    #[arg(long, env = "AUTHPOLICY_METHOD_ARN")]
    method_arn: Option<String>,

    /// Principal the decision is rendered for
    #[arg(long, env = "AUTHPOLICY_PRINCIPAL")]
    principal: String,

    /// Effect of the decision
    #[arg(long, default_value = "allow")]
    effect: Effect,

    /// Cover every method in the stage or only the invoked method
    #[arg(long, value_enum, default_value_t = ScopeArg::All)]
    scope: ScopeArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ScopeArg {
    /// Every verb and resource in the stage
    #[value(alias = "stage")]
    All,
    /// Only the verb and resource that were invoked
    Method,
}

impl From<ScopeArg> for DecisionScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::All => DecisionScope::Stage,
            ScopeArg::Method => DecisionScope::Method,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(cli: &Cli) -> Result<String> {
    let response = match &cli.command {
        Commands::Render(args) => render(args)?,
        Commands::FromMethodArn(args) => from_method_arn(args)?,
    };

    let output = if cli.pretty {
        response.to_json_pretty()
    } else {
        response.to_json()
    };
    output.context("Failed to serialize authorizer response")
}

fn render(args: &RenderArgs) -> Result<AuthorizerResponse> {
    let context = ResourceContext::new(
        &args.context.region,
        &args.context.account_id,
        &args.context.api_id,
        &args.context.stage,
    )
    .context("Invalid resource context")?;
    let principal = Principal::new(&args.principal).context("Invalid principal")?;

    let mut document = PolicyDocument::new(context);
    if let Some(version) = &args.policy_version {
        document.set_version(version);
    }
    if args.allow_all {
        document.allow_method(HttpVerb::Any, "*");
    }
    if args.deny_all {
        document.deny_method(HttpVerb::Any, "*");
    }
    for rule in &args.allow {
        document.allow_method(rule.verb, &rule.path);
    }
    for rule in &args.deny {
        document.deny_method(rule.verb, &rule.path);
    }
    for condition in &args.conditions {
        document.allow_statement_mut().add_condition(
            condition.operator.as_str(),
            condition.key.as_str(),
            condition.value.clone(),
        );
    }
    for raw in &args.statements {
        let statement: Statement = serde_json::from_str(raw)
            .with_context(|| format!("Invalid statement JSON: {raw}"))?;
        document.add_statement(statement);
    }

    if document.statements().all(|s| s.resources().is_empty()) {
        warn!("No allow or deny rules given; the policy grants nothing");
    }
    info!(
        "Rendered policy for {} with {} statement(s)",
        principal,
        document.statements().count()
    );

    Ok(AuthorizerResponse::new(principal, document))
}

fn from_method_arn(args: &FromMethodArnArgs) -> Result<AuthorizerResponse> {
    let raw_arn = match &args.method_arn {
        Some(arn) => arn.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read method ARN from stdin")?;
            buffer
        }
    };

    let method_arn = MethodArn::parse(raw_arn.trim()).context("Invalid method ARN")?;
    let principal = Principal::new(&args.principal).context("Invalid principal")?;

    Ok(AuthorizerResponse::for_method_arn(
        principal,
        &method_arn,
        args.effect,
        args.scope.into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scope_conversion() {
        assert_eq!(DecisionScope::from(ScopeArg::All), DecisionScope::Stage);
        assert_eq!(DecisionScope::from(ScopeArg::Method), DecisionScope::Method);
    }

    #[test]
    fn test_scope_defaults_to_all_and_accepts_stage_alias() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["apigw-authpolicy", "from-method-arn", "--principal", "p"];
            argv.extend_from_slice(extra);
            match Cli::try_parse_from(argv).unwrap().command {
                Commands::FromMethodArn(args) => args.scope,
                other => panic!("Expected from-method-arn, got {other:?}"),
            }
        };
        assert_eq!(parse(&[]), ScopeArg::All);
        assert_eq!(parse(&["--scope", "all"]), ScopeArg::All);
        assert_eq!(parse(&["--scope", "stage"]), ScopeArg::All);
        assert_eq!(parse(&["--scope", "method"]), ScopeArg::Method);
    }
}
