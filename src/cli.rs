use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use reqwest::Url;

use crate::auth::ApiKey;
use crate::client::DEFAULT_API_ROOT;
use crate::printers::PrintOptions;
use crate::resources::ResourceKind;

/// A command-line client for the Postman API
///
/// Examples:
///   # Describe a collection
///   postmanctl describe collection 1234-abcd
///
///   # Describe several environments at once
///   postmanctl describe env 1234-e1 1234-e2
///
///   # Describe versions of an API: the API id comes first
///   postmanctl describe api-versions my-api v1 v2
///
///   # Describe an API schema
///   postmanctl describe schema my-api v1 schema-id
#[derive(Parser, Debug)]
#[command(name = "postmanctl", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Postman API key
    #[arg(
        long = "api-key",
        env = "POSTMAN_API_KEY",
        hide_env_values = true,
        global = true,
        value_parser = parse_api_key
    )]
    pub api_key: Option<ApiKey>,

    /// Base URL of the Postman API
    #[arg(
        long = "api-root",
        env = "POSTMAN_API_ROOT",
        default_value = DEFAULT_API_ROOT,
        global = true,
        value_parser = parse_url
    )]
    pub api_root: String,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long = "timeout", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe one or more resources in detail
    #[command(subcommand)]
    Describe(DescribeCommand),
}

#[derive(Subcommand, Debug)]
pub enum DescribeCommand {
    /// Describe collections, including every folder, request and script
    #[command(aliases = ["collection", "co"])]
    Collections(IdArgs),

    /// Describe environments
    #[command(aliases = ["environment", "env"])]
    Environments(IdArgs),

    /// Describe mock servers
    #[command(alias = "mock")]
    Mocks(IdArgs),

    /// Describe monitors
    #[command(aliases = ["monitor", "mon"])]
    Monitors(IdArgs),

    /// Describe APIs
    #[command(alias = "api")]
    Apis(IdArgs),

    /// Describe API versions: API_ID VERSION_ID...
    #[command(name = "api-versions", alias = "api-version")]
    ApiVersions(IdArgs),

    /// Describe workspaces
    #[command(aliases = ["workspace", "ws"])]
    Workspaces(IdArgs),

    /// Describe the user the API key belongs to
    User(PrintArgs),

    /// Describe an API schema: API_ID VERSION_ID SCHEMA_ID
    Schema(IdArgs),
}

impl DescribeCommand {
    pub fn kind(&self) -> ResourceKind {
        match self {
            DescribeCommand::Collections(_) => ResourceKind::Collection,
            DescribeCommand::Environments(_) => ResourceKind::Environment,
            DescribeCommand::Mocks(_) => ResourceKind::Mock,
            DescribeCommand::Monitors(_) => ResourceKind::Monitor,
            DescribeCommand::Apis(_) => ResourceKind::Api,
            DescribeCommand::ApiVersions(_) => ResourceKind::ApiVersion,
            DescribeCommand::Workspaces(_) => ResourceKind::Workspace,
            DescribeCommand::User(_) => ResourceKind::User,
            DescribeCommand::Schema(_) => ResourceKind::Schema,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            DescribeCommand::Collections(args)
            | DescribeCommand::Environments(args)
            | DescribeCommand::Mocks(args)
            | DescribeCommand::Monitors(args)
            | DescribeCommand::Apis(args)
            | DescribeCommand::ApiVersions(args)
            | DescribeCommand::Workspaces(args)
            | DescribeCommand::Schema(args) => &args.ids,
            DescribeCommand::User(_) => &[],
        }
    }

    pub fn print_options(&self) -> PrintOptions {
        let print = match self {
            DescribeCommand::Collections(args)
            | DescribeCommand::Environments(args)
            | DescribeCommand::Mocks(args)
            | DescribeCommand::Monitors(args)
            | DescribeCommand::Apis(args)
            | DescribeCommand::ApiVersions(args)
            | DescribeCommand::Workspaces(args)
            | DescribeCommand::Schema(args) => &args.print,
            DescribeCommand::User(print) => print,
        };
        PrintOptions {
            no_headers: print.no_headers,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Resource ids
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub print: PrintArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PrintArgs {
    /// Omit the header row of table output
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

// ============================================================================
// Parse Function
// ============================================================================

fn parse_url(s: &str) -> Result<String> {
    let url: Url = s.parse()?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("not a base URL: {}", s));
    }
    Ok(s.into())
}

fn parse_api_key(s: &str) -> Result<ApiKey> {
    s.parse()
}

// ============================================================================
// Tests
// ============================================================================
