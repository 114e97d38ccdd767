//! Run one Salesforce MCP tool from the command line.
//!
//! ```sh
//! export SF_INSTANCE_URL='https://acme.my.salesforce.com'
//! export SF_ACCESS_TOKEN='00D...'
//! sfmcp describe_object '{"object_name": "Account"}'
//! sfmcp create_object_with_fields @invoice.json
//! ```

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use salesforce_mcp::auth::SalesforceCredentials;
use salesforce_mcp::metadata::{MetadataPipeline, PipelineConfig};
use salesforce_mcp::rest::SalesforceRestClient;
use salesforce_mcp::{Error, ErrorKind, Result, SalesforceTools, TOOL_NAMES};

/// Run one Salesforce MCP tool and print its text result.
///
/// Credentials come from SF_INSTANCE_URL / SF_ACCESS_TOKEN / SF_API_VERSION,
/// pipeline settings from SFMCP_WORK_DIR, SFMCP_TEMPLATE_DIR,
/// SFMCP_DEPLOY_TIMEOUT_SECS and SFMCP_STRICT_TEMPLATES.
#[derive(Parser)]
#[command(name = "sfmcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Tool name.
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(TOOL_NAMES.iter().copied()))]
    tool: String,

    /// Tool arguments as a JSON object, or `@path` to read them from a file.
    arguments: String,

    /// Enable debug logging to stderr (RUST_LOG still applies).
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<String> {
    let arguments = parse_arguments(&args.arguments)?;

    let session = SalesforceRestClient::new(SalesforceCredentials::from_env()?)?;
    let pipeline = MetadataPipeline::new(PipelineConfig::from_env()?)?;
    SalesforceTools::new(session, pipeline)
        .call(&args.tool, &arguments)
        .await
}

fn parse_arguments(raw: &str) -> Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => raw.to_string(),
    };
    let value: Value = serde_json::from_str(&text)?;
    if !value.is_object() {
        return Err(Error::new(ErrorKind::InvalidArguments(
            "tool arguments must be a JSON object".to_string(),
        )));
    }
    Ok(value)
}
