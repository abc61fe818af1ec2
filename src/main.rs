use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::error::Error as ClapError;

mod client;
mod cmd;
mod config;
mod error;
mod utils;

use cmd::Commands;
use cmd::format::{print_json, report_error};
use config::{GlobalFlags, GlobalOptions};

/// composio-cli - thin command-line front end for the Composio platform
///
/// Commands:
///   composio-cli toolkits    [--slug S | --category C --managed-by M --sort-by O --cursor X --limit N]
///   composio-cli schema      <TOOL> [--full]
///   composio-cli connections --user U [--toolkits a,b] [--statuses ACTIVE,..] [--auth-config-ids ..] [--full]
///   composio-cli tools       --user U (--toolkits a,b | --tools T1,T2 | --search Q | --tags t | --auth-config-ids ..) | --all
///   composio-cli auth-url    --user U --toolkit T [--auth-config-id ID] [--force]
///   composio-cli execute     <TOOL> --user U [--args JSON | --args-file PATH] [--version V]
///
/// Global flags / env:
///   --api-key            API key (or COMPOSIO_API_KEY env)
///   --toolkit-versions   JSON map of toolkit -> version pins
///   --raw                Compact single-line JSON output
///   --base-url           Platform endpoint (or COMPOSIO_BASE_URL env)
///   -v / -vv / -q        Log verbosity (stderr)
///
/// Output is JSON on stdout. Errors print `Error: <message>` on stderr and
/// exit with status 1.
#[derive(Parser, Debug)]
#[command(
    name = "composio-cli",
    version,
    author,
    about = "composio-cli - list toolkits and tools, authorize users, execute tools",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API key (falls back to COMPOSIO_API_KEY)
    #[arg(long = "api-key", global = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Toolkit version pins as JSON, e.g. '{"github":"20250909_00"}'
    #[arg(long = "toolkit-versions", global = true, value_name = "JSON")]
    toolkit_versions: Option<String>,

    /// Compact single-line JSON output
    #[arg(long, global = true)]
    raw: bool,

    /// Platform base URL (falls back to COMPOSIO_BASE_URL)
    #[arg(long = "base-url", global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            api_key: self.api_key.clone(),
            toolkit_versions: self.toolkit_versions.clone(),
            raw: self.raw,
            base_url: self.base_url.clone(),
        }
    }
}

/// Split clap's rendered usage error into the message line and the usage
/// text that follows it.
fn usage_error(err: &ClapError) -> (String, Option<String>) {
    let rendered = err.render().to_string();
    let mut lines = rendered.trim().lines();
    let first = lines.next().unwrap_or_default();
    let message = first.strip_prefix("error: ").unwrap_or(first).to_string();
    let rest = lines.collect::<Vec<_>>().join("\n");
    let rest = rest.trim();
    (message, (!rest.is_empty()).then(|| rest.to_string()))
}

async fn run(globals: GlobalOptions, command: Commands) -> Result<()> {
    let client = globals.build_client()?;
    tracing::debug!(command = command.name(), base_url = %client.base_url(), "dispatching");
    let payload = command.run(&client, &globals).await?;
    print_json(&payload, globals.raw)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help / --version print to stdout and exit 0.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let (message, usage) = usage_error(&e);
            report_error(&message, usage.as_deref());
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let hint = cli.command.hint();
    let outcome = match GlobalOptions::resolve(cli.global_flags()) {
        Ok(globals) => run(globals, cli.command).await,
        Err(e) => Err(e.into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            report_error(&e.to_string(), hint);
            ExitCode::FAILURE
        }
    }
}
