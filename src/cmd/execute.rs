/*!
`execute.rs`

Implements the `execute` subcommand: run one tool for a user.

Arguments come from exactly one of:
  --args '<json>'          inline JSON
  --args-file <path>       JSON file (or YAML when the name ends in .yaml/.yml)

Version resolution (before anything is sent):
  --version                     -> used as-is
  --toolkit-versions pin        -> the tool's toolkit entry (fetches the tool
                                   definition to learn its toolkit)
  otherwise                     -> "latest", refused unless
                                   --dangerously-skip-version-check

JSON Success Output: the platform's execution response, unmodified
{
  "successful": true,
  "data": { ... },
  "error": null
}
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::client::{ComposioApi, ExecuteRequest, LATEST_VERSION, ToolkitVersions};
use crate::cmd::shared::{load_args_file, parse_inline_args};
use crate::error::CliError;

/// Printed under any execute failure.
pub const EXECUTE_HINT: &str =
    "Hint: run `composio-cli schema <TOOL>` to check the tool's input parameters.";

/* -------------------------------------------------------------------------- */
/* Argument Struct                                                            */
/* -------------------------------------------------------------------------- */

#[derive(Args, Debug, Default)]
pub struct ExecuteArgs {
    /// Tool slug to execute
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// User id to execute as
    #[arg(long)]
    pub user: String,

    /// Tool arguments as inline JSON
    #[arg(long, value_name = "JSON")]
    pub args: Option<String>,

    /// Tool arguments from a JSON (or YAML) file
    #[arg(long = "args-file", value_name = "PATH")]
    pub args_file: Option<PathBuf>,

    /// Connected account to execute with
    #[arg(long = "connected-account-id", value_name = "ID")]
    pub connected_account_id: Option<String>,

    /// Toolkit version to execute against
    #[arg(long)]
    pub version: Option<String>,

    /// Allow executing against the unpinned `latest` version
    #[arg(long = "dangerously-skip-version-check")]
    pub dangerously_skip_version_check: bool,

    /// Natural language instruction instead of structured arguments
    #[arg(long)]
    pub text: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Request Building                                                           */
/* -------------------------------------------------------------------------- */

/// Tool arguments from whichever single source was given.
pub fn load_arguments(args: &ExecuteArgs) -> Result<Option<Value>, CliError> {
    match (&args.args, &args.args_file) {
        (Some(_), Some(_)) => Err(CliError::ConflictingInputs),
        (Some(inline), None) => parse_inline_args(inline).map(Some),
        (None, Some(path)) => load_args_file(path).map(Some),
        (None, None) => Ok(None),
    }
}

/// Assemble the request body; `version` is filled in by `resolve_version`.
pub fn build_request(args: &ExecuteArgs) -> Result<ExecuteRequest, CliError> {
    Ok(ExecuteRequest {
        user_id: args.user.clone(),
        arguments: load_arguments(args)?,
        connected_account_id: args.connected_account_id.clone(),
        version: args.version.clone(),
        dangerously_skip_version_check: args.dangerously_skip_version_check,
        text: args.text.clone(),
    })
}

/// Pick the version to execute against, refusing an unpinned `latest`
/// unless the check is explicitly skipped.
pub async fn resolve_version(
    api: &dyn ComposioApi,
    slug: &str,
    request: &ExecuteRequest,
    pins: Option<&ToolkitVersions>,
) -> Result<String> {
    let resolved = match (&request.version, pins) {
        (Some(v), _) => v.clone(),
        (None, Some(pins)) if !pins.is_empty() => {
            let def = api.get_tool(slug).await?;
            def.toolkit
                .and_then(|tk| pins.get(&tk.slug).cloned())
                .unwrap_or_else(|| LATEST_VERSION.to_string())
        }
        _ => LATEST_VERSION.to_string(),
    };

    if resolved == LATEST_VERSION && !request.dangerously_skip_version_check {
        return Err(CliError::VersionRequired(slug.to_string()).into());
    }
    Ok(resolved)
}

/* -------------------------------------------------------------------------- */
/* Public Entry Point                                                         */
/* -------------------------------------------------------------------------- */

pub async fn execute_execute(
    api: &dyn ComposioApi,
    pins: Option<&ToolkitVersions>,
    args: ExecuteArgs,
) -> Result<Value> {
    let slug = args.tool.trim().to_string();
    let mut request = build_request(&args)?;
    request.version = Some(resolve_version(api, &slug, &request, pins).await?);

    tracing::info!(
        tool = %slug,
        user = %request.user_id,
        version = request.version.as_deref().unwrap_or_default(),
        "executing tool"
    );
    Ok(api.execute_tool(&slug, &request).await?)
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
