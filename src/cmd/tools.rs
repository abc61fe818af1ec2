/*!
`tools.rs`

Implements the `tools` subcommand.

Behavior:
  - `--all` short-circuits every other flag and enumerates the whole
    catalog (tool slugs).
  - Otherwise the filter flags are validated, in this order:
      1. at least one of --toolkits / --tools / --search / --tags /
         --auth-config-ids                         (MissingFilter)
      2. --search excludes every other filter and --limit
                                                   (ConflictingFilters)
      3. --tools excludes --toolkits / --tags / --scopes /
         --auth-config-ids / --search             (ConflictingFilters)
      4. --scopes needs exactly one --toolkits entry (InvalidScopeUsage)
    and only then is the listing issued for `--user`.

JSON Output Shape: array of raw tool definitions.
*/

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::client::{ComposioApi, ToolFilters};
use crate::cmd::shared::{csv_filter, parse_limit};
use crate::error::CliError;

/// CLI arguments for `composio-cli tools`
#[derive(Args, Debug, Default)]
pub struct ToolsArgs {
    /// User id the tools are listed for
    #[arg(long, required_unless_present = "all")]
    pub user: Option<String>,

    /// List the complete tool catalog (ignores every other flag)
    #[arg(long)]
    pub all: bool,

    /// Comma separated toolkit slugs
    #[arg(long, value_name = "SLUGS")]
    pub toolkits: Option<String>,

    /// Comma separated tool slugs
    #[arg(long, value_name = "SLUGS")]
    pub tools: Option<String>,

    /// Free text search (cannot be combined with other filters)
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Comma separated tags
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Comma separated scopes (requires exactly one toolkit)
    #[arg(long, value_name = "SCOPES")]
    pub scopes: Option<String>,

    /// Comma separated auth config ids
    #[arg(long = "auth-config-ids", value_name = "IDS")]
    pub auth_config_ids: Option<String>,

    /// Maximum number of tools (non-numeric values are ignored)
    #[arg(long, value_name = "N")]
    pub limit: Option<String>,

    /// Only tools marked important
    #[arg(long)]
    pub important: bool,
}

/// Validate the filter flags and assemble the filter set.
pub fn build_filters(args: &ToolsArgs) -> Result<ToolFilters, CliError> {
    let toolkits = csv_filter(args.toolkits.as_deref());
    let tools = csv_filter(args.tools.as_deref());
    let search = args
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let tags = csv_filter(args.tags.as_deref());
    let scopes = csv_filter(args.scopes.as_deref());
    let auth_config_ids = csv_filter(args.auth_config_ids.as_deref());

    if toolkits.is_none()
        && tools.is_none()
        && search.is_none()
        && tags.is_none()
        && auth_config_ids.is_none()
    {
        return Err(CliError::MissingFilter);
    }

    if search.is_some() {
        let others = [
            ("--toolkits", toolkits.is_some()),
            ("--tools", tools.is_some()),
            ("--tags", tags.is_some()),
            ("--scopes", scopes.is_some()),
            ("--auth-config-ids", auth_config_ids.is_some()),
            ("--limit", args.limit.is_some()),
        ];
        if let Some(names) = present(&others) {
            return Err(CliError::ConflictingFilters(format!(
                "--search cannot be combined with {names}"
            )));
        }
    }

    if tools.is_some() {
        let others = [
            ("--toolkits", toolkits.is_some()),
            ("--tags", tags.is_some()),
            ("--scopes", scopes.is_some()),
            ("--auth-config-ids", auth_config_ids.is_some()),
            ("--search", search.is_some()),
        ];
        if let Some(names) = present(&others) {
            return Err(CliError::ConflictingFilters(format!(
                "--tools cannot be combined with {names}"
            )));
        }
    }

    if scopes.is_some() && toolkits.as_ref().is_none_or(|t| t.len() != 1) {
        return Err(CliError::InvalidScopeUsage);
    }

    Ok(ToolFilters {
        toolkits,
        tools,
        search,
        tags,
        scopes,
        auth_config_ids,
        limit: parse_limit(args.limit.as_deref()),
        important: args.important.then_some(true),
    })
}

/// Names of the flags that are set, joined for an error message.
fn present(flags: &[(&str, bool)]) -> Option<String> {
    let names: Vec<&str> = flags
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

/// Entry point for the tools subcommand.
pub async fn execute_tools(api: &dyn ComposioApi, args: ToolsArgs) -> Result<Value> {
    if args.all {
        tracing::info!("enumerating full tool catalog");
        let slugs = api.list_tool_enum().await?;
        return Ok(serde_json::to_value(slugs)?);
    }

    let filters = build_filters(&args)?;
    // clap enforces --user unless --all; the empty fallback is unreachable
    // from the command line.
    let user = args.user.as_deref().unwrap_or_default();
    tracing::info!(user, "listing tools");
    tracing::debug!(?filters, "tool filters");
    let page = api.list_tools(user, &filters).await?;
    Ok(serde_json::to_value(page.items)?)
}
