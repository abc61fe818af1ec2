/*!
`toolkits.rs`

Implements the `toolkits` subcommand.

Modes:
  - `--slug S` : fetch exactly that toolkit; every other flag is ignored
  - otherwise  : list toolkits, sending only the filters that were given

JSON Output Shape (list):
{
  "items": [ { "slug": "github", ... } ],
  "next_cursor": "...",
  "total_pages": 3
}
*/

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::client::{ComposioApi, ToolkitQuery};
use crate::cmd::shared::parse_limit;

/// CLI arguments for `composio-cli toolkits`
#[derive(Args, Debug, Default)]
pub struct ToolkitsArgs {
    /// Fetch a single toolkit by slug (other filters are ignored)
    #[arg(long)]
    pub slug: Option<String>,

    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,

    /// Filter by who manages the auth (e.g. composio, all, project)
    #[arg(long = "managed-by", value_name = "WHO")]
    pub managed_by: Option<String>,

    /// Sort order (e.g. usage, alphabetically)
    #[arg(long = "sort-by", value_name = "ORDER")]
    pub sort_by: Option<String>,

    /// Pagination cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page size (non-numeric values are ignored)
    #[arg(long, value_name = "N")]
    pub limit: Option<String>,
}

/// Build the listing query from the supplied flags.
pub fn build_query(args: &ToolkitsArgs) -> ToolkitQuery {
    ToolkitQuery {
        category: args.category.clone(),
        managed_by: args.managed_by.clone(),
        sort_by: args.sort_by.clone(),
        cursor: args.cursor.clone(),
        limit: parse_limit(args.limit.as_deref()),
    }
}

/// Entry point for the toolkits subcommand.
pub async fn execute_toolkits(api: &dyn ComposioApi, args: ToolkitsArgs) -> Result<Value> {
    if let Some(slug) = args.slug.as_deref() {
        tracing::info!(slug, "fetching toolkit");
        let toolkit = api.get_toolkit(slug).await?;
        return Ok(serde_json::to_value(toolkit)?);
    }

    let query = build_query(&args);
    tracing::info!(?query, "listing toolkits");
    let page = api.list_toolkits(&query).await?;
    Ok(serde_json::to_value(page)?)
}
