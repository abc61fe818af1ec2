/*!
`connections.rs`

Implements the `connections` subcommand: connected accounts of one user.

Default output projects each item:
[
  { "id": "ca_1", "status": "ACTIVE", "toolkit": "github" }
]

`--full` prints the raw page (items + cursor fields) unprojected.
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ComposioApi, ConnectedAccount, ConnectionQuery};
use crate::cmd::shared::{csv_filter, parse_limit};
use crate::cmd::status::ConnectionStatus;
use crate::error::CliError;

/// CLI arguments for `composio-cli connections`
#[derive(Args, Debug, Default)]
pub struct ConnectionsArgs {
    /// User id whose connections are listed
    #[arg(long)]
    pub user: String,

    /// Comma separated toolkit slugs
    #[arg(long, value_name = "SLUGS")]
    pub toolkits: Option<String>,

    /// Comma separated statuses (ACTIVE, INITIATED, INACTIVE, FAILED, EXPIRED, INITIALIZING)
    #[arg(long, value_name = "STATUSES")]
    pub statuses: Option<String>,

    /// Comma separated auth config ids
    #[arg(long = "auth-config-ids", value_name = "IDS")]
    pub auth_config_ids: Option<String>,

    /// Ordering field (e.g. created_at, updated_at)
    #[arg(long = "order-by", value_name = "FIELD")]
    pub order_by: Option<String>,

    /// Pagination cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page size (non-numeric values are ignored)
    #[arg(long, value_name = "N")]
    pub limit: Option<String>,

    /// Print the raw paginated response
    #[arg(long)]
    pub full: bool,
}

/// Summary of a connected account.
#[derive(Debug, Serialize)]
pub struct ConnectionSummary<'a> {
    pub id: &'a str,
    pub status: &'a str,
    pub toolkit: &'a str,
}

impl<'a> From<&'a ConnectedAccount> for ConnectionSummary<'a> {
    fn from(a: &'a ConnectedAccount) -> Self {
        ConnectionSummary {
            id: &a.id,
            status: &a.status,
            toolkit: &a.toolkit.slug,
        }
    }
}

/// Build the query; always scoped to exactly one user.
pub fn build_query(args: &ConnectionsArgs) -> Result<ConnectionQuery, CliError> {
    let statuses = csv_filter(args.statuses.as_deref())
        .map(|raw| ConnectionStatus::parse_list(&raw))
        .transpose()?
        .map(|list| list.iter().map(|s| s.as_str().to_string()).collect());

    Ok(ConnectionQuery {
        user_ids: vec![args.user.clone()],
        toolkit_slugs: csv_filter(args.toolkits.as_deref()),
        statuses,
        auth_config_ids: csv_filter(args.auth_config_ids.as_deref()),
        order_by: args.order_by.clone(),
        cursor: args.cursor.clone(),
        limit: parse_limit(args.limit.as_deref()),
    })
}

/// Entry point for the connections subcommand.
pub async fn execute_connections(api: &dyn ComposioApi, args: ConnectionsArgs) -> Result<Value> {
    let query = build_query(&args)?;
    tracing::info!(user = %args.user, "listing connected accounts");
    tracing::debug!(?query, "connection query");
    let page = api.list_connected_accounts(&query).await?;

    if args.full {
        return Ok(serde_json::to_value(&page)?);
    }
    let summaries: Vec<ConnectionSummary<'_>> = page.items.iter().map(Into::into).collect();
    Ok(serde_json::to_value(summaries)?)
}
