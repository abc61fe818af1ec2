/*!
`schema.rs`

Implements the `schema` subcommand: fetch one tool's definition by slug.

Default output is a projection:
{
  "slug": "GITHUB_STAR_A_REPOSITORY",
  "name": "...",
  "description": "...",
  "toolkit": { "slug": "github", ... },
  "inputParameters": { ...JSON schema... },
  "version": "20250909_00",
  "availableVersions": ["20250909_00"]
}

`--full` prints the raw definition unmodified.
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ComposioApi, ToolDefinition, ToolkitRef};

/// CLI arguments for `composio-cli schema <TOOL>`
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Tool slug (e.g. GITHUB_STAR_A_REPOSITORY)
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Print the complete raw definition instead of the summary
    #[arg(long)]
    pub full: bool,
}

/// Projected view of a tool definition.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchema<'a> {
    pub slug: &'a str,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub toolkit: Option<&'a ToolkitRef>,
    pub input_parameters: Option<&'a Value>,
    pub version: Option<&'a str>,
    pub available_versions: Option<&'a [String]>,
}

impl<'a> From<&'a ToolDefinition> for ToolSchema<'a> {
    fn from(def: &'a ToolDefinition) -> Self {
        ToolSchema {
            slug: &def.slug,
            name: def.name.as_deref(),
            description: def.description.as_deref(),
            toolkit: def.toolkit.as_ref(),
            input_parameters: def.input_parameters.as_ref(),
            version: def.version.as_deref(),
            available_versions: def.available_versions.as_deref(),
        }
    }
}

/// Entrypoint for `schema` subcommand.
pub async fn execute_schema(api: &dyn ComposioApi, args: SchemaArgs) -> Result<Value> {
    let slug = args.tool.trim();
    tracing::info!(slug, full = args.full, "fetching tool definition");
    let def = api.get_tool(slug).await?;

    if args.full {
        return Ok(serde_json::to_value(&def)?);
    }
    Ok(serde_json::to_value(ToolSchema::from(&def))?)
}
