/*!
Command dispatcher module.

Layout:
  src/cmd/
    mod.rs          (this file: Commands enum + dispatch)
    toolkits.rs     (ToolkitsArgs    + execute_toolkits)
    schema.rs       (SchemaArgs      + execute_schema)
    connections.rs  (ConnectionsArgs + execute_connections)
    tools.rs        (ToolsArgs       + execute_tools)
    auth_url.rs     (AuthUrlArgs     + execute_auth_url)
    execute.rs      (ExecuteArgs     + execute_execute)
    status.rs       (ConnectionStatus vocabulary)
    shared.rs       (flag parsing helpers)
    format.rs       (JSON output + error reporting)

Conventions:
  - Each subcommand module exposes one public async `execute_*` function
    taking the collaborator (`&dyn ComposioApi`) and its args, returning
    the JSON payload to print as `anyhow::Result<serde_json::Value>`.
  - Local validation fails with `CliError` before the collaborator is
    touched; collaborator failures propagate untranslated.
  - Nothing in here prints; `main` owns stdout / stderr.
*/

pub mod auth_url;
pub mod connections;
pub mod execute;
pub mod format;
pub mod schema;
pub mod shared;
pub mod status;
pub mod toolkits;
pub mod tools;

use anyhow::Result;
use clap::Subcommand;
use serde_json::Value;

use crate::client::ComposioApi;
use crate::config::GlobalOptions;

pub use auth_url::{AuthUrlArgs, execute_auth_url};
pub use connections::{ConnectionsArgs, execute_connections};
pub use execute::{ExecuteArgs, execute_execute};
pub use schema::{SchemaArgs, execute_schema};
pub use toolkits::{ToolkitsArgs, execute_toolkits};
pub use tools::{ToolsArgs, execute_tools};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List toolkits, or fetch one by slug
    Toolkits(ToolkitsArgs),

    /// Return an authorization URL for a user and toolkit (or the existing connection)
    #[command(name = "auth-url")]
    AuthUrl(AuthUrlArgs),

    /// Show a tool's schema
    Schema(SchemaArgs),

    /// List a user's connected accounts
    Connections(ConnectionsArgs),

    /// List tools available to a user
    Tools(ToolsArgs),

    /// Execute a tool with JSON arguments
    Execute(ExecuteArgs),
}

impl Commands {
    /// Static hint printed under this command's errors.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Commands::Execute(_) => Some(execute::EXECUTE_HINT),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Commands::Toolkits(_) => "toolkits",
            Commands::AuthUrl(_) => "auth-url",
            Commands::Schema(_) => "schema",
            Commands::Connections(_) => "connections",
            Commands::Tools(_) => "tools",
            Commands::Execute(_) => "execute",
        }
    }

    /// Run the command against `api`, returning the payload to print.
    pub async fn run(self, api: &dyn ComposioApi, globals: &GlobalOptions) -> Result<Value> {
        match self {
            Commands::Toolkits(args) => execute_toolkits(api, args).await,
            Commands::AuthUrl(args) => execute_auth_url(api, args).await,
            Commands::Schema(args) => execute_schema(api, args).await,
            Commands::Connections(args) => execute_connections(api, args).await,
            Commands::Tools(args) => execute_tools(api, args).await,
            Commands::Execute(args) => {
                execute_execute(api, globals.toolkit_versions.as_ref(), args).await
            }
        }
    }
}
