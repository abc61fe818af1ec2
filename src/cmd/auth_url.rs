/*!
`auth_url.rs`

Implements the `auth-url` subcommand.

Flow:
  1. Unless `--force`, look up ACTIVE connections for (user, toolkit),
     optionally narrowed to one auth config, page size 50.
  2. Any hit -> report them and stop; no authorization is requested.
  3. Otherwise (or with `--force`) request a new authorization.

JSON Output Shapes:

Already connected:
{
  "authenticated": true,
  "connectedAccounts": [
    { "id": "ca_1", "status": "ACTIVE", "toolkit": "github", "authConfigId": "ac_1" }
  ]
}

New authorization:
{
  "authenticated": false,
  "redirectUrl": "https://...",
  "connectionRequestId": "ca_2",
  "status": "INITIATED"
}
*/

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ComposioApi, ConnectedAccount, ConnectionQuery, ConnectionRequest};
use crate::cmd::status::ConnectionStatus;

/// Page size of the existing-connection lookup.
pub const EXISTING_LOOKUP_LIMIT: u32 = 50;

/// CLI arguments for `composio-cli auth-url`
#[derive(Args, Debug, Default)]
pub struct AuthUrlArgs {
    /// User id to authorize
    #[arg(long)]
    pub user: String,

    /// Toolkit slug (e.g. github)
    #[arg(long)]
    pub toolkit: String,

    /// Auth config to use (defaults to the toolkit's first / managed one)
    #[arg(long = "auth-config-id", value_name = "ID")]
    pub auth_config_id: Option<String>,

    /// Request a new authorization even if an active connection exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveConnection<'a> {
    pub id: &'a str,
    pub status: &'a str,
    pub toolkit: &'a str,
    pub auth_config_id: Option<&'a str>,
}

impl<'a> From<&'a ConnectedAccount> for ActiveConnection<'a> {
    fn from(a: &'a ConnectedAccount) -> Self {
        ActiveConnection {
            id: &a.id,
            status: &a.status,
            toolkit: &a.toolkit.slug,
            auth_config_id: a.auth_config.as_ref().map(|c| c.id.as_str()),
        }
    }
}

/// Outcome of the existing-connection vs new-authorization decision.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AuthUrlOutcome<'a> {
    #[serde(rename_all = "camelCase")]
    Connected {
        authenticated: bool,
        connected_accounts: Vec<ActiveConnection<'a>>,
    },
    #[serde(rename_all = "camelCase")]
    Pending {
        authenticated: bool,
        redirect_url: Option<&'a str>,
        connection_request_id: Option<&'a str>,
        status: Option<&'a str>,
    },
}

impl<'a> AuthUrlOutcome<'a> {
    fn connected(accounts: &'a [ConnectedAccount]) -> Self {
        AuthUrlOutcome::Connected {
            authenticated: true,
            connected_accounts: accounts.iter().map(Into::into).collect(),
        }
    }

    fn pending(req: &'a ConnectionRequest) -> Self {
        AuthUrlOutcome::Pending {
            authenticated: false,
            redirect_url: req.redirect_url(),
            connection_request_id: req.id.as_deref(),
            status: req.status.as_deref(),
        }
    }
}

/// Query for ACTIVE connections of (user, toolkit[, auth config]).
pub fn existing_query(args: &AuthUrlArgs) -> ConnectionQuery {
    ConnectionQuery {
        user_ids: vec![args.user.clone()],
        toolkit_slugs: Some(vec![args.toolkit.clone()]),
        statuses: Some(vec![ConnectionStatus::Active.to_string()]),
        auth_config_ids: args.auth_config_id.clone().map(|id| vec![id]),
        limit: Some(EXISTING_LOOKUP_LIMIT),
        ..Default::default()
    }
}

/// Entry point for the auth-url subcommand.
pub async fn execute_auth_url(api: &dyn ComposioApi, args: AuthUrlArgs) -> Result<Value> {
    if !args.force {
        let existing = api.list_connected_accounts(&existing_query(&args)).await?;
        if !existing.items.is_empty() {
            tracing::info!(
                user = %args.user,
                toolkit = %args.toolkit,
                count = existing.items.len(),
                "already connected"
            );
            return Ok(serde_json::to_value(AuthUrlOutcome::connected(
                &existing.items,
            ))?);
        }
    }

    tracing::info!(user = %args.user, toolkit = %args.toolkit, force = args.force, "requesting authorization");
    let request = api
        .authorize(&args.user, &args.toolkit, args.auth_config_id.as_deref())
        .await?;
    Ok(serde_json::to_value(AuthUrlOutcome::pending(&request))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{Call, FakeComposio, account, toolkit};

    fn fake() -> FakeComposio {
        let mut fake = FakeComposio::new();
        fake.toolkits = vec![toolkit("github"), toolkit("slack")];
        fake.accounts = vec![
            account("ca_1", "alice", "github", "ACTIVE", "ac_gh"),
            account("ca_2", "alice", "slack", "EXPIRED", "ac_sl"),
        ];
        fake
    }

    fn args(user: &str, tk: &str) -> AuthUrlArgs {
        AuthUrlArgs {
            user: user.into(),
            toolkit: tk.into(),
            ..Default::default()
        }
    }

    fn authorize_calls(fake: &FakeComposio) -> usize {
        fake.calls()
            .iter()
            .filter(|c| matches!(c, Call::Authorize { .. }))
            .count()
    }

    #[tokio::test]
    async fn existing_active_connection_is_reported() {
        let fake = fake();
        let out = execute_auth_url(&fake, args("alice", "github")).await.unwrap();
        assert_eq!(out["authenticated"], true);
        let accounts = out["connectedAccounts"].as_array().unwrap();
        assert!(accounts.iter().any(|a| a["toolkit"] == "github"));
        assert_eq!(accounts[0]["authConfigId"], "ac_gh");
        assert_eq!(authorize_calls(&fake), 0);
    }

    #[tokio::test]
    async fn lookup_query_is_scoped() {
        let fake = fake();
        let a = AuthUrlArgs {
            auth_config_id: Some("ac_other".into()),
            ..args("alice", "github")
        };
        let out = execute_auth_url(&fake, a).await.unwrap();
        // ca_1 uses ac_gh, so the scoped lookup finds nothing.
        assert_eq!(out["authenticated"], false);
        match &fake.calls()[0] {
            Call::ListConnectedAccounts(q) => {
                assert_eq!(q.statuses, Some(vec!["ACTIVE".to_string()]));
                assert_eq!(q.auth_config_ids, Some(vec!["ac_other".to_string()]));
                assert_eq!(q.limit, Some(50));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn inactive_connection_leads_to_authorization() {
        let fake = fake();
        let out = execute_auth_url(&fake, args("alice", "slack")).await.unwrap();
        assert_eq!(out["authenticated"], false);
        assert_eq!(out["status"], "INITIATED");
        assert_eq!(out["connectionRequestId"], "cr_alice_slack");
        assert_eq!(authorize_calls(&fake), 1);
    }

    #[tokio::test]
    async fn force_skips_lookup() {
        let fake = fake();
        let a = AuthUrlArgs {
            force: true,
            ..args("alice", "github")
        };
        let out = execute_auth_url(&fake, a).await.unwrap();
        assert_eq!(out["authenticated"], false);
        assert!(out["redirectUrl"].is_string() || out["connectionRequestId"].is_string());
        assert_eq!(
            fake.calls(),
            vec![Call::Authorize {
                user_id: "alice".into(),
                toolkit: "github".into(),
                auth_config_id: None,
            }]
        );
    }

    #[test]
    fn missing_response_fields_become_null() {
        let req = ConnectionRequest {
            id: None,
            status: None,
            redirect_url: None,
            legacy: None,
        };
        let out = serde_json::to_value(AuthUrlOutcome::pending(&req)).unwrap();
        assert_eq!(
            out,
            serde_json::json!({
                "authenticated": false,
                "redirectUrl": null,
                "connectionRequestId": null,
                "status": null
            })
        );
    }

    #[tokio::test]
    async fn unusable_toolkit_error_propagates() {
        let fake = fake();
        let err = execute_auth_url(&fake, args("alice", "notion")).await.unwrap_err();
        assert_eq!(err.to_string(), "No auth config available for toolkit notion");
    }
}
