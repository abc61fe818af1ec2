//! Global options and the client factory.
//!
//! Resolved once per invocation (flag > environment) and handed to every
//! command explicitly.

use url::Url;

use crate::client::{ComposioClient, DEFAULT_BASE_URL, ToolkitVersions};
use crate::error::CliError;

pub const API_KEY_ENV: &str = "COMPOSIO_API_KEY";
pub const BASE_URL_ENV: &str = "COMPOSIO_BASE_URL";

/// Options shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalOptions {
    pub api_key: Option<String>,
    pub toolkit_versions: Option<ToolkitVersions>,
    pub raw: bool,
    pub base_url: Url,
}

/// Unresolved global flags as clap parsed them.
#[derive(Debug, Clone, Default)]
pub struct GlobalFlags {
    pub api_key: Option<String>,
    pub toolkit_versions: Option<String>,
    pub raw: bool,
    pub base_url: Option<String>,
}

impl GlobalOptions {
    /// Resolve flags against the process environment.
    pub fn resolve(flags: GlobalFlags) -> Result<Self, CliError> {
        Self::resolve_with(flags, |k| std::env::var(k).ok())
    }

    /// Resolve flags against an arbitrary environment lookup.
    pub fn resolve_with(
        flags: GlobalFlags,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CliError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_key = non_empty(flags.api_key).or_else(|| non_empty(env(API_KEY_ENV)));

        let toolkit_versions = flags
            .toolkit_versions
            .as_deref()
            .map(parse_toolkit_versions)
            .transpose()?;

        let raw_base = non_empty(flags.base_url)
            .or_else(|| non_empty(env(BASE_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(raw_base.trim()).map_err(|e| CliError::InvalidConfiguration {
            flag: "--base-url",
            reason: e.to_string(),
        })?;

        Ok(GlobalOptions {
            api_key,
            toolkit_versions,
            raw: flags.raw,
            base_url,
        })
    }

    /// Build the one client this invocation uses. Fails before any network
    /// activity when no credential is available.
    pub fn build_client(&self) -> anyhow::Result<ComposioClient> {
        let api_key = self.api_key.clone().ok_or(CliError::MissingCredential)?;
        tracing::debug!(base_url = %self.base_url, pinned = self.toolkit_versions.is_some(), "building client");
        Ok(ComposioClient::new(
            self.base_url.clone(),
            api_key,
            self.toolkit_versions.clone(),
        )?)
    }
}

/// `--toolkit-versions` must be a JSON object of string values.
pub fn parse_toolkit_versions(raw: &str) -> Result<ToolkitVersions, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::InvalidConfiguration {
        flag: "--toolkit-versions",
        reason: e.to_string(),
    })
}
