//! Request / response shapes for the platform's v3 REST API.
//!
//! Records declare only the fields the CLI reads; every other field is kept
//! in a flattened `extra` map so a record serializes back to what the
//! platform returned.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-toolkit version pins (`{"github":"20250909_00"}`).
pub type ToolkitVersions = BTreeMap<String, String>;

/// The version the platform resolves when nothing is pinned.
pub const LATEST_VERSION: &str = "latest";

/* ---- Pagination ---- */

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
}

/* ---- Records ---- */

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Toolkit {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Toolkits that need no authorization at all.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_auth: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to a toolkit embedded in other records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolkitRef {
    pub slug: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw tool definition as returned by `GET /tools/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolkit: Option<ToolkitRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_versions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfigRef {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectedAccount {
    pub id: String,
    pub status: String,
    pub toolkit: ToolkitRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<AuthConfigRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolkit: Option<ToolkitRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /auth_configs`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedAuthConfig {
    pub auth_config: AuthConfigRef,
}

/// Pending authorization returned by `POST /connected_accounts`.
///
/// Older deployments nest the redirect under `connectionData.val`; both
/// shapes are declared explicitly instead of probed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConnectionRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default, rename = "connectionData")]
    pub legacy: Option<LegacyConnectionData>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LegacyConnectionData {
    #[serde(default)]
    pub val: Option<LegacyConnectionVal>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LegacyConnectionVal {
    #[serde(default, rename = "redirectUrl")]
    pub redirect_url: Option<String>,
}

impl ConnectionRequest {
    /// Redirect URL from whichever shape the platform answered with.
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref().or_else(|| {
            self.legacy
                .as_ref()
                .and_then(|d| d.val.as_ref())
                .and_then(|v| v.redirect_url.as_deref())
        })
    }
}

/* ---- Queries ---- */

/// Query for `GET /toolkits`. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolkitQuery {
    pub category: Option<String>,
    pub managed_by: Option<String>,
    pub sort_by: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Filter set for `GET /tools`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFilters {
    pub toolkits: Option<Vec<String>>,
    pub tools: Option<Vec<String>>,
    pub search: Option<String>,
    pub tags: Option<Vec<String>>,
    pub scopes: Option<Vec<String>>,
    pub auth_config_ids: Option<Vec<String>>,
    pub limit: Option<u32>,
    pub important: Option<bool>,
}

/// Query for `GET /connected_accounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionQuery {
    pub user_ids: Vec<String>,
    pub toolkit_slugs: Option<Vec<String>>,
    pub statuses: Option<Vec<String>>,
    pub auth_config_ids: Option<Vec<String>>,
    pub order_by: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Body of `POST /tools/execute/{slug}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExecuteRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Consumed locally by version resolution; never sent.
    #[serde(skip)]
    pub dangerously_skip_version_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/* ---- Query string encoding ---- */

/// Flatten a query into `(key, value)` pairs; list fields repeat their key.
pub trait QueryPairs {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

fn push_opt(out: &mut Vec<(&'static str, String)>, key: &'static str, v: Option<impl ToString>) {
    if let Some(v) = v {
        out.push((key, v.to_string()));
    }
}

fn push_list(out: &mut Vec<(&'static str, String)>, key: &'static str, v: Option<&Vec<String>>) {
    for item in v.into_iter().flatten() {
        out.push((key, item.clone()));
    }
}

impl QueryPairs for ToolkitQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_opt(&mut out, "category", self.category.as_ref());
        push_opt(&mut out, "managed_by", self.managed_by.as_ref());
        push_opt(&mut out, "sort_by", self.sort_by.as_ref());
        push_opt(&mut out, "cursor", self.cursor.as_ref());
        push_opt(&mut out, "limit", self.limit);
        out
    }
}

impl QueryPairs for ToolFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        // The tools endpoint takes toolkits as one comma separated value.
        if let Some(tk) = &self.toolkits {
            out.push(("toolkit_slug", tk.join(",")));
        }
        if let Some(tools) = &self.tools {
            out.push(("tool_slugs", tools.join(",")));
        }
        push_opt(&mut out, "search", self.search.as_ref());
        push_list(&mut out, "tags", self.tags.as_ref());
        push_list(&mut out, "scopes", self.scopes.as_ref());
        push_list(&mut out, "auth_config_ids", self.auth_config_ids.as_ref());
        push_opt(&mut out, "limit", self.limit);
        push_opt(&mut out, "important", self.important);
        out
    }
}

impl QueryPairs for ConnectionQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        push_list(&mut out, "user_ids", Some(&self.user_ids));
        push_list(&mut out, "toolkit_slugs", self.toolkit_slugs.as_ref());
        push_list(&mut out, "statuses", self.statuses.as_ref());
        push_list(&mut out, "auth_config_ids", self.auth_config_ids.as_ref());
        push_opt(&mut out, "order_by", self.order_by.as_ref());
        push_opt(&mut out, "cursor", self.cursor.as_ref());
        push_opt(&mut out, "limit", self.limit);
        out
    }
}
