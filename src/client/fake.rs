/*!
fake.rs - deterministic in-memory `ComposioApi` for tests.

Seed it with toolkits / tools / connected accounts / auth configs, run a
command against it, then inspect `calls()` to assert what reached the
"network".

Also hosts `find_unconfigured_toolkit`, the pagination helper tests use to
pick a toolkit that has no auth config yet.
*/

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::*;

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetToolkit(String),
    ListToolkits(ToolkitQuery),
    GetTool(String),
    ListTools(String, ToolFilters),
    ListToolEnum,
    ListConnectedAccounts(ConnectionQuery),
    ListAuthConfigs(String),
    Authorize {
        user_id: String,
        toolkit: String,
        auth_config_id: Option<String>,
    },
    ExecuteTool(String, ExecuteRequest),
}

#[derive(Default)]
pub struct FakeComposio {
    pub toolkits: Vec<Toolkit>,
    pub tools: Vec<ToolDefinition>,
    pub accounts: Vec<ConnectedAccount>,
    pub auth_configs: Vec<AuthConfig>,
    /// Page size used by `list_toolkits` when the query carries no limit.
    pub page_size: usize,
    /// When set, `execute_tool` fails with this message.
    pub execute_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeComposio {
    pub fn new() -> Self {
        FakeComposio {
            page_size: 50,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn not_found(what: &str, slug: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("{what} {slug} not found"),
        }
    }
}

/* ---- Seed builders ---- */

/// A single page with no continuation.
pub fn page<T>(items: Vec<T>) -> Page<T> {
    Page {
        items,
        next_cursor: None,
        total_pages: None,
        current_page: None,
        total_items: None,
    }
}

pub fn toolkit(slug: &str) -> Toolkit {
    Toolkit {
        slug: slug.to_string(),
        name: Some(slug.to_uppercase()),
        no_auth: false,
        extra: Map::new(),
    }
}

pub fn tool(slug: &str, toolkit_slug: &str) -> ToolDefinition {
    let mut extra = Map::new();
    extra.insert("tags".into(), json!(["important"]));
    ToolDefinition {
        slug: slug.to_string(),
        name: Some(slug.to_lowercase()),
        description: Some(format!("{slug} description")),
        toolkit: Some(ToolkitRef {
            slug: toolkit_slug.to_string(),
            extra: Map::new(),
        }),
        input_parameters: Some(json!({
            "type": "object",
            "properties": {"owner": {"type": "string"}},
            "required": ["owner"]
        })),
        version: Some("20250909_00".into()),
        available_versions: Some(vec!["20250909_00".into(), "20250801_00".into()]),
        extra,
    }
}

pub fn account(id: &str, user: &str, toolkit_slug: &str, status: &str, auth: &str) -> ConnectedAccount {
    let mut extra = Map::new();
    extra.insert("user_id".into(), json!(user));
    ConnectedAccount {
        id: id.to_string(),
        status: status.to_string(),
        toolkit: ToolkitRef {
            slug: toolkit_slug.to_string(),
            extra: Map::new(),
        },
        auth_config: Some(AuthConfigRef {
            id: auth.to_string(),
            extra: Map::new(),
        }),
        extra,
    }
}

pub fn auth_config(id: &str, toolkit_slug: &str) -> AuthConfig {
    AuthConfig {
        id: id.to_string(),
        toolkit: Some(ToolkitRef {
            slug: toolkit_slug.to_string(),
            extra: Map::new(),
        }),
        extra: Map::new(),
    }
}

fn matches_any(filter: &Option<Vec<String>>, value: &str) -> bool {
    filter
        .as_ref()
        .is_none_or(|allowed| allowed.iter().any(|a| a == value))
}

#[async_trait]
impl ComposioApi for FakeComposio {
    async fn get_toolkit(&self, slug: &str) -> Result<Toolkit, ApiError> {
        self.record(Call::GetToolkit(slug.to_string()));
        self.toolkits
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or_else(|| Self::not_found("Toolkit", slug))
    }

    async fn list_toolkits(&self, query: &ToolkitQuery) -> Result<Page<Toolkit>, ApiError> {
        self.record(Call::ListToolkits(query.clone()));
        let size = query.limit.map(|l| l as usize).unwrap_or(self.page_size).max(1);
        let start: usize = query
            .cursor
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        let items: Vec<Toolkit> = self.toolkits.iter().skip(start).take(size).cloned().collect();
        let end = start + items.len();
        let mut out = page(items);
        if end < self.toolkits.len() {
            out.next_cursor = Some(end.to_string());
        }
        out.total_items = Some(self.toolkits.len() as u64);
        Ok(out)
    }

    async fn get_tool(&self, slug: &str) -> Result<ToolDefinition, ApiError> {
        self.record(Call::GetTool(slug.to_string()));
        self.tools
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .ok_or_else(|| Self::not_found("Tool", slug))
    }

    async fn list_tools(
        &self,
        user_id: &str,
        filters: &ToolFilters,
    ) -> Result<Page<ToolDefinition>, ApiError> {
        self.record(Call::ListTools(user_id.to_string(), filters.clone()));
        let items = self
            .tools
            .iter()
            .filter(|t| matches_any(&filters.tools, &t.slug))
            .filter(|t| {
                let tk = t.toolkit.as_ref().map(|r| r.slug.as_str()).unwrap_or("");
                matches_any(&filters.toolkits, tk)
            })
            .filter(|t| {
                filters.search.as_deref().is_none_or(|q| {
                    t.slug.to_lowercase().contains(&q.to_lowercase())
                })
            })
            .take(filters.limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(page(items))
    }

    async fn list_tool_enum(&self) -> Result<Vec<String>, ApiError> {
        self.record(Call::ListToolEnum);
        Ok(self.tools.iter().map(|t| t.slug.clone()).collect())
    }

    async fn list_connected_accounts(
        &self,
        query: &ConnectionQuery,
    ) -> Result<Page<ConnectedAccount>, ApiError> {
        self.record(Call::ListConnectedAccounts(query.clone()));
        let items = self
            .accounts
            .iter()
            .filter(|a| {
                let user = a.extra.get("user_id").and_then(Value::as_str).unwrap_or("");
                query.user_ids.iter().any(|u| u == user)
            })
            .filter(|a| matches_any(&query.toolkit_slugs, &a.toolkit.slug))
            .filter(|a| matches_any(&query.statuses, &a.status))
            .filter(|a| {
                let auth = a.auth_config.as_ref().map(|c| c.id.as_str()).unwrap_or("");
                matches_any(&query.auth_config_ids, auth)
            })
            .take(query.limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(page(items))
    }

    async fn list_auth_configs(&self, toolkit: &str) -> Result<Page<AuthConfig>, ApiError> {
        self.record(Call::ListAuthConfigs(toolkit.to_string()));
        let items = self
            .auth_configs
            .iter()
            .filter(|c| c.toolkit.as_ref().is_some_and(|t| t.slug == toolkit))
            .cloned()
            .collect();
        Ok(page(items))
    }

    async fn authorize(
        &self,
        user_id: &str,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<ConnectionRequest, ApiError> {
        self.record(Call::Authorize {
            user_id: user_id.to_string(),
            toolkit: toolkit.to_string(),
            auth_config_id: auth_config_id.map(str::to_string),
        });
        if !self.toolkits.iter().any(|t| t.slug == toolkit) {
            return Err(ApiError::Status {
                status: 400,
                message: format!("No auth config available for toolkit {toolkit}"),
            });
        }
        Ok(ConnectionRequest {
            id: Some(format!("cr_{user_id}_{toolkit}")),
            status: Some("INITIATED".into()),
            redirect_url: Some(format!("https://connect.example/{toolkit}?user={user_id}")),
            legacy: None,
        })
    }

    async fn execute_tool(
        &self,
        slug: &str,
        request: &ExecuteRequest,
    ) -> Result<Value, ApiError> {
        self.record(Call::ExecuteTool(slug.to_string(), request.clone()));
        if let Some(message) = &self.execute_error {
            return Err(ApiError::Status {
                status: 400,
                message: message.clone(),
            });
        }
        Ok(json!({
            "successful": true,
            "data": {"echo": request.arguments.clone().unwrap_or(Value::Null)},
            "error": null
        }))
    }
}

/* ---- Unconfigured toolkit finder ---- */

/// Pages fetched before giving up.
const FINDER_MAX_PAGES: usize = 6;
const FINDER_PAGE_SIZE: u32 = 50;

/// First toolkit that needs auth but has no auth config, scanning at most
/// six pages of fifty.
pub async fn find_unconfigured_toolkit(
    api: &dyn ComposioApi,
) -> Result<Option<Toolkit>, ApiError> {
    let mut cursor: Option<String> = None;
    for _ in 0..FINDER_MAX_PAGES {
        let page = api
            .list_toolkits(&ToolkitQuery {
                cursor: cursor.take(),
                limit: Some(FINDER_PAGE_SIZE),
                ..Default::default()
            })
            .await?;
        for tk in page.items {
            if tk.no_auth {
                continue;
            }
            if api.list_auth_configs(&tk.slug).await?.items.is_empty() {
                return Ok(Some(tk));
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize) -> FakeComposio {
        let mut fake = FakeComposio::new();
        for i in 0..n {
            let slug = format!("tk{i:03}");
            fake.auth_configs.push(auth_config(&format!("ac_{i}"), &slug));
            fake.toolkits.push(toolkit(&slug));
        }
        fake
    }

    #[tokio::test]
    async fn finder_returns_first_toolkit_without_auth_config() {
        let mut fake = seeded(120);
        fake.auth_configs.retain(|c| c.id != "ac_73");
        let found = find_unconfigured_toolkit(&fake).await.unwrap();
        assert_eq!(found.map(|t| t.slug), Some("tk073".to_string()));

        let pages = fake
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::ListToolkits(_)))
            .count();
        assert_eq!(pages, 2, "stops on the page holding the hit");
    }

    #[tokio::test]
    async fn finder_skips_no_auth_toolkits() {
        let mut fake = seeded(3);
        fake.auth_configs.clear();
        fake.toolkits[0].no_auth = true;
        let found = find_unconfigured_toolkit(&fake).await.unwrap();
        assert_eq!(found.map(|t| t.slug), Some("tk001".to_string()));
    }

    #[tokio::test]
    async fn finder_stops_when_cursor_runs_out() {
        let fake = seeded(70);
        assert!(find_unconfigured_toolkit(&fake).await.unwrap().is_none());
        let pages = fake
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::ListToolkits(_)))
            .count();
        assert_eq!(pages, 2);
    }

    #[tokio::test]
    async fn finder_is_bounded_to_six_pages() {
        let fake = seeded(400);
        assert!(find_unconfigured_toolkit(&fake).await.unwrap().is_none());
        let pages: Vec<_> = fake
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListToolkits(q) => Some(q),
                _ => None,
            })
            .collect();
        assert_eq!(pages.len(), 6);
        assert!(pages.iter().all(|q| q.limit == Some(50)));
        assert_eq!(pages[1].cursor.as_deref(), Some("50"));
    }
}
