//! web_search tool - web search through a hosted search API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::WebConfig;
use crate::tools::{Environment, Tool, ToolArgs, ToolArgument, ToolDefinition, ToolError};

/// Search API selected from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct SearchProvider {
    /// API provider: "tavily", "brave", "serpapi"
    pub provider: String,
    /// API key
    pub api_key: String,
}

impl SearchProvider {
    /// Load from environment variables
    pub fn from_env() -> Option<Self> {
        // Try Tavily first (recommended for AI agents)
        if let Ok(api_key) = std::env::var("TAVILY_API_KEY") {
            return Some(Self {
                provider: "tavily".to_string(),
                api_key,
            });
        }

        if let Ok(api_key) = std::env::var("BRAVE_API_KEY") {
            return Some(Self {
                provider: "brave".to_string(),
                api_key,
            });
        }

        if let Ok(api_key) = std::env::var("SERPAPI_KEY") {
            return Some(Self {
                provider: "serpapi".to_string(),
                api_key,
            });
        }

        None
    }
}

/// Search the web for information
pub struct WebSearchTool {
    config: WebConfig,
}

impl WebSearchTool {
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "web_search",
            "web_search <query>",
            "searches the web and prints the top results. Requires TAVILY_API_KEY, BRAVE_API_KEY, or SERPAPI_KEY",
        )
        .arg(ToolArgument::required("query", "string", "the search query"))
    }

    async fn execute(&self, _env: &Environment, args: &ToolArgs) -> Result<String, ToolError> {
        debug!(?args, "WebSearchTool::execute: called");
        let query = args.require("web_search", "query")?;

        let Some(provider) = SearchProvider::from_env() else {
            return Ok(
                "No search API configured. Set TAVILY_API_KEY, BRAVE_API_KEY, or SERPAPI_KEY environment variable."
                    .to_string(),
            );
        };

        let client = match build_client(self.config.timeout_ms) {
            Ok(client) => client,
            Err(e) => return Ok(format!("Error: {}", e)),
        };
        let max_results = self.config.max_results;

        let result = match provider.provider.as_str() {
            "tavily" => search_tavily(&client, query, max_results, &provider.api_key).await,
            "brave" => search_brave(&client, query, max_results, &provider.api_key).await,
            "serpapi" => search_serpapi(&client, query, max_results, &provider.api_key).await,
            other => Err(format!("Unknown search provider: {}", other)),
        };

        Ok(result.unwrap_or_else(|e| format!("Error: {}", e)))
    }
}

/// HTTP client carrying the configured request timeout
fn build_client(timeout_ms: u64) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}

/// Send a request and decode the JSON body
async fn fetch_json(request: reqwest::RequestBuilder, api: &str) -> Result<Value, String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("Search request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(format!("{} API error {}: {}", api, status, error_text));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Search using Tavily API
async fn search_tavily(client: &reqwest::Client, query: &str, max_results: usize, api_key: &str) -> Result<String, String> {
    let body = serde_json::json!({
        "api_key": api_key,
        "query": query,
        "max_results": max_results,
        "search_depth": "basic"
    });

    let result = fetch_json(client.post("https://api.tavily.com/search").json(&body), "Tavily").await?;
    Ok(format_results(&result["results"], "url", "content"))
}

/// Search using Brave Search API
async fn search_brave(client: &reqwest::Client, query: &str, max_results: usize, api_key: &str) -> Result<String, String> {
    let count = max_results.to_string();
    let request = client
        .get("https://api.search.brave.com/res/v1/web/search")
        .header("X-Subscription-Token", api_key)
        .query(&[("q", query), ("count", count.as_str())]);

    let result = fetch_json(request, "Brave").await?;
    Ok(format_results(&result["web"]["results"], "url", "description"))
}

/// Search using SerpAPI
async fn search_serpapi(client: &reqwest::Client, query: &str, max_results: usize, api_key: &str) -> Result<String, String> {
    let num = max_results.to_string();
    let request = client.get("https://serpapi.com/search").query(&[
        ("q", query),
        ("api_key", api_key),
        ("num", num.as_str()),
        ("engine", "google"),
    ]);

    let result = fetch_json(request, "SerpAPI").await?;
    Ok(format_results(&result["organic_results"], "link", "snippet"))
}

/// Numbered title/link/snippet listing of a provider's result array
fn format_results(results: &Value, link_key: &str, snippet_key: &str) -> String {
    let Some(results) = results.as_array().filter(|r| !r.is_empty()) else {
        return "No results found".to_string();
    };

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let title = r["title"].as_str().unwrap_or("(no title)");
            let link = r[link_key].as_str().unwrap_or("");
            let snippet = r[snippet_key].as_str().unwrap_or("");
            format!("{}. {}\n   {}\n   {}\n", i + 1, title, link, truncate(snippet, 200))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate string to max length on a char boundary
fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
