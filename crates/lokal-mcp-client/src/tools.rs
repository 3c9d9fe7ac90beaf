// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed wrappers for the tools the service ships with.
//!
//! Each wrapper fixes the argument names of one tool. Optional arguments are
//! sent as JSON `null` when absent.

use lokal_core::LokalError;
use serde_json::{Value, json};

use crate::client::McpClient;

/// Default viewport for `web_screenshot`.
pub const DEFAULT_SCREENSHOT_WIDTH: u32 = 1280;
pub const DEFAULT_SCREENSHOT_HEIGHT: u32 = 720;

/// Default result count for `notion_search`.
pub const DEFAULT_NOTION_PAGE_SIZE: u32 = 10;

impl McpClient {
    /// Capture a screenshot of a web page.
    pub async fn web_screenshot(
        &self,
        url: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Value, LokalError> {
        self.call_tool(
            "web_screenshot",
            json!({
                "url": url,
                "width": width.unwrap_or(DEFAULT_SCREENSHOT_WIDTH),
                "height": height.unwrap_or(DEFAULT_SCREENSHOT_HEIGHT),
            }),
        )
        .await
    }

    /// Scrape text from a web page, optionally limited to a CSS selector.
    pub async fn web_scrape(&self, url: &str, selector: Option<&str>) -> Result<Value, LokalError> {
        self.call_tool("web_scrape", json!({ "url": url, "selector": selector }))
            .await
    }

    /// Analyze the UI structure of a web page.
    pub async fn web_analyze_ui(&self, url: &str) -> Result<Value, LokalError> {
        self.call_tool("web_analyze_ui", json!({ "url": url })).await
    }

    pub async fn notion_create_page(
        &self,
        title: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<Value, LokalError> {
        self.call_tool(
            "notion_create_page",
            json!({ "title": title, "content": content, "parent_id": parent_id }),
        )
        .await
    }

    pub async fn notion_search(
        &self,
        query: &str,
        page_size: Option<u32>,
    ) -> Result<Value, LokalError> {
        self.call_tool(
            "notion_search",
            json!({
                "query": query,
                "page_size": page_size.unwrap_or(DEFAULT_NOTION_PAGE_SIZE),
            }),
        )
        .await
    }

    /// Scrape a page and store it in Notion.
    pub async fn web_to_notion(&self, url: &str, title: Option<&str>) -> Result<Value, LokalError> {
        self.call_tool("web_to_notion", json!({ "url": url, "title": title }))
            .await
    }

    pub async fn read_file(&self, path: &str) -> Result<Value, LokalError> {
        self.call_tool("read_file", json!({ "path": path })).await
    }

    pub async fn write_file(&self, path: &str, content: &str) -> Result<Value, LokalError> {
        self.call_tool("write_file", json!({ "path": path, "content": content }))
            .await
    }

    /// Run a shell command on the service host.
    pub async fn run_command(
        &self,
        command: &str,
        working_directory: Option<&str>,
    ) -> Result<Value, LokalError> {
        self.call_tool(
            "run_command",
            json!({ "command": command, "working_directory": working_directory }),
        )
        .await
    }
}
