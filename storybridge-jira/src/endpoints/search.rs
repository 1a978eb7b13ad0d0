//! # Story Search
//!
//! Runs the story JQL against the search endpoint and maps the results.
//! With the default query a single page of 50 is requested; anything beyond
//! it is left out. Larger result sets need an explicit `max_results` above
//! the page size, in which case pages are followed by token.

use serde_json::Value;
use tracing::debug;

use crate::client::JiraClient;
use crate::config::ConnectionConfig;
use crate::consts::SEARCH_PATH;
use crate::error::{JiraError, MappingError};
use crate::events::Operation;
use crate::models::{IssueQuery, NormalizedIssueRecord, SearchRequest};
use crate::normalize::{normalize_issue, parse_search_page};
use crate::transport::{HttpMethod, Transport};

impl<T: Transport> JiraClient<T> {
  /// Fetch stories matching `query`, newest first.
  pub async fn fetch_stories(
    &self,
    config: &ConnectionConfig,
    query: &IssueQuery,
  ) -> Result<Vec<NormalizedIssueRecord>, JiraError> {
    self
      .observe(Operation::FetchStories, self.collect_stories(config, query))
      .await
  }

  async fn collect_stories(
    &self,
    config: &ConnectionConfig,
    query: &IssueQuery,
  ) -> Result<Vec<NormalizedIssueRecord>, JiraError> {
    let jql = query.jql();
    let fields = query.fields();
    let cap = query.max_results() as usize;

    let mut records = Vec::new();
    let mut next_page_token: Option<String> = None;

    loop {
      let remaining = query.max_results().saturating_sub(records.len() as u32);
      let request = SearchRequest {
        jql: &jql,
        max_results: remaining.min(query.page_size()),
        fields: &fields,
        next_page_token: next_page_token.as_deref(),
      };
      let body: Value = serde_json::to_value(&request)
        .map_err(|e| MappingError::new(format!("failed to encode search request: {e}")))?;

      debug!(jql = %jql, page_token = ?next_page_token, "Searching Jira stories");

      let response = self.request(config, SEARCH_PATH, HttpMethod::Post, Some(&body)).await?;
      let page = parse_search_page(response)?;
      let page_len = page.issues.len();

      for issue in page.issues {
        let index = records.len();
        records.push(normalize_issue(index, issue, query.acceptance_criteria_field())?);
      }

      if !query.is_multi_page() || records.len() >= cap || page_len == 0 || page.is_last == Some(true) {
        break;
      }
      match page.next_page_token {
        Some(token) => next_page_token = Some(token),
        None => break,
      }
    }

    records.truncate(cap);
    debug!(count = records.len(), "Fetched Jira stories");
    Ok(records)
  }
}
