//! Constants for the storybridge-jira client.

use std::time::Duration;

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("storybridge/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Path of the "current user" identity endpoint
pub const MYSELF_PATH: &str = "/rest/api/3/myself";

/// Path of the JQL search endpoint
pub const SEARCH_PATH: &str = "/rest/api/3/search/jql";

/// Number of issues requested per search call unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the search endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Cumulative result cap unless configured otherwise (one page)
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Upper bound on a single outbound request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issue fields every search requests
pub const SEARCH_FIELDS: [&str; 2] = ["summary", "description"];

/// Issue type stories are filtered by
pub const STORY_ISSUE_TYPE: &str = "Story";
