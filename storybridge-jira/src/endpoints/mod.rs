//! # Jira API Endpoints
//!
//! Endpoint implementations used by storybridge: the "current user" identity
//! check and the JQL story search.

pub mod myself;
pub mod search;
