//! # Jira Story Integration
//!
//! Validates Jira connection parameters, checks credentials against the
//! identity endpoint and retrieves stories as normalized records. Every entry
//! point validates its input before a single request is built, and every
//! failure is reported with one of four kinds: validation, transport, remote
//! rejection or an unexpected response shape.

pub mod auth;
mod client;
pub mod config;
pub mod consts;
mod endpoints;
pub mod error;
pub mod events;
pub mod models;
pub mod normalize;
pub mod ops;
#[cfg(test)]
mod testing;
pub mod transport;

// Re-export the client
pub use client::{JiraClient, create_jira_client, endpoint_url};
// Re-export configuration and credentials
pub use auth::{CredentialSource, EnvCredential, StaticCredential, basic_auth_header};
pub use config::{ConnectionConfig, FetchRequest, Secret, validate_connection_config, validate_fetch_request};
// Re-export errors
pub use error::{ErrorKind, JiraError, MappingError, RemoteError, TransportError, TransportErrorKind, ValidationError};
pub use events::{EventSink, NoopSink, Operation, OperationEvent, Outcome, RecordingSink, TracingSink};
// Re-export models
pub use models::{
  AcceptanceCriteria, AuthenticatedIdentity, Connected, ConnectionStatus, IssueQuery, NormalizedIssueRecord,
  ProjectKey,
};
pub use ops::{ApiError, FetchOptions, StoriesResponse, fetch_stories_with};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Transport};
