//! Configuration for the ACL tree resolver.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DomainError, DomainResult};
use crate::model::AclEntry;

/// What to do with a stored row whose principal type is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedEntryPolicy {
    /// Drop the row and log a warning.
    #[default]
    Skip,
    /// Fail the whole resolution.
    Abort,
}

impl MalformedEntryPolicy {
    /// Applies the policy to one converted row.
    ///
    /// Returns `Ok(None)` for a skipped row. Errors other than
    /// `MalformedEntry` always propagate.
    pub fn apply(self, entry: DomainResult<AclEntry>) -> DomainResult<Option<AclEntry>> {
        match (self, entry) {
            (_, Ok(entry)) => Ok(Some(entry)),
            (
                MalformedEntryPolicy::Skip,
                Err(DomainError::MalformedEntry {
                    acl_id,
                    principal_type,
                }),
            ) => {
                warn!(acl_id, principal_type, "skipping acl row with unknown principal type");
                Ok(None)
            }
            (_, Err(e)) => Err(e),
        }
    }

    /// Parses a policy name as used in configuration files.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "skip" => Some(MalformedEntryPolicy::Skip),
            "abort" => Some(MalformedEntryPolicy::Abort),
            _ => None,
        }
    }
}

/// Configuration for the ACL tree resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum node depth below the resolution root.
    pub max_depth: u32,
    /// Timeout for a whole resolution run.
    pub timeout: Duration,
    /// Handling of rows with an unknown principal type.
    pub malformed_entries: MalformedEntryPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            timeout: Duration::from_secs(30),
            malformed_entries: MalformedEntryPolicy::Skip,
        }
    }
}

impl ResolverConfig {
    /// Creates a new configuration with the specified max depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Creates a new configuration with the specified timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a new configuration with the specified malformed-row policy.
    pub fn with_malformed_entries(mut self, policy: MalformedEntryPolicy) -> Self {
        self.malformed_entries = policy;
        self
    }
}
