//! DataStore trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// A stored page tree node.
///
/// `pid` is the uid of the parent page; `0` marks a page at the tree root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPage {
    pub uid: u64,
    #[serde(default)]
    pub pid: u64,
    #[serde(default)]
    pub title: String,
    /// Sort order among siblings.
    #[serde(default)]
    pub sorting: i64,
    /// Soft-delete flag. Deleted pages are hidden from child listings.
    #[serde(default)]
    pub deleted: bool,
}

impl StoredPage {
    /// Creates a visible page with the given parent.
    pub fn new(uid: u64, pid: u64, title: impl Into<String>) -> Self {
        Self {
            uid,
            pid,
            title: title.into(),
            sorting: 0,
            deleted: false,
        }
    }

    /// Sets the sibling sort order.
    pub fn with_sorting(mut self, sorting: i64) -> Self {
        self.sorting = sorting;
        self
    }

    /// Marks the page as soft-deleted.
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

/// A raw ACL row as persisted.
///
/// `principal_type` is kept as the raw stored integer; interpreting it
/// is left to the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAcl {
    pub uid: u64,
    /// Page the row is attached to.
    pub pid: u64,
    #[serde(rename = "type")]
    pub principal_type: i64,
    pub object_id: u64,
    pub permissions: u32,
    #[serde(default)]
    pub recursive: bool,
}

impl StoredAcl {
    /// Creates a new ACL row.
    pub fn new(
        uid: u64,
        pid: u64,
        principal_type: i64,
        object_id: u64,
        permissions: u32,
        recursive: bool,
    ) -> Self {
        Self {
            uid,
            pid,
            principal_type,
            object_id,
            permissions,
            recursive,
        }
    }
}

/// Filter for reading ACL rows. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclFilter {
    /// Filter by attached page.
    pub pid: Option<u64>,
    /// Filter by raw principal type.
    pub principal_type: Option<i64>,
    /// Filter by recursive flag.
    pub recursive: Option<bool>,
}

impl AclFilter {
    /// Rows attached to `pid`.
    pub fn by_page(pid: u64) -> Self {
        Self {
            pid: Some(pid),
            ..Self::default()
        }
    }

    /// Rows of the given raw principal type.
    pub fn by_type(principal_type: i64) -> Self {
        Self {
            principal_type: Some(principal_type),
            ..Self::default()
        }
    }

    /// Recursive rows attached to `pid`.
    pub fn recursive_on_page(pid: u64) -> Self {
        Self {
            pid: Some(pid),
            recursive: Some(true),
            ..Self::default()
        }
    }

    /// Returns true if the row passes every set criterion.
    pub fn matches(&self, acl: &StoredAcl) -> bool {
        self.pid.map_or(true, |pid| acl.pid == pid)
            && self
                .principal_type
                .map_or(true, |t| acl.principal_type == t)
            && self.recursive.map_or(true, |r| acl.recursive == r)
    }
}

/// Validates a page before it is written.
pub fn validate_page(page: &StoredPage) -> StorageResult<()> {
    if page.uid == 0 {
        return Err(StorageError::InvalidInput {
            message: "page uid must be greater than 0".to_string(),
        });
    }
    if page.uid == page.pid {
        return Err(StorageError::InvalidInput {
            message: format!("page {} cannot be its own parent", page.uid),
        });
    }
    Ok(())
}

/// Validates an ACL row before it is written.
///
/// The principal type is deliberately not checked here: rows written by
/// other tools may carry values this crate does not know about.
pub fn validate_acl(acl: &StoredAcl) -> StorageResult<()> {
    if acl.uid == 0 {
        return Err(StorageError::InvalidInput {
            message: "acl uid must be greater than 0".to_string(),
        });
    }
    if acl.pid == 0 {
        return Err(StorageError::InvalidInput {
            message: format!("acl {} must be attached to a page", acl.uid),
        });
    }
    Ok(())
}

/// Abstract storage interface for page trees and ACL rows.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    // Page operations

    /// Inserts or replaces pages.
    async fn write_pages(&self, pages: Vec<StoredPage>) -> StorageResult<()>;

    /// Gets a page by uid, including soft-deleted pages.
    async fn get_page(&self, uid: u64) -> StorageResult<StoredPage>;

    /// Lists the non-deleted children of a page, ordered by `sorting`
    /// then `uid`.
    async fn list_child_pages(&self, pid: u64) -> StorageResult<Vec<StoredPage>>;

    /// Returns the ancestors of a page ordered from the tree root down to
    /// the page's immediate parent. The page itself is not included.
    async fn root_line(&self, uid: u64) -> StorageResult<Vec<StoredPage>>;

    // ACL operations

    /// Inserts or replaces ACL rows.
    async fn write_acls(&self, acls: Vec<StoredAcl>) -> StorageResult<()>;

    /// Reads ACL rows matching the filter, ordered by `uid`.
    async fn read_acls(&self, filter: &AclFilter) -> StorageResult<Vec<StoredAcl>>;
}
