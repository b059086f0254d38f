//! Core type definitions for ACL records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a page tree node.
pub type NodeId = u64;

/// Identifier of a user or group, interpreted per [`PrincipalType`].
pub type ObjectId = u64;

/// Identifier of a stored ACL record.
pub type AclId = u64;

/// The namespace an ACL's object id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    User,
    Group,
}

impl PrincipalType {
    /// Every principal type, in storage order.
    pub const ALL: [PrincipalType; 2] = [PrincipalType::User, PrincipalType::Group];

    /// Returns the integer used for this type in storage rows.
    pub fn as_raw(self) -> i64 {
        match self {
            PrincipalType::User => 0,
            PrincipalType::Group => 1,
        }
    }

    /// Parses a stored integer. Returns `None` for unknown values.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(PrincipalType::User),
            1 => Some(PrincipalType::Group),
            _ => None,
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalType::User => f.write_str("user"),
            PrincipalType::Group => f.write_str("group"),
        }
    }
}

/// A single grant record attached to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub id: AclId,
    /// The node the entry was created on.
    pub node_id: NodeId,
    pub principal_type: PrincipalType,
    pub object_id: ObjectId,
    /// Opaque bitmask; meaning is defined by the caller.
    pub permissions: u32,
    /// Whether descendants inherit this entry.
    pub recursive: bool,
}

impl AclEntry {
    /// Creates a new entry.
    pub fn new(
        id: AclId,
        node_id: NodeId,
        principal_type: PrincipalType,
        object_id: ObjectId,
        permissions: u32,
        recursive: bool,
    ) -> Self {
        Self {
            id,
            node_id,
            principal_type,
            object_id,
            permissions,
            recursive,
        }
    }

    /// Builds an entry from a storage row, validating the raw principal type.
    pub fn from_raw(
        id: AclId,
        node_id: NodeId,
        raw_type: i64,
        object_id: ObjectId,
        permissions: u32,
        recursive: bool,
    ) -> DomainResult<Self> {
        let principal_type =
            PrincipalType::from_raw(raw_type).ok_or(DomainError::MalformedEntry {
                acl_id: id,
                principal_type: raw_type,
            })?;
        Ok(Self::new(
            id,
            node_id,
            principal_type,
            object_id,
            permissions,
            recursive,
        ))
    }

    /// The principal this entry grants to.
    pub fn principal(&self) -> (PrincipalType, ObjectId) {
        (self.principal_type, self.object_id)
    }

    /// The data recorded for this entry in a resolved state.
    pub fn grant(&self) -> AclGrant {
        AclGrant {
            uid: self.id,
            permissions: self.permissions,
            recursive: self.recursive,
            origin: self.node_id,
        }
    }
}

/// The winning entry for one principal in a resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrant {
    /// Id of the entry that produced this grant.
    pub uid: AclId,
    pub permissions: u32,
    pub recursive: bool,
    /// Node the entry is attached to.
    pub origin: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_type_raw_mapping() {
        for t in PrincipalType::ALL {
            assert_eq!(PrincipalType::from_raw(t.as_raw()), Some(t));
        }
        assert_eq!(PrincipalType::from_raw(2), None);
        assert_eq!(PrincipalType::from_raw(-1), None);
    }

    #[test]
    fn test_from_raw_rejects_unknown_type() {
        let err = AclEntry::from_raw(7, 1, 5, 100, 31, true).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MalformedEntry {
                acl_id: 7,
                principal_type: 5
            }
        ));
    }

    #[test]
    fn test_grant_carries_origin_node() {
        let entry = AclEntry::new(3, 12, PrincipalType::Group, 8, 16, true);
        let grant = entry.grant();
        assert_eq!(grant.uid, 3);
        assert_eq!(grant.origin, 12);
        assert_eq!(grant.permissions, 16);
        assert!(grant.recursive);
    }

    #[test]
    fn test_principal_type_serializes_lowercase() {
        let json = serde_json::to_string(&PrincipalType::Group).unwrap();
        assert_eq!(json, "\"group\"");
    }
}
