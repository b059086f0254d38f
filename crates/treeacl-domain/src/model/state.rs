//! Resolved per-node ACL state.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::types::{AclGrant, ObjectId, PrincipalType};

/// Grants keyed by principal, one map per principal type.
///
/// Holds at most one grant per (type, object id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrantSet {
    #[serde(rename = "user")]
    users: BTreeMap<ObjectId, AclGrant>,
    #[serde(rename = "group")]
    groups: BTreeMap<ObjectId, AclGrant>,
}

impl GrantSet {
    /// Creates an empty grant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All grants of one principal type.
    pub fn of(&self, principal_type: PrincipalType) -> &BTreeMap<ObjectId, AclGrant> {
        match principal_type {
            PrincipalType::User => &self.users,
            PrincipalType::Group => &self.groups,
        }
    }

    fn of_mut(&mut self, principal_type: PrincipalType) -> &mut BTreeMap<ObjectId, AclGrant> {
        match principal_type {
            PrincipalType::User => &mut self.users,
            PrincipalType::Group => &mut self.groups,
        }
    }

    pub fn get(&self, principal_type: PrincipalType, object_id: ObjectId) -> Option<&AclGrant> {
        self.of(principal_type).get(&object_id)
    }

    pub fn contains(&self, principal_type: PrincipalType, object_id: ObjectId) -> bool {
        self.of(principal_type).contains_key(&object_id)
    }

    /// Sets the grant for a principal, returning the one it replaced.
    pub fn insert(
        &mut self,
        principal_type: PrincipalType,
        object_id: ObjectId,
        grant: AclGrant,
    ) -> Option<AclGrant> {
        self.of_mut(principal_type).insert(object_id, grant)
    }

    /// Number of principals of one type.
    pub fn len(&self, principal_type: PrincipalType) -> usize {
        self.of(principal_type).len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }

    /// Iterates over every grant, users first, each type ordered by object id.
    pub fn iter(&self) -> impl Iterator<Item = (PrincipalType, ObjectId, &AclGrant)> {
        PrincipalType::ALL.into_iter().flat_map(move |t| {
            self.of(t)
                .iter()
                .map(move |(object_id, grant)| (t, *object_id, grant))
        })
    }
}

/// Summary counts for one principal type at one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeMeta {
    /// Raw ACL rows processed at the node, overridden ones included.
    pub direct_count: usize,
    /// Principals present in the state inherited from the parent.
    pub inherited_count: usize,
}

/// Summary counts per principal type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AclMeta {
    pub user: TypeMeta,
    pub group: TypeMeta,
}

impl AclMeta {
    pub fn get(&self, principal_type: PrincipalType) -> &TypeMeta {
        match principal_type {
            PrincipalType::User => &self.user,
            PrincipalType::Group => &self.group,
        }
    }

    pub fn get_mut(&mut self, principal_type: PrincipalType) -> &mut TypeMeta {
        match principal_type {
            PrincipalType::User => &mut self.user,
            PrincipalType::Group => &mut self.group,
        }
    }
}

/// The resolved ACL state of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveAclState {
    pub by_principal: GrantSet,
    pub meta: AclMeta,
}

impl EffectiveAclState {
    pub fn grant(&self, principal_type: PrincipalType, object_id: ObjectId) -> Option<&AclGrant> {
        self.by_principal.get(principal_type, object_id)
    }

    /// Effective permission bits for a principal, if it has a grant here.
    pub fn permissions(&self, principal_type: PrincipalType, object_id: ObjectId) -> Option<u32> {
        self.grant(principal_type, object_id).map(|g| g.permissions)
    }
}

/// A set of principals split by type.
///
/// Used both for the seeding candidates and for filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrincipalSet {
    users: BTreeSet<ObjectId>,
    groups: BTreeSet<ObjectId>,
}

impl PrincipalSet {
    pub fn new(
        users: impl IntoIterator<Item = ObjectId>,
        groups: impl IntoIterator<Item = ObjectId>,
    ) -> Self {
        Self {
            users: users.into_iter().collect(),
            groups: groups.into_iter().collect(),
        }
    }

    pub fn of(&self, principal_type: PrincipalType) -> &BTreeSet<ObjectId> {
        match principal_type {
            PrincipalType::User => &self.users,
            PrincipalType::Group => &self.groups,
        }
    }

    pub fn contains(&self, principal_type: PrincipalType, object_id: ObjectId) -> bool {
        self.of(principal_type).contains(&object_id)
    }

    pub fn insert(&mut self, principal_type: PrincipalType, object_id: ObjectId) -> bool {
        match principal_type {
            PrincipalType::User => self.users.insert(object_id),
            PrincipalType::Group => self.groups.insert(object_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(uid: u64, permissions: u32) -> AclGrant {
        AclGrant {
            uid,
            permissions,
            recursive: false,
            origin: 1,
        }
    }

    #[test]
    fn test_grant_set_keeps_types_apart() {
        let mut set = GrantSet::new();
        set.insert(PrincipalType::User, 5, grant(1, 1));
        set.insert(PrincipalType::Group, 5, grant(2, 16));

        assert_eq!(set.len(PrincipalType::User), 1);
        assert_eq!(set.len(PrincipalType::Group), 1);
        assert_eq!(set.get(PrincipalType::User, 5).unwrap().permissions, 1);
        assert_eq!(set.get(PrincipalType::Group, 5).unwrap().permissions, 16);
    }

    #[test]
    fn test_insert_replaces_existing_grant() {
        let mut set = GrantSet::new();
        assert!(set.insert(PrincipalType::User, 5, grant(1, 1)).is_none());
        let replaced = set.insert(PrincipalType::User, 5, grant(2, 31));

        assert_eq!(replaced.map(|g| g.uid), Some(1));
        assert_eq!(set.len(PrincipalType::User), 1);
    }

    #[test]
    fn test_iter_orders_users_then_groups() {
        let mut set = GrantSet::new();
        set.insert(PrincipalType::Group, 1, grant(1, 1));
        set.insert(PrincipalType::User, 9, grant(2, 1));
        set.insert(PrincipalType::User, 3, grant(3, 1));

        let keys: Vec<(PrincipalType, ObjectId)> = set.iter().map(|(t, o, _)| (t, o)).collect();
        assert_eq!(
            keys,
            vec![
                (PrincipalType::User, 3),
                (PrincipalType::User, 9),
                (PrincipalType::Group, 1)
            ]
        );
    }

    #[test]
    fn test_principal_set_membership() {
        let set = PrincipalSet::new([100, 101], [7]);
        assert!(set.contains(PrincipalType::User, 100));
        assert!(!set.contains(PrincipalType::Group, 100));
        assert!(set.contains(PrincipalType::Group, 7));
    }
}
