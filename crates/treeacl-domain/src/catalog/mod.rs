//! Principal catalog.
//!
//! Lists every user or group that holds at least one ACL entry anywhere
//! in the tree. The catalog feeds two things: the filter selector (which
//! principals the caller wants to look at) and the seeding candidates of
//! a resolution run (always every principal in the catalog).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DomainResult;
use crate::model::{AclEntry, ObjectId, PrincipalSet, PrincipalType};
use crate::resolver::AclReader;

/// One selectable principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalOption {
    pub object_id: ObjectId,
    /// Representative entry for the principal (the one with the highest id).
    pub entry: AclEntry,
    /// Whether the principal is part of the current selection.
    pub selected: bool,
}

/// All principals of one type that have ACL entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalCatalog {
    principal_type: PrincipalType,
    options: Vec<PrincipalOption>,
}

impl PrincipalCatalog {
    /// Loads the catalog for one principal type and marks the principals
    /// contained in `selection`.
    pub async fn load<A>(
        reader: &A,
        principal_type: PrincipalType,
        selection: &PrincipalSet,
    ) -> DomainResult<Self>
    where
        A: AclReader + ?Sized,
    {
        let entries = reader.find_by_type(principal_type).await?;
        Ok(Self::from_entries(principal_type, entries, selection))
    }

    /// Builds a catalog from already fetched entries. Entries of other
    /// principal types are ignored.
    pub fn from_entries(
        principal_type: PrincipalType,
        entries: impl IntoIterator<Item = AclEntry>,
        selection: &PrincipalSet,
    ) -> Self {
        let mut by_object: BTreeMap<ObjectId, AclEntry> = BTreeMap::new();
        for entry in entries
            .into_iter()
            .filter(|e| e.principal_type == principal_type)
        {
            by_object
                .entry(entry.object_id)
                .and_modify(|current| {
                    if entry.id > current.id {
                        *current = entry;
                    }
                })
                .or_insert(entry);
        }

        let options = by_object
            .into_iter()
            .map(|(object_id, entry)| PrincipalOption {
                object_id,
                entry,
                selected: selection.contains(principal_type, object_id),
            })
            .collect();

        Self {
            principal_type,
            options,
        }
    }

    pub fn principal_type(&self) -> PrincipalType {
        self.principal_type
    }

    /// Every option, ordered by object id.
    pub fn options(&self) -> &[PrincipalOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Object ids of every principal in the catalog.
    pub fn candidates(&self) -> Vec<ObjectId> {
        self.options.iter().map(|o| o.object_id).collect()
    }

    /// Options to display. With the filter selector enabled only the
    /// selected ones are shown.
    pub fn visible(&self, filter_enabled: bool) -> Vec<&PrincipalOption> {
        self.options
            .iter()
            .filter(|o| !filter_enabled || o.selected)
            .collect()
    }
}

/// Seeding candidates covering both catalogs.
pub fn candidates_of(users: &PrincipalCatalog, groups: &PrincipalCatalog) -> PrincipalSet {
    PrincipalSet::new(users.candidates(), groups.candidates())
}
