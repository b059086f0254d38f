//! ACL record types and resolved state.
//!
//! This module contains:
//! - Raw record types (PrincipalType, AclEntry)
//! - Resolved per-node state (GrantSet, AclMeta, EffectiveAclState)
//! - Principal sets used for candidates and filter selections

mod state;
mod types;

pub use state::*;
pub use types::*;
