//! ACL inheritance resolution.
//!
//! The resolver computes, for every node of a page subtree, which ACL
//! entry wins for each principal:
//!
//! 1. `seeder` reads the recursive entries on the root line of the
//!    requested node and keeps the root-most match per candidate
//!    principal.
//! 2. `tree_walker` walks the subtree depth-first, merging each node's own
//!    entries into the state inherited from its parent and recording the
//!    per-type counts shown next to each node.
//!
//! Storage is reached only through the [`AclReader`] and
//! [`PageTreeReader`] traits.

mod config;
mod context;
mod seeder;
mod traits;
mod tree_walker;
mod types;

#[cfg(test)]
mod tests;

pub use config::{MalformedEntryPolicy, ResolverConfig};
pub use seeder::RootLineSeeder;
pub use traits::{AclReader, PageTreeReader};
pub use tree_walker::AclTreeResolver;
pub use types::ResolvedTree;
