//! Tests for the resolver module.
//!
//! Organized by functionality:
//! - Root-line seeding
//! - Inheritance and override resolution
//! - Safety features (depth limiting, cycle detection, timeouts)
//! - Property tests over generated trees
