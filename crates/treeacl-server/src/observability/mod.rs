//! Observability infrastructure for treeacl.
//!
//! Structured logging setup on top of `tracing-subscriber`.

mod logging;

pub use logging::{create_json_layer, init_logging, parse_log_level, LoggingConfig};
