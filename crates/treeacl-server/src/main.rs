//! treeacl command-line tool
//!
//! Loads a site fixture, resolves the inherited ACLs below one page and
//! prints the permission overview as JSON.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! treeacl --config treeacl.yaml --fixture site.json --page 1
//!
//! # With environment variables only, selecting two users
//! TREEACL_ACL__ENABLE_FILTER_SELECTOR=true treeacl -f site.json -p 12 --users 3,4
//! ```

use clap::Parser;
use tracing::info;

use treeacl_domain::model::{NodeId, ObjectId, PrincipalSet};
use treeacl_server::fixture::Fixture;
use treeacl_server::observability::{init_logging, LoggingConfig};
use treeacl_server::{PermissionService, ServerConfig};

/// treeacl - inherited page permissions
#[derive(Parser, Debug)]
#[command(name = "treeacl")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the JSON site fixture
    #[arg(short, long)]
    fixture: String,

    /// Page whose subtree is resolved
    #[arg(short, long)]
    page: NodeId,

    /// Selected user ids
    #[arg(long, value_delimiter = ',')]
    users: Vec<ObjectId>,

    /// Selected group ids
    #[arg(long, value_delimiter = ',')]
    groups: Vec<ObjectId>,

    /// Print compact instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = &args.config {
        ServerConfig::load(config_path)?
    } else {
        ServerConfig::from_env()?
    };

    init_logging(LoggingConfig::from_settings(&config.logging));

    info!(version = env!("CARGO_PKG_VERSION"), "Starting treeacl");

    let storage = Fixture::from_path(&args.fixture)?.into_store().await?;
    let service = PermissionService::new(storage, &config);

    let selection = PrincipalSet::new(args.users, args.groups);
    let overview = service.overview(args.page, &selection).await?;

    let json = if args.compact {
        serde_json::to_string(&overview)?
    } else {
        serde_json::to_string_pretty(&overview)?
    };
    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_selection_lists() {
        let args = Args::parse_from([
            "treeacl", "-f", "site.json", "-p", "4", "--users", "1,2", "--groups", "9",
        ]);

        assert_eq!(args.page, 4);
        assert_eq!(args.users, vec![1, 2]);
        assert_eq!(args.groups, vec![9]);
        assert!(args.config.is_none());
        assert!(!args.compact);
    }

    #[test]
    fn test_args_require_page_and_fixture() {
        assert!(Args::try_parse_from(["treeacl", "-p", "1"]).is_err());
        assert!(Args::try_parse_from(["treeacl", "-f", "site.json"]).is_err());
    }
}
