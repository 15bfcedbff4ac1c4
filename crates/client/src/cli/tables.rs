//! Table CLI commands.

use clap::{Parser, Subcommand};

/// Table provisioning commands.
#[derive(Debug, Parser)]
pub struct TablesCommand {
    #[command(subcommand)]
    pub action: TablesAction,
}

/// Available table actions.
#[derive(Debug, Subcommand)]
pub enum TablesAction {
    /// List the entities declared in the schema file.
    List,
    /// Show the create-table request for one entity or all of them.
    Plan {
        /// Entity name; every entity when omitted.
        entity: Option<String>,
    },
    /// Create missing tables, leaving existing ones alone.
    Ensure {
        /// Entity name; every entity when omitted.
        entity: Option<String>,
        /// Show what would be created without calling DynamoDB.
        #[arg(long)]
        dry_run: bool,
    },
    /// Create the table of one entity, failing if it exists.
    Create {
        /// Entity name.
        entity: String,
    },
}
