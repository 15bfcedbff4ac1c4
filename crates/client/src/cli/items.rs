//! Item CLI commands.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dynamap::SortOrder;

/// Item commands.
#[derive(Debug, Parser)]
pub struct ItemsCommand {
    #[command(subcommand)]
    pub action: ItemsAction,
}

/// Primary key of a single item.
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Entity name.
    pub entity: String,
    /// Partition key value.
    pub partition_key: String,
    /// Sort key value, for entities that declare one.
    pub sort_key: Option<String>,
}

/// Available item actions.
#[derive(Debug, Subcommand)]
pub enum ItemsAction {
    /// Get an item by key.
    Get(KeyArgs),
    /// Query items sharing a partition key.
    Query(QueryArgs),
    /// Write an item, replacing any item with the same key.
    Put {
        /// Entity name.
        entity: String,
        /// Item as a JSON object.
        #[arg(long)]
        item: String,
    },
    /// Delete an item by key.
    Delete(KeyArgs),
    /// Copy fields of a JSON object onto the stored item.
    Update {
        /// Entity name.
        entity: String,
        /// Item as a JSON object, including its key fields.
        #[arg(long)]
        item: String,
        /// Only update these fields (repeatable).
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Atomically add to a numeric field.
    Increment {
        #[command(flatten)]
        key: KeyArgs,
        /// Field to increment.
        #[arg(long)]
        field: String,
        /// Amount to add.
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        by: i64,
    },
}

/// Range query arguments.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Entity name.
    pub entity: String,
    /// Partition key value (of the index when --index is given).
    pub partition_key: String,
    /// Query a secondary index instead of the table.
    #[arg(long)]
    pub index: Option<String>,
    /// Sort key greater than.
    #[arg(long, group = "sort")]
    pub gt: Option<String>,
    /// Sort key less than.
    #[arg(long, group = "sort")]
    pub lt: Option<String>,
    /// Sort key starts with.
    #[arg(long, group = "sort")]
    pub begins_with: Option<String>,
    /// Sort key between two values, inclusive.
    #[arg(long, group = "sort", num_args = 2, value_names = ["LOW", "HIGH"])]
    pub between: Option<Vec<String>>,
    /// Sort key hint: "ASC" selects keys after "ASC", anything else keys before it.
    #[arg(long, group = "sort")]
    pub sort_key: Option<String>,
    /// Result order.
    #[arg(long, value_enum, default_value = "asc")]
    pub order: Order,
    /// Page size.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Cursor returned by a previous page.
    #[arg(long)]
    pub next_page: Option<String>,
    /// Follow cursors until the range is exhausted.
    #[arg(long, conflicts_with = "next_page")]
    pub all: bool,
}

/// Query result order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Asc,
            Order::Desc => SortOrder::Desc,
        }
    }
}
