use clap::{Parser, Subcommand};
use curate::schema::EntityKind;

#[derive(Parser, Debug)]
#[command(name = "curate")]
#[command(about = "Edit ordered content collections from the command line", long_about = None)]
#[command(version = super::version_string())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the user-wide store instead of ./.curate
    #[arg(short, long, global = true)]
    pub global: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the store directory and a default config
    Init,

    /// Show collection kinds and their field rules
    Kinds,

    /// List records of a collection
    #[command(alias = "ls")]
    List {
        /// Collection kind (faq, product, pricing-plan, ...)
        kind: EntityKind,

        /// Only show records matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Extra pages to load
        #[arg(short, long, default_value_t = 0)]
        more: usize,

        /// List the records nested under this parent (id or temp key)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Add a record: curate add faq question="..." answer="..."
    #[command(alias = "n")]
    Add {
        kind: EntityKind,

        /// Field assignments (field=value); order=N inserts at position N
        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,

        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Change fields of a record
    #[command(alias = "e")]
    Edit {
        kind: EntityKind,

        /// Record locator (42, temp-<key> or @3)
        locator: String,

        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,

        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete one or more records (and anything nested under them)
    #[command(alias = "rm")]
    Delete {
        kind: EntityKind,

        /// Record locators (e.g. 42 @1 @3-@5)
        #[arg(required = true, num_args = 1..)]
        locators: Vec<String>,

        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Move a record to a new position within its list
    #[command(alias = "mv")]
    Move {
        kind: EntityKind,

        locator: String,

        /// Target position, 1-based (plain number or @N)
        to: String,

        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Flip a boolean field (e.g. display_home_page)
    Toggle {
        kind: EntityKind,

        locator: String,

        field: String,

        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Record the persisted id for a pending (temp-) record
    Assign {
        kind: EntityKind,

        /// Pending key (temp-<key>)
        pending: String,

        /// Persisted id
        id: u64,
    },
}
