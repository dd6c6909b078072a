pub mod alias;
pub mod config;
pub mod demo;
pub mod edit;
pub mod lint;
pub mod report;
pub mod show;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "purse", about = "Personal ledger manager for a flat CSV file.")]
pub struct Cli {
    /// Ledger file to use instead of the configured profile
    #[arg(long, global = true, value_name = "PATH")]
    pub profile: Option<String>,

    /// Print debug logs to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the ledger for formatting and consistency problems.
    Lint {
        /// List every rule with its severity and exit.
        #[arg(long)]
        rules: bool,
        /// Report errors without failing.
        #[arg(long = "no-errors")]
        no_errors: bool,
        /// Skip the income/expense sign warnings.
        #[arg(long = "no-warnings")]
        no_warnings: bool,
        /// Skip the duplicate item check.
        #[arg(long = "no-unique-errors")]
        no_unique_errors: bool,
    },
    /// Show items as a table, raw lines, or grouped totals.
    Show(ShowArgs),
    /// Open the ledger in $EDITOR.
    Edit {
        /// Re-sort the ledger by date instead of opening the editor.
        #[arg(long)]
        sort: bool,
    },
    /// Print the settings, or open the settings file in $EDITOR.
    Config {
        #[arg(long)]
        edit: bool,
    },
    /// Generate demo data.
    Demo(DemoArgs),
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print the version.
    Version,
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Case-insensitive regex over date, category, method, description and
    /// notes. `2025-q3` style tokens match a whole quarter.
    pub query: Option<String>,

    /// Only items paid with this method
    #[arg(long)]
    pub method: Option<String>,

    /// Sort key: date, category, amount, method, description, notes or items.
    /// A trailing `-` reverses the order.
    #[arg(long, value_name = "KEY")]
    pub sort: Option<String>,

    /// Print the header and matching lines exactly as stored.
    #[arg(long, conflicts_with_all = ["summary", "by_category", "summary_with_items"])]
    pub raw: bool,

    /// Totals per group (default group: category).
    #[arg(
        long,
        value_name = "GROUP",
        num_args = 0..=1,
        default_missing_value = "category",
        conflicts_with = "summary_with_items"
    )]
    pub summary: Option<String>,

    /// Shorthand for `--summary category`.
    #[arg(short = 'm', conflicts_with_all = ["summary", "summary_with_items"])]
    pub by_category: bool,

    /// Totals per group followed by each group's items.
    #[arg(
        long = "summary-with-items",
        value_name = "GROUP",
        num_args = 0..=1,
        default_missing_value = "category"
    )]
    pub summary_with_items: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct DemoArgs {
    /// Write the demo ledger to the profile path.
    #[arg(long)]
    pub init: bool,
    /// Print the demo ledger.
    #[arg(long)]
    pub items: bool,
    /// Print the demo categories.
    #[arg(long)]
    pub categories: bool,
    /// Write N random items to `<profile>-N`.
    #[arg(long, value_name = "N")]
    pub benchmark: Option<usize>,
    /// Use 2024 and 2025 instead of last year and this year.
    #[arg(long = "no-dynamic-years")]
    pub no_dynamic_years: bool,
}
