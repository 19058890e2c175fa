use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pulse", author, version, about = "Employee feedback admin dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every listing command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive text to look for
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// Sort key (name, date, progress, responses, usage, last_used); defaults to the stored preference
    #[arg(long)]
    pub sort: Option<String>,
    /// Flip the sort direction
    #[arg(short, long)]
    pub reverse: bool,
    /// Print the view as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects
    Projects {
        #[command(flatten)]
        list: ListArgs,
        /// planning, active, completed, delayed, cancelled, upcoming or all
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// List feedback campaigns
    Feedback {
        #[command(flatten)]
        list: ListArgs,
        /// upcoming, active, completed or all
        #[arg(long, default_value = "all")]
        status: String,
        /// high, medium, low or all
        #[arg(long, default_value = "all")]
        priority: String,
        /// positive, neutral, negative or all
        #[arg(long, default_value = "all")]
        sentiment: String,
        #[arg(long, default_value = "all")]
        category: String,
        /// Project name, or all
        #[arg(long, default_value = "all")]
        project: String,
    },
    /// List survey questions
    Questions {
        #[command(flatten)]
        list: ListArgs,
        /// text, multiple_choice, sentiment, rating, single_choice or all
        #[arg(long = "type", default_value = "all")]
        kind: String,
        #[arg(long, default_value = "all")]
        category: String,
        /// yes, no or all
        #[arg(long, default_value = "all")]
        required: String,
    },
    /// Totals per status, sentiment and question type
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Set a preference
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Show a preference
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// List all preferences
    ConfigList,
    /// Restore a preference to its default
    ConfigDelete {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Launch TUI interface
    Tui,
    /// Print shell completions
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}
