use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "collectctl",
    version,
    about = "admin client for the volunteers/collects API",
    long_about = "Collectctl is a terminal admin client for a volunteers/collects REST API.\n\nExamples:\n  collectctl -a http://127.0.0.1:3000 volunteers list\n  collectctl volunteers list -q lyon -s points -o desc\n  collectctl collects inc 2\n\nWhen the API is unreachable, reads fall back to a built-in demo dataset and\nwrites are applied to the local list only.\n\nTip: Use --config to persist connection settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'a',
        long = "api",
        visible_alias = "api-url",
        value_name = "URL",
        help_heading = "Connection",
        help = "Base URL of the REST API."
    )]
    pub api_url: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Connection",
        help = "Path to config file (defaults to ~/.collectctl/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'U',
        long = "user",
        visible_alias = "username",
        value_name = "NAME",
        help_heading = "Auth",
        help = "Login username."
    )]
    pub username: Option<String>,

    #[arg(
        short = 'P',
        long = "pass",
        visible_alias = "password",
        value_name = "SECRET",
        help_heading = "Auth",
        help = "Login password."
    )]
    pub password: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Connection",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Verify credentials and print the logged-in identity
    Login,
    /// Manage the volunteers collection
    Volunteers {
        #[command(subcommand)]
        action: VolunteerAction,
    },
    /// Manage the collects collection
    Collects {
        #[command(subcommand)]
        action: CollectAction,
    },
}

/// Shared filter/sort controls for the list views.
#[derive(Args, Debug, Clone, Default)]
pub struct ListOpts {
    #[arg(
        short = 'q',
        long = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive substring search."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'l',
        long = "location",
        value_name = "NAME",
        help_heading = "Filters",
        help = "Exact location match (case-insensitive)."
    )]
    pub location: Option<String>,

    #[arg(
        long = "from",
        value_name = "DATE",
        help_heading = "Filters",
        help = "Inclusive lower date bound, YYYY-MM-DD."
    )]
    pub from: Option<String>,

    #[arg(
        long = "to",
        value_name = "DATE",
        help_heading = "Filters",
        help = "Inclusive upper date bound, YYYY-MM-DD."
    )]
    pub to: Option<String>,

    #[arg(
        short = 's',
        long = "sort-by",
        value_name = "KEY",
        help_heading = "Sorting",
        help = "Sort key (volunteers: name|location|points|date; collects: item|location|quantity|date)."
    )]
    pub sort_by: Option<String>,

    #[arg(
        short = 'o',
        long = "order",
        value_name = "DIR",
        help_heading = "Sorting",
        help = "Sort direction, asc or desc (default desc)."
    )]
    pub order: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum VolunteerAction {
    /// List volunteers with optional filters
    List {
        #[command(flatten)]
        opts: ListOpts,
    },
    /// Add a volunteer
    Add {
        #[arg(long, value_name = "NAME")]
        firstname: String,
        #[arg(long, value_name = "NAME")]
        lastname: String,
        #[arg(long, value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "SECRET")]
        password: Option<String>,
        #[arg(long, value_name = "NAME")]
        location: Option<String>,
        #[arg(long, value_name = "N", default_value_t = 0)]
        points: i64,
    },
    /// Update fields of an existing volunteer
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long, value_name = "NAME")]
        firstname: Option<String>,
        #[arg(long, value_name = "NAME")]
        lastname: Option<String>,
        #[arg(long, value_name = "NAME")]
        username: Option<String>,
        #[arg(long, value_name = "SECRET")]
        password: Option<String>,
        #[arg(long, value_name = "NAME")]
        location: Option<String>,
        #[arg(long, value_name = "N")]
        points: Option<i64>,
    },
    /// Delete a volunteer
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CollectAction {
    /// List collects with optional filters
    List {
        #[command(flatten)]
        opts: ListOpts,
    },
    /// Add a collect
    Add {
        #[arg(long, value_name = "NAME")]
        item: String,
        #[arg(long, value_name = "N", default_value_t = 0)]
        quantity: i64,
        #[arg(long, value_name = "NAME")]
        location: Option<String>,
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
    /// Update fields of an existing collect
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long, value_name = "NAME")]
        item: Option<String>,
        #[arg(long, value_name = "N")]
        quantity: Option<i64>,
        #[arg(long, value_name = "NAME")]
        location: Option<String>,
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },
    /// Increment the quantity of a collect by one
    Inc {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Decrement the quantity of a collect by one (refused below zero)
    Dec {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Delete a collect
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}
