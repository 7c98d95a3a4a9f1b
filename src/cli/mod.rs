//! CLI command definitions and handlers

use clap::{ArgGroup, Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod completions;
pub mod context;
pub mod group;
pub mod http;
pub mod init;
pub mod status;
pub mod user;

pub use context::CommandContext;

/// dirq - CLI companion for querying your organization's directory service
#[derive(Parser, Debug)]
#[command(name = "dirq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "DIRQ_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "DIRQ_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Override the directory API host (development/testing)
    #[arg(long, global = true, env = "DIRQ_GRAPH_HOST", hide = true)]
    pub graph_host: Option<String>,

    /// Override the token endpoint host (development/testing)
    #[arg(long, global = true, env = "DIRQ_LOGIN_HOST", hide = true)]
    pub login_host: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize dirq configuration
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Fetch user details from the directory
    GetUser(GetUserArgs),

    /// Interact with directory groups
    #[command(subcommand)]
    GetGroup(GroupCommands),

    /// Make an HTTP request and display the result
    HttpRequest(HttpRequestArgs),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the get-user command.
///
/// Exactly one of the three identifying flags selects the user.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("identity")
        .required(true)
        .multiple(false)
        .args(["networkid", "email", "name"])
))]
pub struct GetUserArgs {
    /// The network id (on-premises account name) of the user
    #[arg(long)]
    pub networkid: Option<String>,

    /// The email (principal name) of the user
    #[arg(long)]
    pub email: Option<String>,

    /// The full display name of the user
    #[arg(long)]
    pub name: Option<String>,

    /// Include groups the user belongs to
    #[arg(long)]
    pub includegroup: bool,

    /// Filter groups by a specific name fragment
    #[arg(long)]
    pub groupfragment: Option<String>,

    /// Directory to export user details and groups to
    #[arg(long)]
    pub export: Option<String>,
}

/// Group subcommands
#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Search for groups by partial name
    Search {
        /// Partial or start of the group name to search
        #[arg(long)]
        name: String,
    },

    /// List members of a given group
    Members {
        /// The name of the group
        #[arg(long)]
        group: String,

        /// Directory to export members to as a CSV file
        #[arg(long)]
        csv: Option<String>,
    },
}

/// Arguments for the http-request command
#[derive(Args, Debug)]
pub struct HttpRequestArgs {
    /// The HTTP method to use (GET, POST, PUT, DELETE)
    #[arg(long)]
    pub method: String,

    /// The URL to send the request to
    #[arg(long)]
    pub url: String,

    /// Optional headers in 'Key:Value' format
    #[arg(long)]
    pub headers: Vec<String>,

    /// Optional JSON body for POST/PUT requests
    #[arg(long)]
    pub body: Option<String>,
}

/// Global CLI options passed to all command handlers.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Custom config file path (defaults to ~/.dirq/config.yaml)
    pub config: Option<String>,

    /// Directory API host override
    pub graph_host: Option<String>,

    /// Token endpoint host override
    pub login_host: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            graph_host: cli.graph_host.clone(),
            login_host: cli.login_host.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}
