//! Command execution context
//!
//! Bundles config loading, credential validation and client construction so
//! individual command handlers stay free of wiring boilerplate.

use crate::cli::GlobalOptions;
use crate::client::GraphClient;
use crate::config::Config;
use crate::error::Result;

/// Context for command execution containing config and the API client.
///
/// Each invocation constructs its own context and drops it on exit; nothing
/// is shared between commands.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Directory API client (token acquired lazily on first request)
    pub client: GraphClient,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// Loads config from the override path or the default location,
    /// validates that the credential triple is present, and builds the
    /// client with any host overrides applied.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        config.validate_auth()?;

        let client = GraphClient::from_config(
            &config,
            opts.graph_host.as_deref(),
            opts.login_host.as_deref(),
        )?;

        Ok(Self { config, client })
    }
}
