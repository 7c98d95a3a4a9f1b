//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "dirq Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());

    match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            println!();

            match config.tenant_id.as_deref() {
                Some(tenant) if !tenant.is_empty() => {
                    println!("{} Tenant id: {}", "✓".green(), tenant)
                }
                _ => println!("{} Tenant id not configured", "✗".red()),
            }

            match config.client_id.as_deref() {
                Some(client) if !client.is_empty() => {
                    println!("{} Client id: {}", "✓".green(), client)
                }
                _ => println!("{} Client id not configured", "✗".red()),
            }

            if config.client_secret.as_deref().is_some_and(|s| !s.is_empty()) {
                println!("{} Client secret configured", "✓".green());
            } else {
                println!("{} Client secret not configured", "✗".red());
            }

            if let Some(host) = config.graph_host.as_deref() {
                println!("  Directory host override: {}", host.dimmed());
            }
            if let Some(host) = config.login_host.as_deref() {
                println!("  Login host override: {}", host.dimmed());
            }

            println!();
            if config.validate_auth().is_ok() {
                println!("{} Ready to query the directory", "✓".green());
            } else {
                println!("  → Run 'dirq init' to complete setup");
            }
        }
        Err(_) => {
            println!("{} No configuration found", "✗".red());
            println!("  → Run 'dirq init' to configure");
        }
    }

    Ok(())
}
