//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::client::GraphClient;
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the app registration's credential triple, verifies it with a
/// live token exchange and saves the configuration.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to dirq!".bold().green());
    println!("Let's set up your directory credentials.\n");

    let theme = ColorfulTheme::default();

    let tenant_id: String = Input::with_theme(&theme)
        .with_prompt("Tenant id")
        .interact_text()?;

    let client_id: String = Input::with_theme(&theme)
        .with_prompt("Client id")
        .interact_text()?;

    let client_secret: String = Password::with_theme(&theme)
        .with_prompt("Client secret")
        .interact()?;

    // Preserve any existing host overrides in the config file
    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();
    config.tenant_id = Some(tenant_id);
    config.client_id = Some(client_id);
    config.client_secret = Some(client_secret);

    println!("\n{}", "Verifying credentials...".cyan());
    let client = GraphClient::from_config(
        &config,
        opts.graph_host.as_deref(),
        opts.login_host.as_deref(),
    )?;
    client.verify_credentials().await?;
    println!("{}", "✓ Credentials verified".green());

    config.save_at(opts.config_ref())?;
    println!(
        "{} {}",
        "Configuration saved to".green(),
        Config::resolve_path(opts.config_ref())?.display()
    );

    Ok(())
}
