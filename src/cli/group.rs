//! Group search and membership commands

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use indicatif::ProgressBar;
use log::info;

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::DirectoryApi;
use crate::error::Result;
use crate::output::csv;
use crate::output::display::{GroupRow, MemberRow};
use crate::output::table;

/// Run the get-group search command
pub async fn search(name: &str, opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let groups = ctx.client.search_groups_by_name_prefix(name).await?;
    if groups.is_empty() {
        println!("No groups found matching '{name}'.");
        return Ok(());
    }

    let rows: Vec<GroupRow> = groups.iter().map(GroupRow::from).collect();
    println!("{}", table::format_table(&rows));

    Ok(())
}

/// Run the get-group members command
pub async fn members(group_name: &str, csv_dir: Option<&str>, opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let groups = ctx.client.search_groups_by_name_prefix(group_name).await?;
    let Some(group) = groups.into_iter().next() else {
        println!("No groups found with name starting with '{group_name}'.");
        return Ok(());
    };

    let display_name = group.display_name.as_deref().unwrap_or(&group.id);
    info!("Found group: {display_name} ({}). Fetching members...", group.id);

    // Each member costs a detail fetch plus a manager lookup, so large
    // groups take a while.
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Fetching members of {display_name}..."));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let members = ctx.client.list_group_members(&group.id).await;
    spinner.finish_and_clear();
    let members = members?;

    if members.is_empty() {
        println!("No members found in this group.");
        return Ok(());
    }

    match csv_dir {
        Some(dir) => {
            let path = Path::new(dir).join(format!("{group_name}.csv"));
            match csv::export_members(&path, &members) {
                Ok(()) => println!(
                    "{} {} ({} members)",
                    "Exported members to:".green().bold(),
                    path.display(),
                    members.len()
                ),
                Err(e) => eprintln!("{} {e}", "Failed to export members:".red().bold()),
            }
        }
        None => {
            println!("Members of {display_name}:");
            let rows: Vec<MemberRow> = members.iter().map(MemberRow::from).collect();
            println!("{}", table::format_table(&rows));
        }
    }

    Ok(())
}
