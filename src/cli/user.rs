//! User lookup command

use log::debug;

use crate::cli::{CommandContext, GetUserArgs, GlobalOptions};
use crate::client::DirectoryApi;
use crate::error::{Error, Result};
use crate::output::card;

/// Run the get-user command
pub async fn get(args: &GetUserArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let fragment = args.groupfragment.as_deref();

    debug!(
        "get-user: include_groups={}, fragment={:?}, export={:?}",
        args.includegroup, args.groupfragment, args.export
    );

    let result = match (&args.networkid, &args.email, &args.name) {
        (Some(networkid), _, _) => {
            ctx.client
                .resolve_user_by_account_id(networkid, args.includegroup, fragment)
                .await?
        }
        (_, Some(email), _) => {
            ctx.client
                .resolve_user_by_email(email, args.includegroup, fragment)
                .await?
        }
        (_, _, Some(name)) => {
            ctx.client
                .resolve_user_by_display_name(name, args.includegroup, fragment)
                .await?
        }
        // clap's identity group guarantees one flag; guard anyway
        _ => {
            return Err(Error::Other(
                "one of --networkid, --email or --name is required".to_string(),
            ));
        }
    };

    card::print_user_with_groups(
        result.user.as_ref(),
        result.manager.as_ref(),
        result.groups.as_deref(),
        args.export.as_deref(),
    );

    Ok(())
}
