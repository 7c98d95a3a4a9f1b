//! CSV export for group member listings

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use crate::client::models::MembershipEntry;
use crate::error::Result;

/// Fixed member export header
pub const MEMBER_CSV_HEADER: &str =
    "DisplayName,NetworkID,Email,Department,JobTitle,ManagerName,ManagerEmail";

/// Write members as CSV: the fixed header line, then one quoted row per
/// member with empty strings for missing fields.
pub fn export_members(path: &Path, members: &[MembershipEntry]) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{MEMBER_CSV_HEADER}")?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .has_headers(false)
        .from_writer(file);

    for entry in members {
        let user = &entry.user;
        let manager = entry.manager.as_ref();

        writer.write_record([
            user.display_name.as_deref().unwrap_or(""),
            user.account_name.as_deref().unwrap_or(""),
            user.primary_mail().unwrap_or(""),
            user.department.as_deref().unwrap_or(""),
            user.job_title.as_deref().unwrap_or(""),
            manager.and_then(|m| m.display_name.as_deref()).unwrap_or(""),
            manager.and_then(|m| m.primary_mail()).unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
