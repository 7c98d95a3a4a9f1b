//! User card rendering and plain-text export

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use colored::Colorize;
use log::warn;

use crate::client::models::{GroupRecord, UserRecord};
use crate::output::display::GroupRow;
use crate::output::table;

const CARD_WIDTH: usize = 49;

fn field(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

/// The card's fixed attribute set as (label, value) pairs.
fn card_fields(user: &UserRecord, manager: Option<&UserRecord>) -> Vec<(&'static str, String)> {
    let phones = if user.business_phones.is_empty() {
        "N/A".to_string()
    } else {
        user.business_phones.join(", ")
    };

    vec![
        ("Name", field(user.display_name.as_deref())),
        ("Network ID", field(user.account_name.as_deref())),
        ("Email", field(user.primary_mail())),
        ("Department", field(user.department.as_deref())),
        ("Job Title", field(user.job_title.as_deref())),
        ("Office", field(user.office_location.as_deref())),
        ("Mobile", field(user.mobile_phone.as_deref())),
        ("Business Phones", phones),
        (
            "Manager",
            field(manager.and_then(|m| m.display_name.as_deref())),
        ),
        ("Object ID", user.id.clone()),
    ]
}

/// Where the plain-text card export lands for a given user.
///
/// Named after the account name; falls back to the object id for users
/// without one.
pub fn export_path(dir: &str, user: &UserRecord) -> PathBuf {
    let stem = user.account_name.as_deref().unwrap_or(&user.id);
    Path::new(dir).join(format!("{stem}.txt"))
}

/// Plain-text rendition of the card and group list for file export.
pub fn build_export_content(
    user: &UserRecord,
    manager: Option<&UserRecord>,
    groups: Option<&[GroupRecord]>,
) -> String {
    let mut content = String::from("User Details:\n");
    for (label, value) in card_fields(user, manager) {
        let _ = writeln!(content, "{:<17}{}", format!("{label}:"), value);
    }
    content.push('\n');

    match groups {
        Some(groups) if !groups.is_empty() => {
            content.push_str("User Groups:\n");
            for group in groups {
                let _ = writeln!(
                    content,
                    "- {}: {}",
                    group.display_name.as_deref().unwrap_or("N/A"),
                    group.description.as_deref().unwrap_or("N/A")
                );
            }
        }
        _ => content.push_str("No groups.\n"),
    }

    content
}

/// Render the resolved user as a console card, with an optional groups
/// table and an optional plain-text export.
///
/// An absent user prints a notice and nothing else. Export failures are
/// reported and never affect the already-printed console output.
pub fn print_user_with_groups(
    user: Option<&UserRecord>,
    manager: Option<&UserRecord>,
    groups: Option<&[GroupRecord]>,
    export_dir: Option<&str>,
) {
    let Some(user) = user else {
        println!("{}", "User not found.".red().bold());
        return;
    };

    let divider = "-".repeat(CARD_WIDTH);
    println!("{divider}");
    println!("{:^width$}", "USER DETAILS", width = CARD_WIDTH);
    println!("{divider}");
    for (label, value) in card_fields(user, manager) {
        println!(
            "{} {}",
            format!("{:<16}", format!("{label}:")).yellow().bold(),
            value.green()
        );
    }
    println!("{divider}");

    match groups {
        Some(groups) if !groups.is_empty() => {
            println!("\n{}", "User Groups".yellow().bold());
            let rows: Vec<GroupRow> = groups.iter().map(GroupRow::from).collect();
            println!("{}", table::format_table(&rows));
        }
        _ => println!("{}", "No groups found for this user.".red().bold()),
    }

    if let Some(dir) = export_dir {
        let path = export_path(dir, user);
        let content = build_export_content(user, manager, groups);
        match std::fs::write(&path, content) {
            Ok(()) => println!("{} {}", "Exported card to:".green().bold(), path.display()),
            Err(e) => {
                warn!("Card export to {} failed: {e}", path.display());
                eprintln!("{} {e}", "Failed to export card:".red().bold());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRecord {
        UserRecord {
            id: "u-1".to_string(),
            display_name: Some("Alice Jones".to_string()),
            account_name: Some("alice.jones".to_string()),
            mail: Some("alice@example.com".to_string()),
            user_principal_name: Some("alice.jones@example.com".to_string()),
            department: Some("Engineering".to_string()),
            job_title: Some("Engineer".to_string()),
            office_location: None,
            mobile_phone: None,
            business_phones: vec!["+1 555 0100".to_string()],
        }
    }

    #[test]
    fn test_card_fields_substitute_na() {
        let user = UserRecord {
            id: "u-9".to_string(),
            ..Default::default()
        };

        let fields = card_fields(&user, None);
        let name = fields.iter().find(|(label, _)| *label == "Name").unwrap();
        assert_eq!(name.1, "N/A");

        let manager = fields.iter().find(|(label, _)| *label == "Manager").unwrap();
        assert_eq!(manager.1, "N/A");
    }

    #[test]
    fn test_export_path_uses_account_name() {
        let path = export_path("/tmp/exports", &alice());
        assert_eq!(path, PathBuf::from("/tmp/exports/alice.jones.txt"));
    }

    #[test]
    fn test_export_path_falls_back_to_object_id() {
        let user = UserRecord {
            id: "u-9".to_string(),
            ..Default::default()
        };
        let path = export_path("/tmp", &user);
        assert_eq!(path, PathBuf::from("/tmp/u-9.txt"));
    }

    #[test]
    fn test_build_export_content_includes_fields_and_groups() {
        let groups = vec![GroupRecord {
            id: "g-1".to_string(),
            display_name: Some("Finance-Team".to_string()),
            mail: None,
            description: Some("Finance folks".to_string()),
        }];

        let manager = UserRecord {
            id: "u-2".to_string(),
            display_name: Some("Mandy Boss".to_string()),
            ..Default::default()
        };

        let content = build_export_content(&alice(), Some(&manager), Some(&groups));

        assert!(content.contains("User Details:"));
        assert!(content.contains("Alice Jones"));
        assert!(content.contains("alice.jones"));
        assert!(content.contains("alice@example.com"));
        assert!(content.contains("Mandy Boss"));
        assert!(content.contains("User Groups:"));
        assert!(content.contains("- Finance-Team: Finance folks"));
    }

    #[test]
    fn test_build_export_content_without_groups() {
        let content = build_export_content(&alice(), None, None);
        assert!(content.contains("No groups."));

        let content = build_export_content(&alice(), None, Some(&[]));
        assert!(content.contains("No groups."));
    }
}
