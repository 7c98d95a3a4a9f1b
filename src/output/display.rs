//! Display row models for table output

use tabled::Tabled;

use crate::client::models::{GroupRecord, MembershipEntry};

/// Group row for group listings and the user card's groups table.
#[derive(Debug, Clone, Tabled)]
pub struct GroupRow {
    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "GROUP ID")]
    pub id: String,

    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
}

impl From<&GroupRecord> for GroupRow {
    fn from(group: &GroupRecord) -> Self {
        Self {
            name: group.display_name.clone().unwrap_or_else(|| "N/A".to_string()),
            id: group.id.clone(),
            description: group
                .description
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Member row for group member listings.
///
/// Missing fields render as blank strings, keeping the columns uniform.
#[derive(Debug, Clone, Tabled)]
pub struct MemberRow {
    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "NETWORK ID")]
    pub network_id: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,

    #[tabled(rename = "DEPARTMENT")]
    pub department: String,

    #[tabled(rename = "JOB TITLE")]
    pub job_title: String,

    #[tabled(rename = "MANAGER")]
    pub manager: String,
}

impl From<&MembershipEntry> for MemberRow {
    fn from(entry: &MembershipEntry) -> Self {
        let user = &entry.user;
        Self {
            name: user.display_name.clone().unwrap_or_default(),
            network_id: user.account_name.clone().unwrap_or_default(),
            email: user.primary_mail().unwrap_or_default().to_string(),
            department: user.department.clone().unwrap_or_default(),
            job_title: user.job_title.clone().unwrap_or_default(),
            manager: entry
                .manager
                .as_ref()
                .and_then(|m| m.display_name.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::UserRecord;

    #[test]
    fn test_group_row_substitutes_na() {
        let group = GroupRecord {
            id: "g-1".to_string(),
            display_name: None,
            mail: None,
            description: None,
        };

        let row = GroupRow::from(&group);
        assert_eq!(row.name, "N/A");
        assert_eq!(row.description, "N/A");
        assert_eq!(row.id, "g-1");
    }

    #[test]
    fn test_member_row_substitutes_blank_not_na() {
        let entry = MembershipEntry {
            user: UserRecord {
                id: "u-1".to_string(),
                display_name: Some("Alice Jones".to_string()),
                ..Default::default()
            },
            manager: None,
        };

        let row = MemberRow::from(&entry);
        assert_eq!(row.name, "Alice Jones");
        assert_eq!(row.network_id, "");
        assert_eq!(row.email, "");
        assert_eq!(row.department, "");
        assert_eq!(row.manager, "");
    }

    #[test]
    fn test_member_row_prefers_mail_over_principal_name() {
        let entry = MembershipEntry {
            user: UserRecord {
                id: "u-1".to_string(),
                mail: Some("alice@example.com".to_string()),
                user_principal_name: Some("alice.jones@example.com".to_string()),
                ..Default::default()
            },
            manager: Some(UserRecord {
                id: "u-2".to_string(),
                display_name: Some("Mandy Boss".to_string()),
                ..Default::default()
            }),
        };

        let row = MemberRow::from(&entry);
        assert_eq!(row.email, "alice@example.com");
        assert_eq!(row.manager, "Mandy Boss");
    }
}
