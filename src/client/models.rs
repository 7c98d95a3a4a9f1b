//! Directory resource models
//!
//! Plain immutable records for directory entities, decoupled from the
//! transport layer. Attribute names follow the directory's wire format via
//! serde renames; everything the directory may omit is optional.

use serde::{Deserialize, Serialize};

/// A user snapshot fetched per query; never cached across calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Directory object id
    #[serde(default)]
    pub id: String,

    /// Full display name
    pub display_name: Option<String>,

    /// On-premises short identifier (network id)
    #[serde(rename = "onPremisesSamAccountName")]
    pub account_name: Option<String>,

    /// Display mail address
    pub mail: Option<String>,

    /// Email-shaped unique principal identifier
    pub user_principal_name: Option<String>,

    pub department: Option<String>,

    pub job_title: Option<String>,

    pub office_location: Option<String>,

    pub mobile_phone: Option<String>,

    /// Ordered business phone numbers
    #[serde(default)]
    pub business_phones: Vec<String>,
}

impl UserRecord {
    /// Primary address: display mail preferred, principal name fallback.
    pub fn primary_mail(&self) -> Option<&str> {
        self.mail
            .as_deref()
            .or(self.user_principal_name.as_deref())
    }
}

/// A group snapshot fetched per query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    #[serde(default)]
    pub id: String,

    pub display_name: Option<String>,

    pub mail: Option<String>,

    pub description: Option<String>,
}

/// Result of a single-user lookup. All three parts are independently
/// optional; a missing user short-circuits the other two to absent.
#[derive(Debug, Clone, Default)]
pub struct LookupResult {
    pub user: Option<UserRecord>,
    pub manager: Option<UserRecord>,
    pub groups: Option<Vec<GroupRecord>>,
}

impl LookupResult {
    /// The all-absent result for a lookup that matched nothing.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// One group member with its independently resolved manager.
#[derive(Debug, Clone)]
pub struct MembershipEntry {
    pub user: UserRecord,
    pub manager: Option<UserRecord>,
}

/// OData type tag carried by heterogeneous directory objects.
pub const ODATA_TYPE_USER: &str = "#microsoft.graph.user";
/// OData type tag for group objects.
pub const ODATA_TYPE_GROUP: &str = "#microsoft.graph.group";

/// Check the `@odata.type` discriminator on a raw directory object.
pub fn has_odata_type(value: &serde_json::Value, type_tag: &str) -> bool {
    value
        .get("@odata.type")
        .and_then(serde_json::Value::as_str)
        == Some(type_tag)
}
