//! Directory service API client

use async_trait::async_trait;

use crate::error::Result;

pub mod auth;
pub mod graph;
pub mod models;
pub mod pagination;

pub use graph::GraphClient;
#[allow(unused_imports)]
pub use models::{GroupRecord, LookupResult, MembershipEntry, UserRecord};

/// Read-only directory query operations.
///
/// Keeps the HTTP transport behind one seam: callers work with plain
/// records, never with wire types.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Resolve a user by on-premises account name. On a hit the record is
    /// re-resolved through the email path for a uniform attribute set.
    async fn resolve_user_by_account_id(
        &self,
        account_id: &str,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult>;

    /// Resolve a user by exact principal-name match.
    async fn resolve_user_by_email(
        &self,
        email: &str,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult>;

    /// Resolve a user by exact display-name match.
    async fn resolve_user_by_display_name(
        &self,
        name: &str,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult>;

    /// Resolve the manager relation for a user id. Absent is a normal
    /// outcome; lookup failures never abort the parent query.
    async fn resolve_manager(&self, user_id: &str) -> Option<UserRecord>;

    /// List groups whose display name starts with `fragment`, draining
    /// pagination.
    async fn search_groups_by_name_prefix(&self, fragment: &str) -> Result<Vec<GroupRecord>>;

    /// Enumerate a group's user-typed members with their managers, draining
    /// pagination. Non-user members are skipped.
    async fn list_group_members(&self, group_id: &str) -> Result<Vec<MembershipEntry>>;

    /// Enumerate the groups a user belongs to, optionally filtered by a
    /// case-insensitive display-name substring, draining pagination.
    async fn list_user_groups(
        &self,
        user_id: &str,
        name_fragment: Option<&str>,
    ) -> Result<Vec<GroupRecord>>;
}
