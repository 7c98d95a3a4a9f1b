//! Directory API client implementation

use std::num::NonZeroU32;
use std::pin::pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, error, info, warn};
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::{DEFAULT_LOGIN_HOST, TokenCache};
use super::models::{
    GroupRecord, LookupResult, MembershipEntry, ODATA_TYPE_GROUP, ODATA_TYPE_USER, UserRecord,
    has_odata_type,
};
use super::pagination::{self, ODataPage};
use super::DirectoryApi;
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Error, Result};

/// Default directory API host
const DEFAULT_GRAPH_HOST: &str = "https://graph.microsoft.com";

/// Directory API version segment
const API_VERSION: &str = "v1.0";

/// Local request budget against the directory service
const REQUESTS_PER_SECOND: u32 = 10;

/// Attribute projection for full user lookups
const USER_SELECT: &str = "id,displayName,mail,userPrincipalName,jobTitle,officeLocation,mobilePhone,businessPhones,onPremisesSamAccountName,department";

/// Attribute projection for member re-fetches
const MEMBER_SELECT: &str =
    "id,displayName,mail,userPrincipalName,jobTitle,department,onPremisesSamAccountName";

/// Attribute projection for group lookups
const GROUP_SELECT: &str = "id,displayName,mail,description";

/// OData error envelope returned by the directory on failures
#[derive(Debug, Deserialize)]
struct ODataErrorEnvelope {
    error: ODataErrorBody,
}

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    code: String,
    message: String,
}

/// Double embedded single quotes for interpolation into an OData filter.
fn quote_literal(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Directory API client over the Graph-style REST endpoints.
pub struct GraphClient {
    http: HttpClient,
    base_url: String,
    tokens: TokenCache,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl GraphClient {
    /// Create a client from configured credentials, with optional host
    /// overrides (CLI/env) taking precedence over the config file.
    pub fn from_config(
        config: &Config,
        graph_host: Option<&str>,
        login_host: Option<&str>,
    ) -> Result<Self> {
        let tenant_id = config
            .tenant_id
            .clone()
            .ok_or(ConfigError::MissingCredentials)?;
        let client_id = config
            .client_id
            .clone()
            .ok_or(ConfigError::MissingCredentials)?;
        let client_secret = config
            .client_secret
            .clone()
            .ok_or(ConfigError::MissingCredentials)?;

        let graph_host = graph_host
            .map(str::to_string)
            .or_else(|| config.graph_host.clone())
            .unwrap_or_else(|| DEFAULT_GRAPH_HOST.to_string());
        let graph_host = graph_host.trim_end_matches('/').to_string();

        let login_host = login_host
            .map(str::to_string)
            .or_else(|| config.login_host.clone())
            .unwrap_or_else(|| DEFAULT_LOGIN_HOST.to_string());
        let login_host = login_host.trim_end_matches('/').to_string();

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(NonZeroU32::new(REQUESTS_PER_SECOND).unwrap());

        Ok(Self {
            base_url: format!("{graph_host}/{API_VERSION}"),
            tokens: TokenCache::new(
                http.clone(),
                login_host,
                tenant_id,
                client_id,
                client_secret,
                &graph_host,
            ),
            http,
            rate_limiter: RateLimiter::direct(quota),
        })
    }

    /// Exchange credentials for a token without issuing a query. Used by
    /// `dirq init` to validate a new credential triple.
    pub async fn verify_credentials(&self) -> Result<()> {
        self.tokens.get_token().await.map(|_| ())
    }

    /// Build a request URL for a path under the API base.
    fn api_url(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ApiError::BadRequest(format!("invalid request URL: {e}")))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url.into())
    }

    /// Authenticated GET with status-to-error mapping.
    ///
    /// `eventual` adds the consistency header the directory requires for
    /// advanced filters ($count, startswith over large collections).
    async fn get_json<T: DeserializeOwned>(&self, url: &str, eventual: bool) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let token = self.tokens.get_token().await?;
        debug!("GET {url}");

        let mut request = self.http.get(url).bearer_auth(&token);
        if eventual {
            request = request.header("ConsistencyLevel", "eventual");
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("failed to parse response: {e}")).into());
        }

        Err(Self::error_from_response(status, response).await)
    }

    /// Map a non-success response to an error, surfacing the OData error
    /// code/message when the body carries one.
    async fn error_from_response(status: StatusCode, response: reqwest::Response) -> Error {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return ApiError::Throttled(Duration::from_secs(retry_after)).into();
        }

        let body = response.text().await.unwrap_or_default();

        if let Ok(envelope) = serde_json::from_str::<ODataErrorEnvelope>(&body) {
            return ApiError::Directory {
                code: envelope.error.code,
                message: envelope.error.message,
            }
            .into();
        }

        let api_error = match status {
            StatusCode::UNAUTHORIZED => ApiError::Auth("access token rejected".to_string()),
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound(if body.is_empty() {
                "resource not found".to_string()
            } else {
                body
            }),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::BadRequest(body)
            }
            s if s.is_server_error() => ApiError::ServerError(if body.is_empty() {
                format!("server error: {s}")
            } else {
                body
            }),
            _ => ApiError::InvalidResponse(format!("unexpected status code: {status}")),
        };

        api_error.into()
    }

    /// Attach manager and (optionally) groups to a resolved user.
    async fn enrich(
        &self,
        user: UserRecord,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult> {
        let manager = self.resolve_manager(&user.id).await;

        let groups = if include_groups {
            Some(self.list_user_groups(&user.id, group_fragment).await?)
        } else {
            None
        };

        Ok(LookupResult {
            user: Some(user),
            manager,
            groups,
        })
    }

    /// Run an exact-match user query and return the first hit, if any.
    async fn find_user(&self, filter: &str, eventual: bool) -> Result<Option<UserRecord>> {
        let mut params = vec![("$filter", filter), ("$select", USER_SELECT)];
        if eventual {
            params.push(("$count", "true"));
        }

        let url = self.api_url("users", &params)?;
        let page: ODataPage<UserRecord> = self.get_json(&url, eventual).await?;
        Ok(page.value.into_iter().next())
    }
}

#[async_trait]
impl DirectoryApi for GraphClient {
    async fn resolve_user_by_account_id(
        &self,
        account_id: &str,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult> {
        info!("Searching user by account name: {account_id}");

        let filter = format!(
            "onPremisesSamAccountName eq '{}'",
            quote_literal(account_id)
        );
        let found = self
            .find_user(&filter, true)
            .await
            .inspect_err(|e| error!("User lookup by account name failed: {e}"))?;

        let Some(user) = found else {
            warn!("No user found with account name: {account_id}");
            return Ok(LookupResult::not_found());
        };

        info!(
            "User found: {} ({})",
            user.display_name.as_deref().unwrap_or("-"),
            user.user_principal_name.as_deref().unwrap_or("-")
        );

        // Re-resolve through the email path for the uniform projection and
        // manager/group enrichment.
        match user.primary_mail().map(str::to_string) {
            Some(mail) => {
                self.resolve_user_by_email(&mail, include_groups, group_fragment)
                    .await
            }
            None => self.enrich(user, include_groups, group_fragment).await,
        }
    }

    async fn resolve_user_by_email(
        &self,
        email: &str,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult> {
        info!("Searching user by email: {email}");

        let filter = format!("userPrincipalName eq '{}'", quote_literal(email));
        let found = self
            .find_user(&filter, false)
            .await
            .inspect_err(|e| error!("User lookup by email failed: {e}"))?;

        let Some(user) = found else {
            warn!("No user found with email: {email}");
            return Ok(LookupResult::not_found());
        };

        info!(
            "User found: {} ({})",
            user.display_name.as_deref().unwrap_or("-"),
            user.user_principal_name.as_deref().unwrap_or("-")
        );

        self.enrich(user, include_groups, group_fragment).await
    }

    async fn resolve_user_by_display_name(
        &self,
        name: &str,
        include_groups: bool,
        group_fragment: Option<&str>,
    ) -> Result<LookupResult> {
        info!("Searching user by display name: {name}");

        let filter = format!("displayName eq '{}'", quote_literal(name));
        let found = self
            .find_user(&filter, false)
            .await
            .inspect_err(|e| error!("User lookup by display name failed: {e}"))?;

        let Some(user) = found else {
            warn!("No user found with display name: {name}");
            return Ok(LookupResult::not_found());
        };

        self.enrich(user, include_groups, group_fragment).await
    }

    async fn resolve_manager(&self, user_id: &str) -> Option<UserRecord> {
        debug!("Fetching manager for user {user_id}");

        let url = match self.api_url(&format!("users/{user_id}/manager"), &[]) {
            Ok(url) => url,
            Err(e) => {
                warn!("Could not build manager URL for {user_id}: {e}");
                return None;
            }
        };

        match self.get_json::<Value>(&url, false).await {
            Ok(object) if has_odata_type(&object, ODATA_TYPE_USER) => {
                match serde_json::from_value::<UserRecord>(object) {
                    Ok(manager) => {
                        debug!(
                            "Manager found: {}",
                            manager.display_name.as_deref().unwrap_or("-")
                        );
                        Some(manager)
                    }
                    Err(e) => {
                        warn!("Manager object for {user_id} could not be decoded: {e}");
                        None
                    }
                }
            }
            Ok(_) => {
                warn!("Manager relation for {user_id} exists but is not a user object");
                None
            }
            Err(Error::Api(api)) if api.is_not_found() => {
                warn!("No manager relation set for user {user_id}");
                None
            }
            Err(e) => {
                warn!("Manager lookup failed for user {user_id}: {e}");
                None
            }
        }
    }

    async fn search_groups_by_name_prefix(&self, fragment: &str) -> Result<Vec<GroupRecord>> {
        info!("Searching groups by name prefix: {fragment}");

        let filter = format!("startswith(displayName,'{}')", quote_literal(fragment));
        let url = self.api_url(
            "groups",
            &[
                ("$filter", &filter),
                ("$select", GROUP_SELECT),
                ("$count", "true"),
            ],
        )?;

        let first: ODataPage<GroupRecord> = self
            .get_json(&url, true)
            .await
            .inspect_err(|e| error!("Group search failed: {e}"))?;

        let groups = pagination::drain(first, |link| async move {
            self.get_json::<ODataPage<GroupRecord>>(&link, true).await
        })
        .await
        .inspect_err(|e| error!("Group search pagination failed: {e}"))?;

        info!("Found {} groups matching '{fragment}'", groups.len());
        Ok(groups)
    }

    async fn list_group_members(&self, group_id: &str) -> Result<Vec<MembershipEntry>> {
        info!("Fetching members of group {group_id}");

        let url = self.api_url(&format!("groups/{group_id}/members"), &[])?;
        let first: ODataPage<Value> = self
            .get_json(&url, false)
            .await
            .inspect_err(|e| error!("Member listing failed for group {group_id}: {e}"))?;

        let mut stream = pin!(pagination::items(first, |link| async move {
            self.get_json::<ODataPage<Value>>(&link, false).await
        }));

        let mut members = Vec::new();
        while let Some(object) = stream
            .try_next()
            .await
            .inspect_err(|e| error!("Member listing failed for group {group_id}: {e}"))?
        {
            // Nested groups, devices and service principals are skipped.
            if !has_odata_type(&object, ODATA_TYPE_USER) {
                continue;
            }
            let Some(member_id) = object.get("id").and_then(Value::as_str) else {
                continue;
            };

            // Re-fetch with the member projection; membership pages carry
            // only a partial attribute set.
            let detail_url =
                self.api_url(&format!("users/{member_id}"), &[("$select", MEMBER_SELECT)])?;
            let user: UserRecord = self
                .get_json(&detail_url, false)
                .await
                .inspect_err(|e| error!("Member fetch failed for user {member_id}: {e}"))?;

            let manager = self.resolve_manager(&user.id).await;
            members.push(MembershipEntry { user, manager });
        }

        info!("Found {} user members in group {group_id}", members.len());
        Ok(members)
    }

    async fn list_user_groups(
        &self,
        user_id: &str,
        name_fragment: Option<&str>,
    ) -> Result<Vec<GroupRecord>> {
        info!("Fetching groups for user {user_id}");

        let url = self.api_url(&format!("users/{user_id}/memberOf"), &[])?;
        let first: ODataPage<Value> = self
            .get_json(&url, false)
            .await
            .inspect_err(|e| error!("Group membership listing failed for {user_id}: {e}"))?;

        let objects = pagination::drain(first, |link| async move {
            self.get_json::<ODataPage<Value>>(&link, false).await
        })
        .await
        .inspect_err(|e| error!("Group membership pagination failed for {user_id}: {e}"))?;

        let needle = name_fragment.map(str::to_lowercase);
        let mut groups = Vec::new();

        for object in objects {
            if !has_odata_type(&object, ODATA_TYPE_GROUP) {
                continue;
            }
            let group: GroupRecord = match serde_json::from_value(object) {
                Ok(group) => group,
                Err(e) => {
                    warn!("Skipping undecodable group entry: {e}");
                    continue;
                }
            };

            let matches = match (&needle, &group.display_name) {
                (None, _) => true,
                (Some(needle), Some(name)) => name.to_lowercase().contains(needle.as_str()),
                (Some(_), None) => false,
            };

            if matches {
                groups.push(group);
            }
        }

        info!("Found {} groups for user {user_id}", groups.len());
        Ok(groups)
    }
}
