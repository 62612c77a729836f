//! HTTP client for the fleet-management platform API.
//!
//! The platform speaks a JSON envelope over a single POST endpoint:
//! `{"method": M, "params": P}` in, `{"result": ...}` or
//! `{"error": {...}}` out. Authenticated calls carry the session
//! credentials inside `params`.

use crate::model::{Group, GroupKind, ResolvedUser, UserSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Catalog id of the security-group root; searching on it returns the
/// security subtree only.
pub const SECURITY_GROUP_ID: &str = "GroupSecurityId";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors from the remote service. `InvalidCredentials` and `DbUnavailable`
/// only arise during the authentication handshake; everything else can come
/// from any call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid user name or password")]
    InvalidCredentials,

    #[error("database is unavailable")]
    DbUnavailable,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{method} failed: {message}")]
    Remote { method: String, message: String },

    #[error("{method} returned no result")]
    MissingResult { method: String },
}

/// The remote operations the import pipeline depends on. A trait seam so
/// the pipeline is testable without a network.
#[async_trait]
pub trait Gateway {
    /// All provisioned accounts, fetched once to seed duplicate detection.
    async fn existing_users(&self) -> ApiResult<Vec<UserSummary>>;

    /// The full group catalog (organization hierarchy).
    async fn organization_groups(&self) -> ApiResult<Vec<Group>>;

    /// The security subtree of the group catalog.
    async fn security_groups(&self) -> ApiResult<Vec<Group>>;

    /// Create an account; returns the identifier assigned by the platform.
    async fn add_user(&self, user: &ResolvedUser) -> ApiResult<String>;
}

/// Session credentials, as issued by `Authenticate` and echoed back on
/// every subsequent call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub database: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<RemoteError>,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<RemoteErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct RemoteErrorDetail {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Authenticated client for one server + database.
pub struct ApiClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    timeout: Duration,
}

impl ApiClient {
    /// Perform the authentication handshake and return a ready client.
    pub async fn authenticate(
        server: &str,
        database: &str,
        username: &str,
        password: &str,
    ) -> ApiResult<Self> {
        let client = Client::new();
        let endpoint = endpoint_for(server);
        debug!(%endpoint, database, "authenticating");

        let login: LoginResult = post(
            &client,
            &endpoint,
            DEFAULT_TIMEOUT,
            "Authenticate",
            json!({
                "database": database,
                "userName": username,
                "password": password,
            }),
        )
        .await?;

        Ok(Self {
            client,
            endpoint,
            credentials: login.credentials,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        mut params: serde_json::Value,
    ) -> ApiResult<T> {
        params["credentials"] = serde_json::to_value(&self.credentials)?;
        post(&self.client, &self.endpoint, self.timeout, method, params).await
    }
}

#[async_trait]
impl Gateway for ApiClient {
    async fn existing_users(&self) -> ApiResult<Vec<UserSummary>> {
        debug!("fetching existing users");
        self.call("Get", json!({ "typeName": "User" })).await
    }

    async fn organization_groups(&self) -> ApiResult<Vec<Group>> {
        debug!("fetching group catalog");
        self.call("Get", json!({ "typeName": "Group" })).await
    }

    async fn security_groups(&self) -> ApiResult<Vec<Group>> {
        debug!("fetching security groups");
        let groups: Vec<Group> = self
            .call(
                "Get",
                json!({ "typeName": "Group", "search": { "id": SECURITY_GROUP_ID } }),
            )
            .await?;
        Ok(groups
            .into_iter()
            .map(|mut g| {
                g.kind = GroupKind::Security;
                g
            })
            .collect())
    }

    async fn add_user(&self, user: &ResolvedUser) -> ApiResult<String> {
        debug!(user = %user.name(), "submitting user");
        self.call("Add", json!({ "typeName": "User", "entity": user.user }))
            .await
    }
}

fn endpoint_for(server: &str) -> String {
    // a bare host gets https; an explicit scheme is kept as given
    if server.contains("://") {
        format!("{}/apiv1", server.trim_end_matches('/'))
    } else {
        format!("https://{server}/apiv1")
    }
}

async fn post<T: DeserializeOwned>(
    client: &Client,
    endpoint: &str,
    timeout: Duration,
    method: &str,
    params: serde_json::Value,
) -> ApiResult<T> {
    let envelope: Envelope<T> = client
        .post(endpoint)
        .timeout(timeout)
        .json(&json!({ "method": method, "params": params }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if let Some(error) = envelope.error {
        return Err(classify(method, error));
    }
    envelope.result.ok_or_else(|| ApiError::MissingResult {
        method: method.to_string(),
    })
}

fn classify(method: &str, error: RemoteError) -> ApiError {
    let names = error.errors.iter().filter_map(|d| d.name.as_deref());
    for name in names {
        if name.contains("InvalidUser") {
            return ApiError::InvalidCredentials;
        }
        if name.contains("DbUnavailable") || name.contains("DatabaseUnavailable") {
            return ApiError::DbUnavailable;
        }
    }

    let message = error
        .message
        .or_else(|| error.errors.into_iter().find_map(|d| d.message))
        .unwrap_or_else(|| "unknown remote error".to_string());
    ApiError::Remote {
        method: method.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_defaults_to_https() {
        assert_eq!(
            endpoint_for("my.fleet.example.com"),
            "https://my.fleet.example.com/apiv1"
        );
        assert_eq!(
            endpoint_for("http://127.0.0.1:8080"),
            "http://127.0.0.1:8080/apiv1"
        );
        assert_eq!(
            endpoint_for("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/apiv1"
        );
    }

    #[test]
    fn classifies_auth_failures_by_error_name() {
        let error: RemoteError = serde_json::from_str(
            r#"{"message":"bad login","errors":[{"name":"InvalidUserException"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            classify("Authenticate", error),
            ApiError::InvalidCredentials
        ));

        let error: RemoteError =
            serde_json::from_str(r#"{"errors":[{"name":"DbUnavailableException"}]}"#).unwrap();
        assert!(matches!(
            classify("Authenticate", error),
            ApiError::DbUnavailable
        ));
    }

    #[test]
    fn unrecognized_remote_errors_keep_method_and_message() {
        let error: RemoteError =
            serde_json::from_str(r#"{"message":"quota exceeded","errors":[]}"#).unwrap();
        match classify("Add", error) {
            ApiError::Remote { method, message } => {
                assert_eq!(method, "Add");
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn credentials_omit_unset_secrets_on_the_wire() {
        let credentials = Credentials {
            database: "db".into(),
            user_name: "u".into(),
            password: None,
            session_id: Some("s1".into()),
        };
        let value = serde_json::to_value(&credentials).unwrap();
        assert_eq!(value["database"], "db");
        assert_eq!(value["userName"], "u");
        assert_eq!(value["sessionId"], "s1");
        assert!(value.get("password").is_none());
    }
}
