//! FlashArray REST client implementation
//!
//! Session flow: a password is first exchanged for an API token
//! (`auth/apitoken`), then the token opens a cookie-backed session
//! (`auth/session`). A pre-issued token skips the exchange.

use super::types::{
    ApiErrorEntry, ApiTokenResponse, ApiVersions, ArrayHost, ArrayInfo, HostGroup,
    NetworkInterface, SessionResponse, Volume,
};
use crate::auth::ArrayCredential;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

/// REST API versions this client understands, newest first
pub const SUPPORTED_API_VERSIONS: &[&str] = &["1.19", "1.18", "1.17", "1.16"];

/// Authenticated session with a FlashArray
pub struct FlashArrayClient {
    http: HttpClient,
    host: String,
    username: String,
    api_version: String,
}

impl FlashArrayClient {
    /// Connect to an array by hostname over HTTPS
    pub async fn connect(
        host: &str,
        username: &str,
        credential: &ArrayCredential,
        verify_tls: bool,
    ) -> Result<Self> {
        Self::connect_url(&format!("https://{host}"), host, username, credential, verify_tls).await
    }

    /// Connect to an array at an explicit base URL
    ///
    /// The production path goes through [`FlashArrayClient::connect`];
    /// this entry point exists so the session flow can run against a
    /// local test server.
    pub async fn connect_url(
        base_url: &str,
        host: &str,
        username: &str,
        credential: &ArrayCredential,
        verify_tls: bool,
    ) -> Result<Self> {
        let http = HttpClient::with_config(
            HttpClientConfig::builder()
                .base_url(base_url)
                .verify_tls(verify_tls)
                .cookie_store(true)
                .build(),
        );

        let api_version = Self::discover_version(&http).await?;
        debug!("Using FlashArray REST API version {}", api_version);

        let api_token = match credential {
            ArrayCredential::ApiToken(token) => token.clone(),
            ArrayCredential::Password(password) => {
                Self::exchange_api_token(&http, &api_version, username, password).await?
            }
        };

        Self::open_session(&http, &api_version, &api_token).await?;
        info!("Authenticated to FlashArray {} as {}", host, username);

        Ok(Self {
            http,
            host: host.to_string(),
            username: username.to_string(),
            api_version,
        })
    }

    /// Pick the newest mutually supported REST version
    async fn discover_version(http: &HttpClient) -> Result<String> {
        let versions: ApiVersions = http
            .get_json("/api/api_version")
            .await
            .map_err(map_api_error)?;

        for candidate in SUPPORTED_API_VERSIONS {
            if versions.version.iter().any(|v| v == candidate) {
                return Ok((*candidate).to_string());
            }
        }

        Err(Error::UnsupportedApiVersion {
            available: versions.version.join(", "),
        })
    }

    /// Exchange username/password for an API token
    async fn exchange_api_token(
        http: &HttpClient,
        api_version: &str,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let response: ApiTokenResponse = http
            .request_json(
                reqwest::Method::POST,
                &format!("/api/{api_version}/auth/apitoken"),
                RequestConfig::new().json(json!({
                    "username": username,
                    "password": password,
                })),
            )
            .await
            .map_err(map_auth_error)?;
        Ok(response.api_token)
    }

    /// Open the cookie-backed session with an API token
    async fn open_session(http: &HttpClient, api_version: &str, api_token: &str) -> Result<()> {
        let _session: SessionResponse = http
            .request_json(
                reqwest::Method::POST,
                &format!("/api/{api_version}/auth/session"),
                RequestConfig::new().json(json!({ "api_token": api_token })),
            )
            .await
            .map_err(map_auth_error)?;
        Ok(())
    }

    /// Close the session
    pub async fn logout(&self) -> Result<()> {
        self.http
            .delete(&self.path("auth/session"))
            .await
            .map_err(map_api_error)?;
        Ok(())
    }

    /// Array hostname this client is connected to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Authenticated username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Negotiated REST API version
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    // ========================================================================
    // Array resources
    // ========================================================================

    /// Get array identity and software level
    pub async fn info(&self) -> Result<ArrayInfo> {
        self.get("array").await
    }

    /// List volumes; `protocol_endpoints` restricts to conglomerate volumes
    pub async fn list_volumes(&self, protocol_endpoints: bool) -> Result<Vec<Volume>> {
        if protocol_endpoints {
            self.get_with("volume", RequestConfig::new().query("protocol_endpoint", "true"))
                .await
        } else {
            self.get("volume").await
        }
    }

    /// Create a volume of `size_gb` gigabytes
    pub async fn create_volume(&self, name: &str, size_gb: u64) -> Result<Volume> {
        self.post(&format!("volume/{name}"), json!({ "size": format!("{size_gb}G") }))
            .await
    }

    /// Create a protocol-endpoint (conglomerate) volume
    pub async fn create_protocol_endpoint(&self, name: &str) -> Result<Volume> {
        self.post(&format!("volume/{name}"), json!({ "protocol_endpoint": true }))
            .await
    }

    /// Connect a volume to a host group
    pub async fn connect_hgroup(&self, hgroup: &str, volume: &str) -> Result<Value> {
        self.post(&format!("hgroup/{hgroup}/volume/{volume}"), json!({}))
            .await
    }

    /// List host objects with their initiator identifiers
    pub async fn list_hosts(&self) -> Result<Vec<ArrayHost>> {
        self.get("host").await
    }

    /// List host groups
    pub async fn list_hgroups(&self) -> Result<Vec<HostGroup>> {
        self.get("hgroup").await
    }

    /// List network interfaces
    pub async fn list_network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        self.get("network").await
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    fn path(&self, resource: &str) -> String {
        format!("/api/{}/{}", self.api_version, resource)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        self.get_with(resource, RequestConfig::default()).await
    }

    async fn get_with<T: DeserializeOwned>(
        &self,
        resource: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.http
            .get_json_with_config(&self.path(resource), config)
            .await
            .map_err(map_api_error)
    }

    async fn post<T: DeserializeOwned>(&self, resource: &str, body: Value) -> Result<T> {
        self.http
            .request_json(
                reqwest::Method::POST,
                &self.path(resource),
                RequestConfig::new().json(body),
            )
            .await
            .map_err(map_api_error)
    }
}

impl std::fmt::Debug for FlashArrayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashArrayClient")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Map an HTTP status error onto the Purity error body, if one is present
///
/// Purity returns errors as a JSON array of `{msg, ctx}` objects.
fn map_api_error(err: Error) -> Error {
    match err {
        Error::HttpStatus { status, body } => match parse_error_body(&body) {
            Some(message) => Error::Api { status, message },
            None => Error::HttpStatus { status, body },
        },
        other => other,
    }
}

/// Like [`map_api_error`], but 4xx during login becomes an auth failure
fn map_auth_error(err: Error) -> Error {
    match err {
        Error::HttpStatus { status, body } if (400..500).contains(&status) => {
            let message = parse_error_body(&body)
                .unwrap_or_else(|| format!("array rejected credentials (HTTP {status})"));
            Error::Auth { message }
        }
        other => map_api_error(other),
    }
}

fn parse_error_body(body: &str) -> Option<String> {
    if let Ok(entries) = serde_json::from_str::<Vec<ApiErrorEntry>>(body) {
        return entries.into_iter().next().map(|e| e.msg);
    }
    serde_json::from_str::<ApiErrorEntry>(body).ok().map(|e| e.msg)
}
