use anyhow::{Result, anyhow};
use mime::Mime;
use reqwest::{Client, Response, StatusCode, Url, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::auth::{API_KEY_HEADER, ApiKey};
use crate::error::ApiError;
use crate::resources::{
    Api, ApiVersion, Collection, Environment, Mock, Monitor, Schema, User, Workspace,
    from_json_str,
};

pub const DEFAULT_API_ROOT: &str = "https://api.getpostman.com";

/// Longest error body echoed back to the user.
const MAX_ERROR_BODY: usize = 512;

pub fn build_client(api_key: &ApiKey, timeout: Option<u64>) -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    let user_agent = format!("postmanctl/{}", env!("CARGO_PKG_VERSION"));
    headers.insert(header::USER_AGENT, header::HeaderValue::from_str(&user_agent)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    headers.insert(API_KEY_HEADER, api_key.header_value()?);

    let mut client_builder = Client::builder().default_headers(headers);
    if let Some(secs) = timeout {
        client_builder = client_builder.timeout(Duration::from_secs(secs));
    }
    Ok(client_builder.build()?)
}

/// Fetches single resources by id.
#[allow(async_fn_in_trait)]
pub trait PostmanService {
    async fn collection(&self, id: &str) -> Result<Collection, ApiError>;
    async fn environment(&self, id: &str) -> Result<Environment, ApiError>;
    async fn mock(&self, id: &str) -> Result<Mock, ApiError>;
    async fn monitor(&self, id: &str) -> Result<Monitor, ApiError>;
    async fn api(&self, id: &str) -> Result<Api, ApiError>;
    async fn api_version(&self, api_id: &str, id: &str) -> Result<ApiVersion, ApiError>;
    async fn workspace(&self, id: &str) -> Result<Workspace, ApiError>;
    async fn user(&self) -> Result<User, ApiError>;
    async fn schema(&self, api_id: &str, version_id: &str, id: &str) -> Result<Schema, ApiError>;
}

#[derive(Debug, Clone)]
pub struct PostmanClient {
    http: Client,
    api_root: Url,
}

impl PostmanClient {
    pub fn new(http: Client, api_root: &str) -> Result<Self> {
        let api_root: Url = api_root.parse()?;
        if api_root.cannot_be_a_base() {
            return Err(anyhow!("API root must be a base URL: {}", api_root));
        }
        Ok(Self { http, api_root })
    }

    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments);
        log::debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let mime = get_content_type(&resp);
        let body = resp.text().await?;
        log::debug!("{} {} ({} bytes)", status, resource, body.len());

        if !status.is_success() {
            return Err(error_from_body(status, mime.as_ref(), &body));
        }
        decode(resource, &body)
    }
}

/// Decodes a success body, however deeply its folders nest.
fn decode<T: DeserializeOwned>(resource: &'static str, body: &str) -> Result<T, ApiError> {
    from_json_str(body).map_err(|source| ApiError::MalformedPayload { resource, source })
}

// Every endpoint wraps its resource in an object keyed by the resource name.

#[derive(Debug, Deserialize)]
struct CollectionEnvelope {
    collection: Collection,
}

#[derive(Deserialize)]
struct EnvironmentEnvelope {
    environment: Environment,
}

#[derive(Deserialize)]
struct MockEnvelope {
    mock: Mock,
}

#[derive(Deserialize)]
struct MonitorEnvelope {
    monitor: Monitor,
}

#[derive(Deserialize)]
struct ApiEnvelope {
    api: Api,
}

#[derive(Deserialize)]
struct ApiVersionEnvelope {
    version: ApiVersion,
}

#[derive(Deserialize)]
struct WorkspaceEnvelope {
    workspace: Workspace,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct SchemaEnvelope {
    schema: Schema,
}

impl PostmanService for PostmanClient {
    async fn collection(&self, id: &str) -> Result<Collection, ApiError> {
        let env: CollectionEnvelope = self.get("collection", &["collections", id]).await?;
        Ok(env.collection)
    }

    async fn environment(&self, id: &str) -> Result<Environment, ApiError> {
        let env: EnvironmentEnvelope = self.get("environment", &["environments", id]).await?;
        Ok(env.environment)
    }

    async fn mock(&self, id: &str) -> Result<Mock, ApiError> {
        let env: MockEnvelope = self.get("mock", &["mocks", id]).await?;
        Ok(env.mock)
    }

    async fn monitor(&self, id: &str) -> Result<Monitor, ApiError> {
        let env: MonitorEnvelope = self.get("monitor", &["monitors", id]).await?;
        Ok(env.monitor)
    }

    async fn api(&self, id: &str) -> Result<Api, ApiError> {
        let env: ApiEnvelope = self.get("api", &["apis", id]).await?;
        Ok(env.api)
    }

    async fn api_version(&self, api_id: &str, id: &str) -> Result<ApiVersion, ApiError> {
        let env: ApiVersionEnvelope = self
            .get("api version", &["apis", api_id, "versions", id])
            .await?;
        Ok(env.version)
    }

    async fn workspace(&self, id: &str) -> Result<Workspace, ApiError> {
        let env: WorkspaceEnvelope = self.get("workspace", &["workspaces", id]).await?;
        Ok(env.workspace)
    }

    async fn user(&self) -> Result<User, ApiError> {
        let env: UserEnvelope = self.get("user", &["me"]).await?;
        Ok(env.user)
    }

    async fn schema(&self, api_id: &str, version_id: &str, id: &str) -> Result<Schema, ApiError> {
        let env: SchemaEnvelope = self
            .get(
                "schema",
                &["apis", api_id, "versions", version_id, "schemas", id],
            )
            .await?;
        Ok(env.schema)
    }
}

pub fn get_content_type(resp: &Response) -> Option<Mime> {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    name: String,
    message: String,
}

fn is_json(m: &Mime) -> bool {
    m.type_() == mime::APPLICATION && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
}

/// Translates a non-2xx response into an [`ApiError`].
pub fn error_from_body(status: StatusCode, mime: Option<&Mime>, body: &str) -> ApiError {
    if mime.is_some_and(is_json)
        && let Ok(ErrorEnvelope { error }) = serde_json::from_str::<ErrorEnvelope>(body)
    {
        return ApiError::Response {
            status: status.as_u16(),
            name: error.name,
            message: error.message,
        };
    }

    let mut body = body.trim().to_string();
    if body.is_empty() {
        body = status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    } else if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
        body.push_str("...");
    }
    ApiError::Status {
        status: status.as_u16(),
        body,
    }
}

// ============================================================================
// Tests
// ============================================================================
