use std::future::Future;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

/// Generic request function of the backend API.
///
/// Paths are relative to the API root, e.g. `/projects/acme/web/`.
pub trait ApiClient: Send + Sync + 'static {
    fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

/// Client for the remote HTTP API
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crumbscope/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }
}

impl ApiClient for HttpApiClient {
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Put => self.http.put(&url),
        };
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        tracing::debug!(method = method.as_str(), %url, "api request");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Offline client backed by a single project document on disk.
///
/// `GET` on any project path returns the document; `PUT` merges the body's
/// top-level keys into it and writes it back.
#[derive(Clone)]
pub struct FileApiClient {
    path: PathBuf,
}

impl FileApiClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Value, ApiError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Value::Object(Default::default()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ApiClient for FileApiClient {
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        if !path.starts_with("/projects/") {
            return Err(ApiError::NotFound {
                method: method.as_str(),
                path: path.to_string(),
            });
        }

        let mut document = self.load().await?;
        if method == Method::Put {
            if let (Value::Object(target), Some(Value::Object(update))) = (&mut document, body) {
                target.extend(update);
            }
            tokio::fs::write(&self.path, serde_json::to_string_pretty(&document)?).await?;
        }

        Ok(document)
    }
}

/// Either client, chosen from configuration at startup
#[derive(Clone)]
pub enum AnyClient {
    Http(HttpApiClient),
    File(FileApiClient),
}

impl ApiClient for AnyClient {
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        match self {
            Self::Http(client) => client.request(path, method, body).await,
            Self::File(client) => client.request(path, method, body).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_project_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crumbscope-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_file_client_put_then_get() {
        let path = temp_project_file("put-get");
        let client = FileApiClient::new(&path);

        let saved = client
            .request(
                "/projects/acme/web/",
                Method::Put,
                Some(json!({"slug": "web", "symbolSources": "[]"})),
            )
            .await
            .unwrap();
        assert_eq!(saved["symbolSources"], "[]");

        let loaded = client
            .request("/projects/acme/web/", Method::Get, None)
            .await
            .unwrap();
        assert_eq!(loaded["slug"], "web");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_file_client_missing_document_is_empty() {
        let client = FileApiClient::new(temp_project_file("missing"));
        let loaded = client
            .request("/projects/acme/web/", Method::Get, None)
            .await
            .unwrap();
        assert_eq!(loaded, json!({}));
    }

    #[tokio::test]
    async fn test_file_client_unknown_route() {
        let client = FileApiClient::new(temp_project_file("route"));
        let err = client.request("/teams/", Method::Get, None).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
