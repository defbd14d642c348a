use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    api::types::{ApiError, Cursor, FieldErrors, Page, PageBody},
    config,
};

/// The two collections the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Employees,
    Attendance,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Employees => "employees/",
            Resource::Attendance => "attendance/",
        }
    }
}

/// Which page of a collection to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    First { query: Vec<(String, String)> },
    Cursor(Cursor),
}

impl PageRequest {
    pub fn first() -> Self {
        PageRequest::First { query: Vec::new() }
    }

    pub fn filtered(query: Vec<(String, String)>) -> Self {
        PageRequest::First { query }
    }

    pub fn cursor(cursor: Cursor) -> Self {
        PageRequest::Cursor(cursor)
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Client pointed at the configured service.
    pub fn new() -> Self {
        Self::new_with_base_url(config::api_base_url())
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            client: build_http_client(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolves a cursor against the base URL with URL-reference rules:
    /// absolute cursors are kept as they are, root-relative ones keep their
    /// path and bare ones hang off the base path.
    pub fn resolve_cursor(&self, cursor: &Cursor) -> Result<Url, ApiError> {
        let base = Url::parse(&self.base_url).map_err(|err| {
            ApiError::request_failed(format!("Invalid base URL {}: {}", self.base_url, err))
        })?;
        base.join(cursor.as_str()).map_err(|err| {
            ApiError::request_failed(format!("Invalid cursor {}: {}", cursor, err))
        })
    }

    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: Resource,
        request: &PageRequest,
    ) -> Result<Page<T>, ApiError> {
        let builder = match request {
            PageRequest::First { query } => {
                let mut builder = self.http_client().get(self.endpoint(resource.path()));
                if !query.is_empty() {
                    builder = builder.query(query);
                }
                builder
            }
            PageRequest::Cursor(cursor) => self.http_client().get(self.resolve_cursor(cursor)?),
        };
        let response = self.send(builder).await?;
        let body: PageBody<T> = self.map_json_response(response).await?;
        Ok(body.into())
    }

    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build().map_err(ApiError::request_failed)?;
        log::debug!("{} {}", request.method(), request.url());

        #[cfg(all(test, not(target_arch = "wasm32")))]
        if let Some(responder) = mock::find_mock(request.url().as_str()) {
            return responder.respond(&request).map(MockResponse::into_response);
        }

        self.client
            .execute(request)
            .await
            .map_err(ApiError::request_failed)
    }

    pub(crate) async fn map_json_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let body = response.text().await.map_err(ApiError::request_failed)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn map_empty_response(&self, response: Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let url = response.url().to_string();
        if status == StatusCode::NOT_FOUND {
            log::warn!("{} answered 404", url);
            return ApiError::NotFound;
        }
        if status.is_server_error() {
            log::warn!("{} answered {}", url, status);
            return ApiError::Transport(format!("Server responded with {}", status));
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<Value>(&body).ok();
        if let Some(detail) = parsed
            .as_ref()
            .and_then(|value| value.as_object())
            .filter(|object| object.len() == 1)
            .and_then(|object| object.get("detail"))
            .and_then(Value::as_str)
        {
            return ApiError::General(detail.to_string());
        }
        match parsed.as_ref().and_then(FieldErrors::from_value) {
            Some(errors) => {
                log::warn!("{} rejected request with {} field(s)", url, errors.len());
                ApiError::Validation(errors)
            }
            None if body.trim().is_empty() => ApiError::General(status.to_string()),
            None => ApiError::General(body),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client() -> Client {
    let timeout = config::current().request_timeout();
    Client::builder().timeout(timeout).build().unwrap_or_else(|err| {
        log::warn!("Falling back to default HTTP client: {}", err);
        Client::new()
    })
}

#[cfg(target_arch = "wasm32")]
fn build_http_client() -> Client {
    Client::new()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
pub use mock::{register_mock, MockResponse, TestResponder};
