use gloo_net::http::{Request, Response};
use thiserror::Error;
use web_sys::FormData;

use crate::types::{ActionResponse, ChatRequest, ChatResponse, CityResponse, Coordinates};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("server returned status {0}")]
    Status(u16),
}

/// Thin client over the widget's backend. Every call is a single
/// request/response round trip; there are no retries and no cancellation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    /// Same-origin client using relative URLs, matching how the widget is
    /// served alongside its backend.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn send_chat(&self, message: &str) -> Result<String, ApiError> {
        let resp = Request::post(&self.url("/chat"))
            .json(&ChatRequest { message })?
            .send()
            .await?;
        let resp = check(resp)?;
        Ok(resp.json::<ChatResponse>().await?.response)
    }

    pub async fn resolve_city(&self, coords: Coordinates) -> Result<String, ApiError> {
        let resp = Request::post(&self.url("/get_city"))
            .json(&coords)?
            .send()
            .await?;
        let resp = check(resp)?;
        Ok(resp.json::<CityResponse>().await?.city)
    }

    pub async fn list_files(&self) -> Result<Vec<String>, ApiError> {
        let resp = Request::get(&self.url("/files")).send().await?;
        let resp = check(resp)?;
        Ok(resp.json().await?)
    }

    pub async fn upload(&self, form: &FormData) -> Result<String, ApiError> {
        let resp = Request::post(&self.url("/upload"))
            .body(form.clone())?
            .send()
            .await?;
        let resp = check(resp)?;
        Ok(resp.json::<ActionResponse>().await?.message)
    }

    pub async fn delete_file(&self, filename: &str) -> Result<String, ApiError> {
        let resp = Request::delete(&self.url(&format!("/delete/{}", filename)))
            .send()
            .await?;
        let resp = check(resp)?;
        Ok(resp.json::<ActionResponse>().await?.message)
    }
}

fn check(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        Ok(resp)
    } else {
        Err(ApiError::Status(resp.status()))
    }
}

/// Where the backend serves uploaded files for the "open" links.
pub fn uploads_url(filename: &str) -> String {
    format!("/uploads/{}", filename)
}
