// src/directory/client.rs
use crate::extractors::contact::{email_endpoint, EmailTrigger, EMAIL_ACTION};
use crate::utils::error::{EmailError, FetchError};
use reqwest::header;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("staff_harvester/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// The AJAX route refuses requests that carry no cookie at all; any value works.
const EMAIL_COOKIE: &str = "harvest=1";

/// Settings for the shared HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP access to school directory sites: listing pages, the email AJAX
/// route and portrait images. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
}

impl DirectoryClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Downloads a directory page as text.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "text/html,*/*")
            .send()
            .await?;
        let response = check_status(response, url)?;

        let body = response.text().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Asks the directory site's AJAX route for the address behind an
    /// email trigger. The response body is the address itself.
    pub async fn resolve_email(
        &self,
        page_url: &str,
        trigger: &EmailTrigger,
    ) -> Result<String, EmailError> {
        let endpoint = email_endpoint(page_url)?;
        let form = [
            ("do", EMAIL_ACTION),
            ("emailID", trigger.id.as_str()),
            ("emailType", trigger.kind.as_form_value()),
        ];

        let response = self
            .http
            .post(endpoint.as_str())
            .header(header::COOKIE, EMAIL_COOKIE)
            .form(&form[..])
            .send()
            .await
            .map_err(FetchError::from)?;
        let response = check_status(response, endpoint.as_str())?;

        let body = response.text().await.map_err(FetchError::from)?;
        let email = body.trim();
        if email.is_empty() {
            return Err(FetchError::EmptyResponse.into());
        }
        Ok(email.to_string())
    }

    /// Downloads raw portrait bytes.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url).send().await?;
        let response = check_status(response, url)?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if !status.is_success() {
        tracing::debug!("HTTP error status: {} for URL: {}", status, url);
        return Err(FetchError::Http(status));
    }
    Ok(response)
}
