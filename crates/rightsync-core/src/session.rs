//! Authenticated access to the catalog.
//!
//! A [`Session`] owns the transport (and with it the cookie jar) for a whole
//! run. It knows the catalog's URL layout and request headers, and hands raw
//! documents back to the caller; parsing happens elsewhere.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use url::Url;

use crate::retry::{run_with_retry, RetryPolicy};
use crate::transport::{Response, Transport, TransportError};

const API_VERSION_HEADER: &str = "X-API-VERSION";

/// URL layout for one account.
#[derive(Debug, Clone)]
pub struct Endpoints {
    site_root: Url,
    api_base: String,
    site_base: String,
}

impl Endpoints {
    /// `base_url` is the host root, e.g. `https://my.rightscale.com`.
    pub fn new(base_url: &str, account_id: &str) -> Result<Self> {
        let site_root =
            Url::parse(base_url).with_context(|| format!("invalid base URL {}", base_url))?;
        let root = base_url.trim_end_matches('/');
        Ok(Self {
            site_root,
            api_base: format!("{}/api/acct/{}", root, account_id),
            site_base: format!("{}/acct/{}", root, account_id),
        })
    }

    pub fn login_url(&self, api_version: &str) -> String {
        format!("{}/login?api_version={}", self.api_base, api_version)
    }

    pub fn listing_url(&self) -> String {
        format!("{}/right_scripts.xml", self.api_base)
    }

    pub fn attachment_fragment_url(&self, resource_id: i64) -> String {
        format!("{}/right_scripts/{}/script_attachments", self.site_base, resource_id)
    }

    /// Resolve an attachment link, which may be relative to the site root.
    pub fn resolve(&self, href: &str) -> Result<String> {
        let href = href.trim();
        if href.is_empty() {
            bail!("attachment has no download link");
        }
        let url = self
            .site_root
            .join(href)
            .with_context(|| format!("invalid attachment link {}", href))?;
        Ok(url.into())
    }
}

/// `Authorization` header value for HTTP basic auth.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub struct Session<T> {
    transport: T,
    endpoints: Endpoints,
    api_version: String,
    retry: RetryPolicy,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, endpoints: Endpoints, api_version: &str, retry: RetryPolicy) -> Self {
        Self {
            transport,
            endpoints,
            api_version: api_version.to_string(),
            retry,
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// One login attempt with basic auth; the session cookie it sets is kept
    /// by the transport for later requests. Never retried.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), TransportError> {
        tracing::info!("Logging in");
        let mut headers = self.api_headers();
        headers.insert("Authorization".to_string(), basic_auth(username, password));
        let url = self.endpoints.login_url(&self.api_version);
        let resp = self.transport.get(&url, &headers)?;
        check_status(resp).map(|_| ())
    }

    /// The XML resource listing.
    pub fn listing_document(&mut self) -> Result<String, TransportError> {
        let url = self.endpoints.listing_url();
        let headers = self.api_headers();
        self.get_with_retry(&url, &headers).map(|r| r.text())
    }

    /// The HTML attachment table for one resource.
    pub fn attachment_fragment(&mut self, resource_id: i64) -> Result<String, TransportError> {
        let url = self.endpoints.attachment_fragment_url(resource_id);
        let mut headers = HashMap::new();
        headers.insert("X-Requested-With".to_string(), "XMLHttpRequest".to_string());
        self.get_with_retry(&url, &headers).map(|r| r.text())
    }

    /// Raw attachment body.
    pub fn download(&mut self, href: &str) -> Result<Vec<u8>> {
        let url = self.endpoints.resolve(href)?;
        tracing::debug!("downloading {}", url);
        let resp = self
            .get_with_retry(&url, &HashMap::new())
            .with_context(|| format!("GET {}", url))?;
        Ok(resp.body)
    }

    fn api_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(API_VERSION_HEADER.to_string(), self.api_version.clone());
        headers
    }

    fn get_with_retry(
        &mut self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<Response, TransportError> {
        tracing::debug!("fetching {}", url);
        let transport = &mut self.transport;
        run_with_retry(&self.retry, || check_status(transport.get(url, headers)?))
    }
}

fn check_status(resp: Response) -> Result<Response, TransportError> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(TransportError::Http(resp.status))
    }
}
