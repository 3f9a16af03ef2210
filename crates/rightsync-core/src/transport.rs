//! HTTP GET capability.
//!
//! [`Transport`] is the only seam between the sync engine and the network.
//! [`CurlTransport`] implements it with a single reused libcurl easy handle so
//! the in-memory cookie engine carries the login session across requests.

use std::collections::HashMap;
use std::fmt;
use std::str;
use std::time::Duration;

use crate::control::AbortToken;

/// A completed HTTP exchange. Any status is returned as-is; callers decide
/// what counts as failure.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u32,
    /// Header lines of the final response, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Error from a single request: transport failure, non-2xx status, or a
/// user abort.
#[derive(Debug)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// The abort token was tripped while the request was in flight.
    Aborted,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Curl(e) => write!(f, "{}", e),
            TransportError::Http(code) => write!(f, "HTTP {}", code),
            TransportError::Aborted => write!(f, "request aborted by user"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Curl(e) => Some(e),
            TransportError::Http(_) | TransportError::Aborted => None,
        }
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::Curl(e)
    }
}

/// Perform a GET with extra request headers and return status, headers and body.
pub trait Transport {
    fn get(&mut self, url: &str, headers: &HashMap<String, String>)
        -> Result<Response, TransportError>;
}

/// Connection settings for [`CurlTransport`].
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Whole-request limit; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("rightsync/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(30),
            timeout: None,
        }
    }
}

/// Blocking transport over one libcurl easy handle.
pub struct CurlTransport {
    easy: curl::easy::Easy,
    abort: AbortToken,
}

impl CurlTransport {
    pub fn new(opts: &CurlOptions, abort: AbortToken) -> Result<Self, TransportError> {
        let mut easy = curl::easy::Easy::new();
        // Empty cookie file enables the in-memory cookie engine.
        easy.cookie_file("")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&opts.user_agent)?;
        easy.connect_timeout(opts.connect_timeout)?;
        easy.timeout(opts.timeout.unwrap_or(Duration::ZERO))?;
        easy.progress(true)?;
        Ok(Self { easy, abort })
    }
}

impl Transport for CurlTransport {
    fn get(
        &mut self,
        url: &str,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Response, TransportError> {
        if self.abort.is_aborted() {
            return Err(TransportError::Aborted);
        }

        self.easy.url(url)?;
        self.easy.get(true)?;

        // Always replace the list so headers never leak between requests.
        let mut list = curl::easy::List::new();
        for (k, v) in custom_headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        self.easy.http_headers(list)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let abort = self.abort.clone();
        let performed = {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // A status line starts a new response (redirects, 100-continue).
                    if line.starts_with("HTTP/") {
                        header_lines.clear();
                    }
                    header_lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.progress_function(move |_, _, _, _| !abort.is_aborted())?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if e.is_aborted_by_callback() || self.abort.is_aborted() {
                return Err(TransportError::Aborted);
            }
            return Err(TransportError::Curl(e));
        }

        let status = self.easy.response_code()?;
        Ok(Response {
            status,
            headers: parse_header_lines(&header_lines),
            body,
        })
    }
}

/// Parse collected header lines into name/value pairs, skipping the status line.
fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("HTTP/"))
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}
