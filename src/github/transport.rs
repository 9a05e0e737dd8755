use crate::error::{Result, StatsError};
use std::collections::HashMap;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Raw file bodies can be large generated assets.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// A completed 200 response. Header names are lower-case.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Issues a single blocking GET. Implementations must return
/// `HttpStatus` for anything other than 200 and never retry.
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut req = self.agent.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let response = req.call().map_err(|e| StatsError::network(url, e))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(StatsError::HttpStatus {
                code: status,
                url: url.to_string(),
            });
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let mut body = response.into_body();
        let body = body
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| StatsError::network(url, e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
