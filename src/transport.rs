//! Cookie bridge: turn a harvested login cookie set into a download transport.

use std::time::Duration;

use reqwest::{header, redirect, Client, Response};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::portal::CookieSet;

/// The reusable HTTP transport shared by all download tasks.
///
/// Built once from the post-login [`CookieSet`] and the portal
/// configuration; no network call happens here. A malformed cookie set is
/// not detected at construction — it surfaces at the first request as an
/// ordinary download failure.
///
/// reqwest fixes the redirect policy when the client is built, and the
/// download engine needs both behaviors (a probe that exposes the 302
/// Location of the signed download URL, then a full fetch). The transport
/// therefore carries two clients with identical headers and timeout.
pub struct Transport {
    probe: Client,
    fetch: Client,
}

impl Transport {
    /// Build the transport from the login cookies. Consumes the cookie set;
    /// it is used exactly once.
    pub fn new(cookies: CookieSet, config: &Config) -> Result<Self> {
        let headers = build_headers(&cookies)?;
        let timeout = Duration::from_secs(config.portal.request_timeout_secs);

        let probe = Client::builder()
            .user_agent(&config.portal.user_agent)
            .default_headers(headers.clone())
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let fetch = Client::builder()
            .user_agent(&config.portal.user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { probe, fetch })
    }

    /// GET without following redirects. A 302 response comes back as-is.
    pub async fn get_no_redirect(&self, url: &str) -> Result<Response> {
        Ok(self.probe.get(url).send().await?)
    }

    /// GET following redirects to the final response.
    pub async fn get(&self, url: &str) -> Result<Response> {
        Ok(self.fetch.get(url).send().await?)
    }
}

/// Fixed identifying header set sent with every download request.
fn build_headers(cookies: &CookieSet) -> Result<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));
    headers.insert(
        header::CONNECTION,
        header::HeaderValue::from_static("keep-alive"),
    );

    if !cookies.is_empty() {
        let value = header::HeaderValue::from_str(&cookies.cookie_header())
            .map_err(|e| Error::Config(format!("Invalid cookie value: {}", e)))?;
        headers.insert(header::COOKIE, value);
    }

    Ok(headers)
}
