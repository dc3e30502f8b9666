//! Proxy Configuration Types
//!
//! Proxy settings shared by the Gemini provider and the tracking channel.
//! The HTTP client factory that consumes them is in `quiz-funnel-llm`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, CoreResult};

/// Proxy protocol type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    Http,
    Https,
    Socks5,
}

impl ProxyProtocol {
    /// Return the URL scheme string for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyProtocol::Http => "http",
            ProxyProtocol::Https => "https",
            ProxyProtocol::Socks5 => "socks5",
        }
    }

    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            "socks5" | "socks5h" => Some(Self::Socks5),
            _ => None,
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    pub protocol: ProxyProtocol,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Only ever read from the environment or the settings file; never written back.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Build the proxy URL string (without auth).
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), self.host, self.port)
    }

    /// Parse `scheme://[user[:pass]@]host[:port]`, as found in `QUIZ_FUNNEL_PROXY`.
    ///
    /// Credentials are percent-decoded. The port may be omitted only for
    /// schemes with a well-known default.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let raw = raw.trim();
        let parsed = Url::parse(raw)
            .map_err(|e| CoreError::config(format!("invalid proxy URL {raw}: {e}")))?;

        let protocol = ProxyProtocol::from_scheme(parsed.scheme()).ok_or_else(|| {
            CoreError::config(format!("unsupported proxy scheme: {}", parsed.scheme()))
        })?;
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CoreError::config(format!("proxy URL has no host: {raw}")))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| CoreError::config(format!("proxy URL has no port: {raw}")))?;

        let username = match parsed.username() {
            "" => None,
            user => Some(decode_component(user)?),
        };
        let password = parsed.password().map(decode_component).transpose()?;

        Ok(Self {
            protocol,
            host: host.to_string(),
            port,
            username,
            password,
        })
    }
}

fn decode_component(raw: &str) -> CoreResult<String> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| CoreError::config(format!("proxy credentials are not valid UTF-8: {e}")))
}
