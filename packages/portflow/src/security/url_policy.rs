//! URL checks applied before the pipeline fetches anything.
//!
//! Fetched URLs come from users, so only `http`/`https` to public hosts is
//! allowed. Loopback, private, link-local and unspecified addresses are
//! refused unless the policy explicitly permits private hosts.

use ipnet::IpNet;
use lazy_static::lazy_static;
use std::net::IpAddr;
use thiserror::Error;
use url::{Host, Url};

lazy_static! {
    static ref BLOCKED_RANGES: Vec<IpNet> = [
        "0.0.0.0/8",
        "10.0.0.0/8",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "::/128",
        "::1/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .map(|cidr| cidr.parse().unwrap())
    .collect();
}

const BLOCKED_HOSTNAMES: &[&str] = &["localhost", "metadata.google.internal", "instance-data"];

const LOCAL_PREVIEW_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "0.0.0.0"];

/// Why a URL was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlRejected {
    #[error("invalid URL: {0}")]
    Invalid(String),

    #[error("scheme not allowed: {0}")]
    Scheme(String),

    #[error("URL has no host")]
    NoHost,

    #[error("host not allowed: {0}")]
    Host(String),

    #[error("address not allowed: {0}")]
    Address(IpAddr),
}

/// Decides which URLs may be fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlPolicy {
    allow_private_hosts: bool,
}

impl UrlPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit loopback and private addresses (local development and tests).
    pub fn allow_private_hosts(mut self, allow: bool) -> Self {
        self.allow_private_hosts = allow;
        self
    }

    /// Parse `raw` and return it when it may be fetched.
    pub fn check(&self, raw: &str) -> Result<Url, UrlRejected> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlRejected::Invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UrlRejected::Scheme(url.scheme().to_string()));
        }

        if self.allow_private_hosts {
            return url.host().map(|_| url.clone()).ok_or(UrlRejected::NoHost);
        }

        match url.host() {
            None => return Err(UrlRejected::NoHost),
            Some(Host::Domain(domain)) => {
                let domain = domain.to_ascii_lowercase();
                if BLOCKED_HOSTNAMES.contains(&domain.as_str()) || domain.ends_with(".localhost") {
                    return Err(UrlRejected::Host(domain));
                }
            }
            Some(Host::Ipv4(ip)) => blocked_ip(IpAddr::V4(ip))?,
            Some(Host::Ipv6(ip)) => blocked_ip(IpAddr::V6(ip))?,
        }

        Ok(url)
    }
}

fn blocked_ip(ip: IpAddr) -> Result<(), UrlRejected> {
    if BLOCKED_RANGES.iter().any(|net| net.contains(&ip)) {
        Err(UrlRejected::Address(ip))
    } else {
        Ok(())
    }
}

/// Whether `endpoint` points at a local development/preview host.
///
/// Unparseable endpoints count as local: they cannot be reached either.
pub fn is_local_preview(endpoint: &str) -> bool {
    let Ok(url) = Url::parse(endpoint.trim()) else {
        return true;
    };
    match url.host() {
        None => true,
        Some(Host::Domain(domain)) => {
            LOCAL_PREVIEW_HOSTS.contains(&domain.to_ascii_lowercase().as_str())
        }
        Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
        Some(Host::Ipv6(ip)) => ip.is_loopback() || ip.is_unspecified(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_urls_pass() {
        let policy = UrlPolicy::new();
        assert!(policy.check("https://github.com/acme/widget").is_ok());
        assert!(policy.check("http://93.184.216.34/").is_ok());
    }

    #[test]
    fn test_blocks_schemes_and_private_hosts() {
        let policy = UrlPolicy::new();
        assert!(matches!(
            policy.check("file:///etc/passwd"),
            Err(UrlRejected::Scheme(_))
        ));
        assert!(matches!(
            policy.check("http://localhost:8080/"),
            Err(UrlRejected::Host(_))
        ));
        assert!(matches!(
            policy.check("http://169.254.169.254/latest/meta-data"),
            Err(UrlRejected::Address(_))
        ));
        assert!(matches!(
            policy.check("http://[::1]/"),
            Err(UrlRejected::Address(_))
        ));
        assert!(matches!(
            policy.check("http://192.168.1.10/"),
            Err(UrlRejected::Address(_))
        ));
        assert!(matches!(policy.check("not a url"), Err(UrlRejected::Invalid(_))));
    }

    #[test]
    fn test_private_hosts_can_be_allowed() {
        let policy = UrlPolicy::new().allow_private_hosts(true);
        assert!(policy.check("http://127.0.0.1:1234/page").is_ok());
        assert!(policy.check("ftp://127.0.0.1/").is_err());
    }

    #[test]
    fn test_local_preview_detection() {
        assert!(is_local_preview("http://localhost:5173/api/analyze-file"));
        assert!(is_local_preview("http://127.0.0.1:3000/api/analyze-file"));
        assert!(is_local_preview("http://[::1]:3000/"));
        assert!(is_local_preview("http://0.0.0.0/"));
        assert!(is_local_preview("::garbage::"));
        assert!(!is_local_preview("https://portflow.example.com/api/analyze-file"));
    }
}
