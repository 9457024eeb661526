//! Endpoint parsing for the control plane and listen addresses.
//!
//! Accepted forms:
//! - `unix:///var/run/docker.sock` or a bare path → unix socket
//! - `http://host[:port]`, `https://host[:port]` → tcp
//!
//! `https` is accepted for compatibility but dialed as plain tcp.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AddrError;

/// Parsed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    /// Unix domain socket.
    Unix { path: PathBuf },
    /// TCP endpoint with the scheme it was given with.
    Tcp { scheme: String, host: String },
}

impl Addr {
    /// Parses an endpoint string.
    ///
    /// # Example
    /// ```
    /// use bootvisor::Addr;
    ///
    /// let addr = Addr::parse("http://localhost:2375").unwrap();
    /// assert_eq!(addr.network(), "tcp");
    /// assert_eq!(addr.address(), "localhost:2375");
    /// ```
    pub fn parse(input: &str) -> Result<Self, AddrError> {
        let Some((scheme, rest)) = input.split_once("://") else {
            if input.is_empty() {
                return Err(AddrError::Empty);
            }
            return Ok(Addr::Unix {
                path: PathBuf::from(input),
            });
        };

        if rest.is_empty() {
            return Err(AddrError::Empty);
        }
        match scheme {
            "unix" => Ok(Addr::Unix {
                path: PathBuf::from(rest),
            }),
            "http" | "https" => Ok(Addr::Tcp {
                scheme: scheme.to_string(),
                host: rest.to_string(),
            }),
            other => Err(AddrError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Network family: `"unix"` or `"tcp"`.
    pub fn network(&self) -> &'static str {
        match self {
            Addr::Unix { .. } => "unix",
            Addr::Tcp { .. } => "tcp",
        }
    }

    /// Socket path or `host[:port]`.
    pub fn address(&self) -> &str {
        match self {
            Addr::Unix { path } => path.to_str().unwrap_or_default(),
            Addr::Tcp { host, .. } => host,
        }
    }

    /// Socket path, for unix endpoints.
    pub fn unix_path(&self) -> Option<&Path> {
        match self {
            Addr::Unix { path } => Some(path),
            Addr::Tcp { .. } => None,
        }
    }
}

impl FromStr for Addr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Addr::parse(s)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Unix { path } => write!(f, "unix://{}", path.display()),
            Addr::Tcp { scheme, host } => write!(f, "{scheme}://{host}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_uri() {
        let a = Addr::parse("unix:///var/run/docker.sock").unwrap();
        assert_eq!(a.network(), "unix");
        assert_eq!(a.address(), "/var/run/docker.sock");
        assert_eq!(a.to_string(), "unix:///var/run/docker.sock");
    }

    #[test]
    fn test_bare_path_is_unix() {
        let a = Addr::parse("/var/run/docker.sock").unwrap();
        assert_eq!(a.network(), "unix");
        assert_eq!(a.unix_path(), Some(Path::new("/var/run/docker.sock")));
    }

    #[test]
    fn test_http_with_and_without_port() {
        let a = Addr::parse("http://localhost").unwrap();
        assert_eq!((a.network(), a.address()), ("tcp", "localhost"));

        let a = Addr::parse("http://localhost:8080").unwrap();
        assert_eq!((a.network(), a.address()), ("tcp", "localhost:8080"));
        assert_eq!(a.unix_path(), None);
    }

    #[test]
    fn test_https_keeps_scheme() {
        let a: Addr = "https://localhost".parse().unwrap();
        assert_eq!(a.network(), "tcp");
        assert_eq!(a.to_string(), "https://localhost");
    }

    #[test]
    fn test_rejects_unknown_scheme_and_empty() {
        assert_eq!(
            Addr::parse("ftp://host"),
            Err(AddrError::UnsupportedScheme("ftp".into()))
        );
        assert_eq!(Addr::parse(""), Err(AddrError::Empty));
        assert_eq!(Addr::parse("unix://"), Err(AddrError::Empty));
    }
}
