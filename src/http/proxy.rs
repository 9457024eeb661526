//! Pass-through reverse proxy to the control plane.
//!
//! Every request gets its own upstream connection (HTTP/1.1). The request
//! target is rewritten to origin form; method, headers and body pass through
//! unchanged. Responses are relayed with a `Via: 1.1 Boot` header, failures
//! are answered with `502 Bad Gateway`.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{HOST, VIA};
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use super::AppState;
use crate::addr::Addr;
use crate::error::ProxyError;
use crate::output::Stream;

const VIA_VALUE: &str = "1.1 Boot";

/// Host header sent to unix socket upstreams that were not given one.
const UNIX_HOST: &str = "unix.sock";

/// Forwards requests to a fixed upstream endpoint.
#[derive(Debug)]
pub struct Proxy {
    upstream: Addr,
    log: Stream,
}

impl Proxy {
    /// Creates a proxy for `upstream`, logging exchanges to `log`.
    pub fn new(upstream: Addr, log: Stream) -> Self {
        Self { upstream, log }
    }

    pub fn upstream(&self) -> &Addr {
        &self.upstream
    }

    /// Forwards `req` and relays the upstream response.
    pub async fn forward(&self, req: Request) -> Response {
        let mut log = self.log.clone();
        log.println(format_args!(">>> {} {}", req.method(), req.uri()));

        match self.round_trip(req).await {
            Ok(resp) => {
                log.println(format_args!("<<< {}", resp.status()));
                let (mut parts, body) = resp.into_parts();
                parts.headers.append(VIA, HeaderValue::from_static(VIA_VALUE));
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                log.println(format_args!("<<< 502 {e}"));
                tracing::warn!(upstream = %self.upstream, error = %e, label = e.as_label(), "proxy request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Html(format!("<h1>Proxy error</h1><pre>{e}</pre>")),
                )
                    .into_response()
            }
        }
    }

    async fn round_trip(&self, req: Request) -> Result<hyper::Response<Incoming>, ProxyError> {
        let (mut parts, body) = req.into_parts();

        let target = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
        parts.uri = target.parse::<Uri>()?;
        if !parts.headers.contains_key(HOST) {
            let host = match &self.upstream {
                Addr::Unix { .. } => Some(HeaderValue::from_static(UNIX_HOST)),
                Addr::Tcp { host, .. } => HeaderValue::from_str(host).ok(),
            };
            if let Some(host) = host {
                parts.headers.insert(HOST, host);
            }
        }
        let req = Request::from_parts(parts, body);

        match &self.upstream {
            #[cfg(unix)]
            Addr::Unix { path } => {
                let stream = tokio::net::UnixStream::connect(path)
                    .await
                    .map_err(|source| self.dial_error(source))?;
                send(TokioIo::new(stream), req).await
            }
            #[cfg(not(unix))]
            Addr::Unix { .. } => Err(self.dial_error(std::io::Error::from(std::io::ErrorKind::Unsupported))),
            Addr::Tcp { host, .. } => {
                let stream = TcpStream::connect(host.as_str())
                    .await
                    .map_err(|source| self.dial_error(source))?;
                send(TokioIo::new(stream), req).await
            }
        }
    }

    fn dial_error(&self, source: std::io::Error) -> ProxyError {
        ProxyError::Dial {
            addr: self.upstream.to_string(),
            source,
        }
    }
}

/// Performs one HTTP/1.1 exchange over `io`.
async fn send<T>(io: T, req: Request) -> Result<hyper::Response<Incoming>, ProxyError>
where
    T: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(error = %e, "upstream connection ended");
        }
    });
    Ok(sender.send_request(req).await?)
}

pub(super) async fn forward(State(state): State<AppState>, req: Request) -> Response {
    state.proxy.forward(req).await
}
