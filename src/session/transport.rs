//! The request/response seam the login handshake posts through.
//!
//! The handshake only needs one operation: POST a form-encoded body and get
//! the response status, headers, and body back. [`LoginTransport`] is that
//! seam; tests drive the handshake with stubs, and [`HttpLoginTransport`]
//! is the provided plain-HTTP/1.1 implementation over a tokio TCP stream.
//!
//! Encrypted (`https://`) endpoints are out of this transport's reach by
//! design: embedders that terminate TLS themselves supply their own
//! `LoginTransport`.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::error::{constants, ProtocolError, Result};

/// A parsed HTTP-like response from the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl LoginResponse {
    /// First header with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Posts a form-encoded body to a URL and returns the response.
#[async_trait]
pub trait LoginTransport: Send + Sync {
    /// Submit `fields` as an `application/x-www-form-urlencoded` POST body.
    ///
    /// # Errors
    /// `TransportError` (or `Io`) for any failure of the exchange itself;
    /// the handshake maps those to its `TransportFailed` outcome.
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<LoginResponse>;
}

/// Plain HTTP/1.1 transport over `tokio::net::TcpStream`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpLoginTransport;

#[async_trait]
impl LoginTransport for HttpLoginTransport {
    #[instrument(skip(self, fields))]
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<LoginResponse> {
        let (host, port, path) = split_url(url)?;
        let body = form_encode(fields);

        let mut stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| ProtocolError::TransportError(format!("connect {host}:{port}: {e}")))?;

        let request = format!(
            "POST {path} HTTP/1.1\r\n\
             Host: {host}\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        );
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| ProtocolError::TransportError(format!("send request: {e}")))?;

        // Connection: close lets us read until EOF instead of tracking
        // chunked encodings.
        let mut raw = Vec::new();
        stream
            .read_to_end(&mut raw)
            .await
            .map_err(|e| ProtocolError::TransportError(format!("read response: {e}")))?;
        if raw.is_empty() {
            return Err(ProtocolError::TransportError(
                constants::ERR_CONNECTION_CLOSED.into(),
            ));
        }

        let response = parse_response(&raw)?;
        debug!(status = response.status, "login endpoint responded");
        Ok(response)
    }
}

/// Split an `http://host[:port]/path` URL into its connect pieces.
fn split_url(url: &str) -> Result<(String, u16, String)> {
    let rest = match url.strip_prefix("http://") {
        Some(rest) => rest,
        None if url.starts_with("https://") => {
            return Err(ProtocolError::TransportError(
                constants::ERR_TLS_UNSUPPORTED.into(),
            ))
        }
        None => {
            return Err(ProtocolError::TransportError(format!(
                "unsupported URL scheme: {url}"
            )))
        }
    };
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    if authority.is_empty() {
        return Err(ProtocolError::TransportError(
            constants::ERR_EMPTY_ENDPOINT.into(),
        ));
    }
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (
            host,
            port.parse::<u16>().map_err(|_| {
                ProtocolError::TransportError(format!("invalid port in URL: {url}"))
            })?,
        ),
        None => (authority, 80),
    };
    Ok((host.to_owned(), port, path.to_owned()))
}

/// Encode form fields as `application/x-www-form-urlencoded`.
fn form_encode(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn parse_response(raw: &[u8]) -> Result<LoginResponse> {
    let text = String::from_utf8_lossy(raw);
    let (head, body) = text.split_once("\r\n\r\n").ok_or_else(|| {
        ProtocolError::TransportError(constants::ERR_MALFORMED_RESPONSE.into())
    })?;

    let mut lines = head.split("\r\n");
    let status = lines
        .next()
        .and_then(|status_line| status_line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            ProtocolError::TransportError(constants::ERR_MALFORMED_RESPONSE.into())
        })?;

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .collect();

    Ok(LoginResponse {
        status,
        headers,
        body: body.to_owned(),
    })
}
