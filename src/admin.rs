//! Operator identification.
//!
//! The operator is recognised by network address.  The address is resolved
//! from proxy headers first (serverless and reverse-proxy deployments never
//! see the real peer), then from the socket.  Whether an address is
//! privileged is decided by an [`AdminPolicy`], so the allow-list lives in
//! configuration rather than in code.

use std::collections::HashSet;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Decides whether a resolved client address may act as the operator.
pub trait AdminPolicy: Send + Sync {
    fn is_privileged(&self, client_address: Option<&str>) -> bool;
}

/// Exact-match allow-list of address strings.
#[derive(Clone, Debug, Default)]
pub struct AddressAllowList {
    addresses: HashSet<String>,
}

impl AddressAllowList {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = addresses
            .into_iter()
            .map(|a| a.as_ref().trim().to_owned())
            .filter(|a| !a.is_empty())
            .collect();
        Self { addresses }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl AdminPolicy for AddressAllowList {
    fn is_privileged(&self, client_address: Option<&str>) -> bool {
        match client_address {
            Some(addr) if !addr.is_empty() => self.addresses.contains(addr),
            _ => false,
        }
    }
}

/// Resolve the caller's address: first `X-Forwarded-For` entry, then
/// `X-Real-IP`, then the socket peer.
pub fn resolve_client_address(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|raw| match memchr::memchr(b',', raw.as_bytes()) {
            Some(idx) => &raw[..idx],
            None => raw,
        })
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(first) = forwarded {
        return Some(first.to_owned());
    }
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(ip) = real_ip {
        return Some(ip.to_owned());
    }
    peer.map(|ip| ip.to_string())
}

/// Extractor yielding the resolved client address, if any.  Never rejects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientAddress(pub Option<String>);

impl ClientAddress {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(ClientAddress(resolve_client_address(&parts.headers, peer)))
    }
}
