//! Request extractors for caller identity and visit metadata.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::domain::entities::VisitContext;
use crate::error::AppError;

/// Header carrying the authenticated owner, set by the upstream gateway.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Owner of the request, taken from the `X-Owner-Id` header.
///
/// Authentication happens upstream; this service trusts the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for OwnerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_value(&parts.headers, OWNER_HEADER)
            .map(OwnerId)
            .ok_or_else(|| AppError::InvalidRequest("X-Owner-Id header is required".to_string()))
    }
}

/// Visit metadata of the calling client.
///
/// # Sources
///
/// - IP: first `X-Forwarded-For` entry, then `X-Real-IP`, then the peer address
/// - Country: `CF-IPCountry`, then `X-Country-Code`
/// - Device: `X-Device-Type` if the client reports one
/// - Coordinates: `X-Geo-Lat` / `X-Geo-Lng`
///
/// Never rejects; missing data is simply absent.
#[derive(Debug, Clone, Default)]
pub struct ClientVisit(pub VisitContext);

impl<S: Send + Sync> FromRequestParts<S> for ClientVisit {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientVisit(visit_context(&parts.headers, peer)))
    }
}

fn visit_context(headers: &HeaderMap, peer: Option<String>) -> VisitContext {
    let forwarded = header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty());

    VisitContext {
        ip: forwarded
            .or_else(|| header_value(headers, "x-real-ip"))
            .or(peer),
        user_agent: header_value(headers, "user-agent"),
        device_type: header_value(headers, "x-device-type"),
        country_code: header_value(headers, "cf-ipcountry")
            .or_else(|| header_value(headers, "x-country-code")),
        lat: header_value(headers, "x-geo-lat").and_then(|v| v.parse().ok()),
        lng: header_value(headers, "x-geo-lng").and_then(|v| v.parse().ok()),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
