//! Per-client rate limiting using governor and `tower_governor`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::config::RateLimit;

/// Keys requests by client address.
///
/// With `trust_proxy` set, `X-Forwarded-For` (first hop) and `X-Real-IP` win
/// over the socket peer. Requests with no usable address share one bucket.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy {
            if let Some(ip) = Self::forwarded_ip(req) {
                return Ok(ip);
            }
        }

        let peer = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(peer.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)))
    }
}

pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Milliseconds between replenished requests so that a full bucket refills
/// over one window.
fn replenish_interval_ms(limit: &RateLimit) -> u64 {
    let window_ms = u64::try_from(limit.window.as_millis()).unwrap_or(u64::MAX);
    (window_ms / u64::from(limit.max_requests.max(1))).max(1)
}

/// Build the limiter: `max_requests` may be spent at once, then the bucket
/// refills over `window`. Returns `None` when governor rejects the quota.
pub fn rate_limiter(limit: &RateLimit) -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy: limit.trust_proxy,
        })
        .per_millisecond(replenish_interval_ms(limit))
        .burst_size(limit.max_requests)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tower_governor::key_extractor::KeyExtractor;

    fn limit(max_requests: u32, window_secs: u64, trust_proxy: bool) -> RateLimit {
        RateLimit {
            max_requests,
            window: Duration::from_secs(window_secs),
            trust_proxy,
        }
    }

    #[test]
    fn test_replenish_interval() {
        assert_eq!(replenish_interval_ms(&limit(100, 900, false)), 9_000);
        assert_eq!(replenish_interval_ms(&limit(5000, 1, false)), 1);
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        assert!(rate_limiter(&limit(0, 900, false)).is_none());
        assert!(rate_limiter(&limit(100, 900, false)).is_some());
    }

    #[test]
    fn test_key_prefers_forwarded_header_only_when_trusted() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));

        let trusted = ClientIpKeyExtractor { trust_proxy: true };
        let direct = ClientIpKeyExtractor { trust_proxy: false };

        assert_eq!(
            trusted.extract(&req).unwrap(),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            direct.extract(&req).unwrap(),
            "192.0.2.1".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_key_without_peer_address() {
        let req = Request::builder().header("x-real-ip", "198.51.100.2").body(()).unwrap();

        let trusted = ClientIpKeyExtractor { trust_proxy: true };
        assert_eq!(
            trusted.extract(&req).unwrap(),
            "198.51.100.2".parse::<IpAddr>().unwrap()
        );

        let direct = ClientIpKeyExtractor { trust_proxy: false };
        assert_eq!(
            direct.extract(&req).unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }
}
