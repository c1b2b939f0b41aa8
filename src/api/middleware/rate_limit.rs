use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::error::ErrorResponse;

/// Body message for a rejected request
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

pub const RATE_LIMIT_LIMIT_HEADER: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATE_LIMIT_REMAINING_HEADER: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATE_LIMIT_RESET_HEADER: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Per-client admission filter using a sliding window log
///
/// For each client IP the limiter keeps the instants of the requests it
/// admitted. On every check, instants older than the window are dropped; the
/// request is admitted only while fewer than `max_requests` remain.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<RwLock<RateLimiterState>>,
    max_requests: usize,
    window_duration: Duration,
    trust_proxy_headers: bool,
}

struct RateLimiterState {
    requests: HashMap<IpAddr, Vec<Instant>>,
}

/// Quota left for a client after an admitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: usize,
    pub remaining: usize,
    /// Seconds until the oldest request in the window expires
    pub reset_after: u64,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            state: Arc::new(RwLock::new(RateLimiterState {
                requests: HashMap::new(),
            })),
            max_requests,
            window_duration: Duration::from_secs(window_seconds),
            trust_proxy_headers: false,
        }
    }

    /// Take the client address from `X-Forwarded-For` / `X-Real-IP` when present
    pub fn with_trusted_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    pub fn window(&self) -> Duration {
        self.window_duration
    }

    /// Record a request from `ip` if it fits in the current window
    pub async fn check_rate_limit(&self, ip: IpAddr) -> Result<RateLimitStatus, RateLimitError> {
        let mut state = self.state.write().await;
        let now = Instant::now();

        let requests = state.requests.entry(ip).or_default();
        requests.retain(|&timestamp| now.duration_since(timestamp) < self.window_duration);

        if requests.len() >= self.max_requests {
            return Err(RateLimitError::LimitExceeded {
                limit: self.max_requests,
                window_seconds: self.window_duration.as_secs(),
                retry_after: self.seconds_until_reset(requests, now),
            });
        }

        requests.push(now);

        Ok(RateLimitStatus {
            limit: self.max_requests,
            remaining: self.max_requests - requests.len(),
            reset_after: self.seconds_until_reset(requests, now),
        })
    }

    /// Seconds until the oldest request leaves the window, rounded up, at least 1
    fn seconds_until_reset(&self, requests: &[Instant], now: Instant) -> u64 {
        match requests.first() {
            Some(&oldest) => {
                let remaining = self
                    .window_duration
                    .saturating_sub(now.duration_since(oldest));
                let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
                secs.max(1)
            }
            None => self.window_duration.as_secs().max(1),
        }
    }

    /// Drop clients with no request inside the window
    pub async fn cleanup_expired(&self) {
        let mut state = self.state.write().await;
        let now = Instant::now();

        state.requests.retain(|_, requests| {
            requests.retain(|&timestamp| now.duration_since(timestamp) < self.window_duration);
            !requests.is_empty()
        });
    }

    /// Resolve the client identity for a request
    fn client_ip(&self, request: &Request) -> IpAddr {
        if self.trust_proxy_headers {
            if let Some(ip) = ip_from_proxy_headers(request.headers()) {
                return ip;
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::from([127, 0, 0, 1]))
    }
}

/// Rate limiting errors
#[derive(Debug)]
pub enum RateLimitError {
    LimitExceeded {
        limit: usize,
        window_seconds: u64,
        retry_after: u64,
    },
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        match self {
            RateLimitError::LimitExceeded {
                limit,
                window_seconds,
                retry_after,
            } => {
                tracing::warn!(limit, window_seconds, retry_after, "Rate limit exceeded");

                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorResponse::new(RATE_LIMIT_MESSAGE)),
                )
                    .into_response();

                let headers = response.headers_mut();
                insert_quota_headers(
                    headers,
                    RateLimitStatus {
                        limit,
                        remaining: 0,
                        reset_after: retry_after,
                    },
                );
                headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                response
            }
        }
    }
}

fn insert_quota_headers(headers: &mut HeaderMap, status: RateLimitStatus) {
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(status.limit));
    headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(status.remaining));
    headers.insert(RATE_LIMIT_RESET_HEADER, HeaderValue::from(status.reset_after));
}

/// Rate limiting middleware
///
/// Rejected requests never reach a handler. Admitted responses carry the
/// client's remaining quota and the reset time in seconds.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client_ip = limiter.client_ip(&request);
    let status = limiter.check_rate_limit(client_ip).await?;

    let mut response = next.run(request).await;
    insert_quota_headers(response.headers_mut(), status);

    Ok(response)
}

/// First parseable address from `X-Forwarded-For`, then `X-Real-IP`
fn ip_from_proxy_headers(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| {
        headers
            .get("X-Real-IP")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<IpAddr>().ok())
    })
}
