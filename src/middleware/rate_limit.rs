use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::app::AppState;
use crate::config::ApiConfig;
use crate::error::ApiError;

/// Keys tracked before idle buckets are pruned
const PRUNE_THRESHOLD: usize = 10_000;

/// Per-client request budget: `max_requests` burst, refilled evenly over `window`
pub struct RateLimiter {
    limiter: Option<DefaultKeyedRateLimiter<IpAddr>>,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(enabled: bool, max_requests: u32, window: Duration, trust_proxy: bool) -> Self {
        let limiter = enabled.then(|| {
            let burst = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
            let quota = Quota::with_period(window / burst.get())
                .unwrap_or_else(|| Quota::per_second(burst))
                .allow_burst(burst);
            DefaultKeyedRateLimiter::keyed(quota)
        });
        Self { limiter, trust_proxy }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(
            api.enable_rate_limiting,
            api.rate_limit_requests,
            Duration::from_secs(api.rate_limit_window_secs),
            api.trust_proxy,
        )
    }

    /// Count one request for `client`; false once its budget is spent
    pub fn check(&self, client: IpAddr) -> bool {
        let Some(limiter) = &self.limiter else {
            return true;
        };
        if limiter.len() > PRUNE_THRESHOLD {
            limiter.retain_recent();
        }
        limiter.check_key(&client).is_ok()
    }

    /// The peer address, or the first `X-Forwarded-For` hop when the proxy is trusted
    fn client_ip(&self, request: &Request) -> IpAddr {
        if self.trust_proxy {
            let forwarded = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|hop| hop.trim().parse::<IpAddr>().ok());
            if let Some(ip) = forwarded {
                return ip;
            }
        }
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = state.rate_limiter.client_ip(&request);
    if !state.rate_limiter.check(client) {
        tracing::warn!("Rate limit exceeded for IP: {}", client);
        return Err(ApiError::too_many_requests(
            "Too many requests from this IP, please try again later",
        ));
    }
    Ok(next.run(request).await)
}
